//! `resume`: continue from a document written earlier.

use std::path::Path;

use anyhow::{Context, Result};

use crate::config::PostConfig;
use crate::logger::status_success;
use crate::post::Session;

pub fn resume_post(config: &PostConfig, file: &Path, force: bool) -> Result<()> {
    let file = if file.is_absolute() {
        file.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to get current working directory")?
            .join(file)
    };

    let session = Session::resume_from(config, &file, force)?;
    let (title, blocks) = session
        .post()
        .map(|post| (post.meta.title.as_str(), post.blocks().len()))
        .unwrap_or_default();
    status_success(&format!(
        "resumed `{title}` with {blocks} block(s) into {}",
        config.root_relative(session.preview_path()?).display()
    ));
    Ok(())
}
