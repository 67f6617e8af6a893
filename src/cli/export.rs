//! `export`: write the final page and its images.

use anyhow::Result;

use crate::cleanup::clean_preview;
use crate::config::PostConfig;
use crate::logger::status_success;
use crate::post::Session;
use crate::{debug, log};

pub fn export_post(config: &PostConfig, keep_temp: bool) -> Result<()> {
    let session = Session::open(config)?;
    let report = session.export()?;

    for asset in &report.images {
        debug!("export"; "{}", config.root_relative(&asset.destination).display());
    }
    log!("export"; "{} image(s)", report.images.len());

    if !keep_temp {
        let removed = clean_preview(session.layout());
        debug!("clean"; "removed {} preview entries", removed);
    }

    status_success(&format!(
        "exported {}",
        config.root_relative(&report.document).display()
    ));
    Ok(())
}
