//! `clean`: discard the preview tree.

use anyhow::Result;

use crate::cleanup::clean_preview;
use crate::config::PostConfig;
use crate::layout::Layout;
use crate::logger::status_success;

pub fn clean(config: &PostConfig) -> Result<()> {
    let removed = clean_preview(&Layout::from_config(config));
    status_success(&format!("removed {removed} preview entries"));
    Ok(())
}
