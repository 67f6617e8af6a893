//! `preview`: show the preview file in a browser.

use anyhow::Result;

use crate::config::PostConfig;
use crate::logger::status_warning;
use crate::post::Session;
use crate::utils::open::open_in_browser;

pub fn open_preview(config: &PostConfig, no_open: bool) -> Result<()> {
    let session = Session::open(config)?;
    let path = session.preview_path()?;
    println!("{}", path.display());

    if !no_open && let Err(e) = open_in_browser(&path) {
        status_warning(&format!("could not open a browser: {e}"));
    }
    Ok(())
}
