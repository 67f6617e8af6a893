//! Project initialization.

use std::fs;

use anyhow::{Context, Result, bail};

use crate::config::PostConfig;
use crate::layout::Layout;
use crate::log;

/// Write the default config and create both trees plus the assets directory.
pub fn new_project(config: &PostConfig) -> Result<()> {
    let root = config.get_root();
    if config.config_path.exists() {
        bail!(
            "`{}` already exists, remove it first to start over",
            config.config_path.display()
        );
    }

    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create `{}`", root.display()))?;
    fs::write(&config.config_path, PostConfig::default_toml()?)
        .with_context(|| format!("Failed to write `{}`", config.config_path.display()))?;

    let layout = Layout::from_config(config);
    layout.ensure_dirs()?;
    fs::create_dir_all(layout.assets_dir())
        .with_context(|| format!("Failed to create `{}`", layout.assets_dir().display()))?;

    log!("init"; "project initialized in {}", layout.root().display());
    Ok(())
}
