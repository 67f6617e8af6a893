//! Open a file with the desktop's default handler.

use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};

/// Launchers tried in order on this platform.
#[cfg(target_os = "macos")]
const LAUNCHERS: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const LAUNCHERS: &[&str] = &["explorer"];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const LAUNCHERS: &[&str] = &["xdg-open", "gio", "sensible-browser"];

/// Hand `path` to the first launcher found on `PATH`; does not wait.
pub fn open_in_browser(path: &Path) -> Result<()> {
    let Some(launcher) = LAUNCHERS.iter().find_map(|name| which::which(name).ok()) else {
        bail!("no launcher found (tried {})", LAUNCHERS.join(", "));
    };

    let mut command = Command::new(&launcher);
    if launcher.file_stem().is_some_and(|stem| stem == "gio") {
        command.arg("open");
    }
    command
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("failed to run `{}`", launcher.display()))?;
    Ok(())
}
