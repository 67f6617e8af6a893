//! `[layout]` section configuration.
//!
//! ```toml
//! [layout]
//! preview = "temp"   # preview tree, must stay inside the project
//! export = "exp"     # export tree, may live anywhere (`~` expanded)
//! assets = "needs"   # theme css/js the preview links to
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::config::util::expand_against;
use crate::security::{normalize_path, validate_path};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub preview: PathBuf,
    pub export: PathBuf,
    pub assets: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            preview: "temp".into(),
            export: "exp".into(),
            assets: "needs".into(),
        }
    }
}

impl LayoutConfig {
    /// Check raw paths before they are made absolute.
    ///
    /// The preview tree is wiped by `clean`, so it must be a relative
    /// directory strictly inside the project root.
    pub fn validate_paths(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        if self.preview.is_absolute() {
            diag.error_with_hint(
                "layout.preview",
                "must be relative to the project root",
                "use a directory name like `temp`",
            );
        } else if self.preview.as_os_str().is_empty()
            || validate_path(&self.preview, root).is_ok_and(|p| p == normalize_path(root))
        {
            diag.error("layout.preview", "must name a subdirectory of the project root");
        } else if validate_path(&self.preview, root).is_err() {
            diag.error("layout.preview", "escapes the project root");
        }
    }

    /// Resolve all paths against `root`.
    pub fn normalize(&mut self, root: &Path) {
        self.preview = normalize_path(&root.join(&self.preview));
        self.export = normalize_path(&expand_against(root, &self.export));
        self.assets = normalize_path(&expand_against(root, &self.assets));
    }

    /// Check normalized paths.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.export.starts_with(&self.preview) || self.preview.starts_with(&self.export) {
            diag.error(
                "layout.export",
                "preview and export trees must not contain each other",
            );
        }
    }
}
