//! `[export]` section configuration.
//!
//! ```toml
//! [export]
//! file_name = "post.html"  # name of the exported page inside exp/post/
//! slugify = false          # name the page after the post title instead
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::utils::slug::slugify;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub file_name: String,
    pub slugify: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: "post.html".to_string(),
            slugify: false,
        }
    }
}

impl ExportConfig {
    /// File name of the exported page for a post titled `title`.
    ///
    /// Falls back to `file_name` when slugifying yields nothing.
    pub fn file_name_for(&self, title: &str) -> String {
        if self.slugify {
            let slug = slugify(title);
            if !slug.is_empty() {
                return format!("{slug}.html");
            }
        }
        self.file_name.clone()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let name = self.file_name.as_str();
        if name.contains(['/', '\\']) || name.starts_with('.') {
            diag.error("export.file_name", "must be a plain file name");
        } else if !name.ends_with(".html") || name.len() <= ".html".len() {
            diag.error_with_hint(
                "export.file_name",
                format!("`{name}` must end with .html"),
                "use `post.html`",
            );
        }
    }
}
