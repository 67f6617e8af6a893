//! `[site]` section configuration.
//!
//! ```toml
//! [site]
//! title = "Site"            # <title> prefix and footer copyright
//! language = "en"           # <html lang>
//! author = "Jane Doe"       # default post author (optional)
//! date_format = "%d/%m/%y"  # chrono format of the post date
//! ```

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub date_format: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Site".to_string(),
            language: "en".to_string(),
            author: None,
            date_format: "%d/%m/%y".to_string(),
        }
    }
}

impl SiteConfig {
    /// Today's date rendered with `date_format`.
    pub fn today(&self) -> String {
        chrono::Local::now().format(&self.date_format).to_string()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.title.trim().is_empty() {
            diag.error("site.title", "must not be empty");
        }
        if self.language.trim().is_empty() {
            diag.error_with_hint("site.language", "must not be empty", "use a BCP 47 tag like `en`");
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            diag.error_with_hint(
                "site.date_format",
                format!("`{}` is not a valid date format", self.date_format),
                "see chrono strftime specifiers, e.g. `%Y-%m-%d`",
            );
        }
    }
}
