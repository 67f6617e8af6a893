//! `[assets]` section configuration.
//!
//! Stylesheet and script hrefs as written into each tree's HTML, relative
//! to the HTML file. The files themselves are never copied.
//!
//! ```toml
//! [assets]
//! preview_css = ["../needs/bootstrap.min.css", "../needs/clean-blog.min.css"]
//! preview_js = ["../needs/bootstrap.min.js", "../needs/clean-blog.min.js"]
//! export_css = ["../css/post/bootstrap.min.css", "../css/post/clean-blog.min.css"]
//! export_js = ["../js/jquery/jquery.min.js", "../js/bootstrap_v3.3.7.min.js", "../js/clean-blog.min.js"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::layout::Tree;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub preview_css: Vec<String>,
    pub preview_js: Vec<String>,
    pub export_css: Vec<String>,
    pub export_js: Vec<String>,
}

/// Stylesheets and scripts linked from one tree's document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    pub css: Vec<String>,
    pub js: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            preview_css: strings(&["../needs/bootstrap.min.css", "../needs/clean-blog.min.css"]),
            preview_js: strings(&["../needs/bootstrap.min.js", "../needs/clean-blog.min.js"]),
            export_css: strings(&[
                "../css/post/bootstrap.min.css",
                "../css/post/clean-blog.min.css",
            ]),
            export_js: strings(&[
                "../js/jquery/jquery.min.js",
                "../js/bootstrap_v3.3.7.min.js",
                "../js/clean-blog.min.js",
            ]),
        }
    }
}

impl AssetsConfig {
    pub fn for_tree(&self, tree: Tree) -> AssetSet {
        match tree {
            Tree::Preview => AssetSet {
                css: self.preview_css.clone(),
                js: self.preview_js.clone(),
            },
            Tree::Export => AssetSet {
                css: self.export_css.clone(),
                js: self.export_js.clone(),
            },
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let lists = [
            ("assets.preview_css", &self.preview_css),
            ("assets.preview_js", &self.preview_js),
            ("assets.export_css", &self.export_css),
            ("assets.export_js", &self.export_js),
        ];
        for (field, hrefs) in lists {
            if hrefs.iter().any(|href| href.trim().is_empty()) {
                diag.error(field, "contains an empty href");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_assets_per_tree() {
        let config = test_parse_config("");
        let preview = config.assets.for_tree(Tree::Preview);
        let export = config.assets.for_tree(Tree::Export);
        assert!(preview.css.iter().all(|href| href.starts_with("../needs/")));
        assert!(export.css.iter().all(|href| href.starts_with("../css/")));
        assert_eq!(export.js.len(), 3);
    }

    #[test]
    fn test_empty_href_rejected() {
        let config = test_parse_config("[assets]\nexport_js = [\"\"]");
        let mut diag = ConfigDiagnostics::new();
        config.assets.validate(&mut diag);
        assert_eq!(diag.errors()[0].field, "assets.export_js");
    }
}
