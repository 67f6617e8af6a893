//! Embedded static resources for postforge.
//!
//! # Module Structure
//!
//! - `template` - Template types for typed variable injection
//! - `post` - Post page skeleton (head.html, tail.html)
//!
//! # Usage
//!
//! ```ignore
//! use embed::post::{POST_TAIL, TailVars};
//!
//! let html = POST_TAIL.render(&TailVars { site: "Blog".into(), scripts: String::new() });
//! ```

mod template;

pub use template::{Template, TemplateVars};

pub mod post {
    use super::{Template, TemplateVars};

    /// Variables for head.html.
    ///
    /// Every value is inserted verbatim; callers pass escaped text.
    #[derive(Debug, Default)]
    pub struct HeadVars {
        pub lang: String,
        pub site: String,
        pub page: String,
        pub stylesheets: String,
        pub header_image: String,
        pub title: String,
        pub subtitle: String,
        pub author: String,
        pub date: String,
    }

    impl TemplateVars for HeadVars {
        fn lookup(&self, name: &str) -> Option<String> {
            let value = match name {
                "LANG" => &self.lang,
                "SITE" => &self.site,
                "PAGE" => &self.page,
                "STYLESHEETS" => &self.stylesheets,
                "HEADER_IMAGE" => &self.header_image,
                "TITLE" => &self.title,
                "SUBTITLE" => &self.subtitle,
                "AUTHOR" => &self.author,
                "DATE" => &self.date,
                _ => return None,
            };
            Some(value.to_string())
        }
    }

    /// Document start up to the opening of the article column.
    pub const POST_HEAD: Template<HeadVars> =
        Template::new(include_str!("post/head.html"));

    /// Variables for tail.html.
    #[derive(Debug, Default)]
    pub struct TailVars {
        pub site: String,
        pub scripts: String,
    }

    impl TemplateVars for TailVars {
        fn lookup(&self, name: &str) -> Option<String> {
            match name {
                "SITE" => Some(self.site.clone()),
                "SCRIPTS" => Some(self.scripts.clone()),
                _ => None,
            }
        }
    }

    /// Article close, footer and scripts.
    pub const POST_TAIL: Template<TailVars> =
        Template::new(include_str!("post/tail.html"));
}
