//! Post → HTML fragments.
//!
//! Every fragment is wrapped in `postforge` comment markers so a written
//! file can be parsed back (see [`parse`](super::parse)):
//!
//! ```text
//! <!DOCTYPE html>
//! <!-- postforge:post v1 -->
//! <!-- postforge:head --> ... <!-- /postforge:head -->
//! <!-- postforge:block:<kind> --> ... <!-- /postforge:block -->
//! <!-- postforge:tail --> ... <!-- /postforge:tail -->
//! ```
//!
//! The tail is only written on export; the preview file grows block by
//! block and is never closed.

use super::{Block, Post, PostMeta};
use crate::config::{AssetSet, PostConfig};
use crate::embed::post::{HeadVars, POST_HEAD, POST_TAIL, TailVars};
use crate::layout::Tree;
use crate::security::escape_text;

pub const DOCTYPE: &str = "<!DOCTYPE html>";
pub const SIGNATURE: &str = "<!-- postforge:post v1 -->";
pub const HEAD_OPEN: &str = "<!-- postforge:head -->";
pub const HEAD_CLOSE: &str = "<!-- /postforge:head -->";
pub const BLOCK_CLOSE: &str = "<!-- /postforge:block -->";
pub const TAIL_OPEN: &str = "<!-- postforge:tail -->";
pub const TAIL_CLOSE: &str = "<!-- /postforge:tail -->";

/// Renders fragments for one tree.
///
/// Trees differ only in the asset hrefs and image paths they reference.
#[derive(Debug, Clone)]
pub struct Renderer {
    tree: Tree,
    site: String,
    language: String,
    assets: AssetSet,
}

impl Renderer {
    pub fn new(tree: Tree, config: &PostConfig) -> Self {
        Self {
            tree,
            site: config.site.title.clone(),
            language: config.site.language.clone(),
            assets: config.assets.for_tree(tree),
        }
    }

    /// Doctype, signature and the marked head fragment.
    pub fn head(&self, meta: &PostMeta) -> String {
        let stylesheets = self
            .assets
            .css
            .iter()
            .map(|href| format!(r#"  <link href="{}" rel="stylesheet">"#, escape_text(href)))
            .collect::<Vec<_>>()
            .join("\n");

        let head = POST_HEAD.render(&HeadVars {
            lang: escape_text(&self.language).into_owned(),
            site: escape_text(&self.site).into_owned(),
            page: escape_text(&meta.page_title).into_owned(),
            stylesheets,
            header_image: escape_text(&self.tree.image_href(&meta.header_image)).into_owned(),
            title: escape_text(&meta.title).into_owned(),
            subtitle: escape_text(&meta.subtitle).into_owned(),
            author: escape_text(&meta.author).into_owned(),
            date: escape_text(&meta.date).into_owned(),
        });

        format!("{DOCTYPE}\n{SIGNATURE}\n{HEAD_OPEN}\n{head}{HEAD_CLOSE}\n")
    }

    /// One marked block fragment.
    pub fn block(&self, block: &Block) -> String {
        let inner = match block {
            Block::Header { text } => {
                format!(r#"<h2 class="section-heading">{}</h2>"#, escape_text(text))
            }
            Block::Text { text } => {
                format!("<p>{}</p>", escape_text(text).replace('\n', "<br>\n"))
            }
            Block::Quote { text } => format!("<blockquote>{}</blockquote>", escape_text(text)),
            Block::Image {
                image,
                alt,
                caption,
            } => format!(
                "<a href=\"#\"><img class=\"img-responsive\" src=\"{}\" alt=\"{}\"></a>\n\
                 <span class=\"caption text-muted\">{}</span>",
                escape_text(&self.tree.image_href(image)),
                escape_text(alt),
                escape_text(caption),
            ),
            Block::Link { url, label, title } => {
                let mut anchor = format!(r#"<a href="{}""#, escape_text(url));
                if let Some(title) = title {
                    anchor.push_str(&format!(r#" title="{}""#, escape_text(title)));
                }
                format!("<p>{anchor}>{}</a></p>", escape_text(label))
            }
        };
        format!(
            "<!-- postforge:block:{} -->\n{inner}\n{BLOCK_CLOSE}\n",
            block.kind()
        )
    }

    /// Marked closing fragment: article end, footer and scripts.
    pub fn tail(&self) -> String {
        let scripts = self
            .assets
            .js
            .iter()
            .map(|src| format!(r#"  <script src="{}"></script>"#, escape_text(src)))
            .collect::<Vec<_>>()
            .join("\n");

        let tail = POST_TAIL.render(&TailVars {
            site: escape_text(&self.site).into_owned(),
            scripts,
        });
        format!("{TAIL_OPEN}\n{tail}{TAIL_CLOSE}\n")
    }

    /// Head and blocks, without the tail: the shape of a preview file.
    pub fn open_document(&self, post: &Post) -> String {
        let mut html = self.head(&post.meta);
        for block in post.blocks() {
            html.push_str(&self.block(block));
        }
        html
    }

    /// Complete page.
    pub fn document(&self, post: &Post) -> String {
        let mut html = self.open_document(post);
        html.push_str(&self.tail());
        html
    }
}
