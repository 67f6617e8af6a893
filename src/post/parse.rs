//! HTML → Post, for resuming a written file.
//!
//! Accepts exactly what [`Renderer`](super::render::Renderer) writes, for
//! either tree: images are recognized by their derivative file name, so
//! preview and export hrefs both resolve. Anything else is reported as a
//! corrupt document naming the 1-based fragment where matching failed.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::render::{DOCTYPE, SIGNATURE};
use super::{Block, Post, PostMeta};
use crate::error::{PostError, Result};
use crate::image::{ImageRef, ImageRole};
use crate::security::unescape;

static RE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- (/?)postforge:([a-z]+)(?::([a-z]+))? -->").unwrap());

static RE_PAGE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta property="og:title" content="([^"]*)">"#).unwrap());
static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<h1>([^<]*)</h1>").unwrap());
static RE_SUBTITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h2 class="subheading">([^<]*)</h2>"#).unwrap());
static RE_BYLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="meta">Posted by <a href="\#">([^<]*)</a> on ([^<]*)</span>"#)
        .unwrap()
});
static RE_HEADER_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"style="background-image: url\('([^']*)'\)""#).unwrap());

static RE_HEADER_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^<h2 class="section-heading">([^<]*)</h2>$"#).unwrap());
static RE_TEXT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<p>((?:[^<]|<br>)*)</p>$").unwrap());
static RE_QUOTE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<blockquote>([^<]*)</blockquote>$").unwrap());
static RE_IMAGE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^<a href="\#"><img class="img-responsive" src="([^"]*)" alt="([^"]*)"></a>\s*<span class="caption text-muted">([^<]*)</span>$"#,
    )
    .unwrap()
});
static RE_LINK_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^<p><a href="([^"]*)"(?: title="([^"]*)")?>([^<]*)</a></p>$"#).unwrap()
});

/// A document read back from disk.
#[derive(Debug, Clone)]
pub struct ParsedPost {
    pub post: Post,
    /// The file carries a tail, i.e. it was exported.
    pub finalized: bool,
}

#[derive(Debug)]
enum Region<'h> {
    Head,
    Block(&'h str),
    Tail,
}

impl Region<'_> {
    const fn name(&self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Block(_) => "block",
            Self::Tail => "tail",
        }
    }
}

/// Parse a document written by the builder.
///
/// `path` only labels errors.
pub fn parse_post(html: &str, path: &Path) -> Result<ParsedPost> {
    let corrupt = |reason: String| PostError::corrupt(path, reason);

    let body = html
        .strip_prefix('\u{feff}')
        .unwrap_or(html)
        .trim_start()
        .strip_prefix(DOCTYPE)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix(SIGNATURE))
        .ok_or_else(|| corrupt("missing postforge signature".into()))?;

    let mut head = None;
    let mut blocks: Vec<(usize, &str, &str)> = Vec::new();
    let mut finalized = false;
    let mut open: Option<(Region<'_>, usize)> = None;
    let mut cursor = 0;
    let mut fragment = 0;

    for caps in RE_MARKER.captures_iter(body) {
        let Some(marker) = caps.get(0) else { continue };
        let closing = !caps[1].is_empty();
        let name = &caps[2];
        let kind = caps.get(3).map(|m| m.as_str());

        match open.take() {
            None => {
                if !body[cursor..marker.start()].trim().is_empty() {
                    return Err(corrupt(format!("unexpected content after fragment {fragment}")));
                }
                if finalized {
                    return Err(corrupt(format!("fragment {}: found after the tail", fragment + 1)));
                }
                fragment += 1;
                let region = match (closing, name, kind) {
                    (false, "head", None) if head.is_none() => Region::Head,
                    (false, "block", Some(kind)) if head.is_some() => Region::Block(kind),
                    (false, "tail", None) if head.is_some() => Region::Tail,
                    _ => {
                        return Err(corrupt(format!(
                            "fragment {fragment}: unexpected marker `{}`",
                            marker.as_str()
                        )));
                    }
                };
                open = Some((region, marker.end()));
            }
            Some((region, start)) => {
                if !closing || name != region.name() || kind.is_some() {
                    return Err(corrupt(format!(
                        "fragment {fragment}: {} is not closed",
                        region.name()
                    )));
                }
                let content = &body[start..marker.start()];
                match region {
                    Region::Head => head = Some(content),
                    Region::Block(kind) => blocks.push((fragment, kind, content)),
                    Region::Tail => finalized = true,
                }
            }
        }
        cursor = marker.end();
    }

    if let Some((region, _)) = open {
        return Err(corrupt(format!(
            "fragment {fragment}: {} is not closed",
            region.name()
        )));
    }
    if !body[cursor..].trim().is_empty() {
        return Err(corrupt(format!("unexpected content after fragment {fragment}")));
    }
    let head = head.ok_or_else(|| corrupt("no head fragment".into()))?;

    let meta = parse_head(head).map_err(|reason| corrupt(format!("fragment 1: {reason}")))?;
    let blocks = blocks
        .into_iter()
        .map(|(index, kind, content)| {
            parse_block(kind, content.trim())
                .map_err(|reason| corrupt(format!("fragment {index}: {reason}")))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ParsedPost {
        post: Post::with_blocks(meta, blocks),
        finalized,
    })
}

fn capture<'h>(re: &Regex, haystack: &'h str, what: &str) -> std::result::Result<&'h str, String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| format!("missing {what}"))
}

fn text(escaped: &str) -> String {
    unescape(escaped).into_owned()
}

fn image_ref(src: &str, role: ImageRole) -> std::result::Result<ImageRef, String> {
    ImageRef::from_href(&unescape(src))
        .filter(|image| image.role == role)
        .ok_or_else(|| format!("`{src}` is not a postforge {} image", role.prefix()))
}

fn parse_head(head: &str) -> std::result::Result<PostMeta, String> {
    let byline = RE_BYLINE
        .captures(head)
        .ok_or_else(|| "missing author line".to_string())?;

    let meta = PostMeta {
        page_title: text(capture(&RE_PAGE_TITLE, head, "page title")?),
        title: text(capture(&RE_TITLE, head, "title")?),
        subtitle: text(capture(&RE_SUBTITLE, head, "subtitle")?),
        author: text(&byline[1]),
        date: text(&byline[2]),
        header_image: image_ref(
            capture(&RE_HEADER_IMAGE, head, "header image")?,
            ImageRole::Header,
        )?,
    };
    meta.validate().map_err(|e| e.to_string())?;
    Ok(meta)
}

fn parse_block(kind: &str, content: &str) -> std::result::Result<Block, String> {
    let mismatch = || format!("{kind} block does not match its template");

    let block = match kind {
        "header" => Block::Header {
            text: text(capture(&RE_HEADER_BLOCK, content, "heading").map_err(|_| mismatch())?),
        },
        "text" => {
            let raw = capture(&RE_TEXT_BLOCK, content, "paragraph").map_err(|_| mismatch())?;
            Block::Text {
                text: text(&raw.replace("<br>\n", "\n").replace("<br>", "\n")),
            }
        }
        "quote" => Block::Quote {
            text: text(capture(&RE_QUOTE_BLOCK, content, "quote").map_err(|_| mismatch())?),
        },
        "image" => {
            let caps = RE_IMAGE_BLOCK.captures(content).ok_or_else(mismatch)?;
            Block::Image {
                image: image_ref(&caps[1], ImageRole::Body)?,
                alt: text(&caps[2]),
                caption: text(&caps[3]),
            }
        }
        "link" => {
            let caps = RE_LINK_BLOCK.captures(content).ok_or_else(mismatch)?;
            Block::Link {
                url: text(&caps[1]),
                label: text(&caps[3]),
                title: caps.get(2).map(|m| text(m.as_str())),
            }
        }
        other => return Err(format!("unknown block kind `{other}`")),
    };

    block.validate().map_err(|e| e.to_string())?;
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PostConfig;
    use crate::layout::Tree;
    use crate::post::render::Renderer;

    fn sample_post() -> Post {
        let meta = PostMeta {
            page_title: "Trip \"2024\"".into(),
            title: "Fish & chips".into(),
            subtitle: "<Sub>".into(),
            author: "Ana O'Neil".into(),
            date: "01/02/24".into(),
            header_image: ImageRef::new(ImageRole::Header, "fedcba9876543210"),
        };
        Post::with_blocks(
            meta,
            vec![
                Block::Header { text: "First".into() },
                Block::Text {
                    text: "line one\nline <two>".into(),
                },
                Block::Image {
                    image: ImageRef::new(ImageRole::Body, "0123456789abcdef"),
                    alt: "a \"cat\"".into(),
                    caption: "cat & dog".into(),
                },
                Block::Quote { text: "Be brief.".into() },
                Block::Link {
                    url: "https://example.com/?a=1&b=2".into(),
                    label: "Example".into(),
                    title: Some("An example".into()),
                },
                Block::Link {
                    url: "/about".into(),
                    label: "About".into(),
                    title: None,
                },
            ],
        )
    }

    fn renderer(tree: Tree) -> Renderer {
        Renderer::new(tree, &PostConfig::for_root(Path::new("/blog")))
    }

    #[test]
    fn test_preview_document_parses_back() {
        let post = sample_post();
        let html = renderer(Tree::Preview).open_document(&post);
        let parsed = parse_post(&html, Path::new("post.html")).unwrap();
        assert_eq!(parsed.post, post);
        assert!(!parsed.finalized);
    }

    #[test]
    fn test_export_document_parses_back() {
        let post = sample_post();
        let html = renderer(Tree::Export).document(&post);
        let parsed = parse_post(&html, Path::new("post.html")).unwrap();
        assert_eq!(parsed.post, post);
        assert!(parsed.finalized);
    }

    #[test]
    fn test_missing_signature() {
        let err = parse_post("<!DOCTYPE html>\n<html></html>", Path::new("x.html")).unwrap_err();
        assert!(matches!(err, PostError::CorruptDocument { .. }));
        assert!(err.to_string().contains("signature"));
    }

    #[test]
    fn test_unknown_kind_names_fragment() {
        let post = Post::new(sample_post().meta);
        let mut html = renderer(Tree::Preview).open_document(&post);
        html.push_str("<!-- postforge:block:video -->\n<video></video>\n<!-- /postforge:block -->\n");

        let err = parse_post(&html, Path::new("post.html")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("fragment 2"), "{message}");
        assert!(message.contains("video"), "{message}");
    }

    #[test]
    fn test_unclosed_block_rejected() {
        let post = Post::new(sample_post().meta);
        let mut html = renderer(Tree::Preview).open_document(&post);
        html.push_str("<!-- postforge:block:text -->\n<p>cut off");

        let err = parse_post(&html, Path::new("post.html")).unwrap_err();
        assert!(err.to_string().contains("fragment 2: block is not closed"));
    }

    #[test]
    fn test_stray_text_rejected() {
        let post = sample_post();
        let mut html = renderer(Tree::Preview).open_document(&post);
        html.push_str("<p>hand edit</p>\n");

        let err = parse_post(&html, Path::new("post.html")).unwrap_err();
        assert!(err.to_string().contains("unexpected content after fragment 7"));
    }

    #[test]
    fn test_edited_block_rejected() {
        let post = Post::new(sample_post().meta);
        let mut html = renderer(Tree::Preview).open_document(&post);
        html.push_str("<!-- postforge:block:quote -->\n<q>nope</q>\n<!-- /postforge:block -->\n");

        let err = parse_post(&html, Path::new("post.html")).unwrap_err();
        assert!(err.to_string().contains("quote block does not match"));
    }

    #[test]
    fn test_blocks_after_tail_rejected() {
        let post = Post::new(sample_post().meta);
        let r = renderer(Tree::Preview);
        let mut html = r.document(&post);
        html.push_str(&r.block(&Block::Quote { text: "late".into() }));

        let err = parse_post(&html, Path::new("post.html")).unwrap_err();
        assert!(err.to_string().contains("after the tail"));
    }

    #[test]
    fn test_foreign_image_rejected() {
        let post = Post::new(sample_post().meta);
        let mut html = renderer(Tree::Preview).open_document(&post);
        html.push_str(concat!(
            "<!-- postforge:block:image -->\n",
            "<a href=\"#\"><img class=\"img-responsive\" src=\"img/photo.jpg\" alt=\"a\"></a>\n",
            "<span class=\"caption text-muted\">c</span>\n",
            "<!-- /postforge:block -->\n",
        ));

        let err = parse_post(&html, Path::new("post.html")).unwrap_err();
        assert!(err.to_string().contains("photo.jpg"));
    }
}
