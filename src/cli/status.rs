//! `status`: describe the post in progress.

use anyhow::Result;
use serde::Serialize;

use crate::config::PostConfig;
use crate::log;
use crate::post::{Block, Post, Session};

/// JSON view of the post in progress.
#[derive(Debug, Serialize)]
struct Status<'a> {
    preview: String,
    #[serde(flatten)]
    post: &'a Post,
}

pub fn show_status(config: &PostConfig, json: bool, pretty: bool) -> Result<()> {
    let session = Session::open(config)?;
    let Some(post) = session.post() else {
        return Ok(());
    };
    let preview = config.root_relative(session.preview_path()?);

    if json {
        let status = Status {
            preview: preview.display().to_string(),
            post,
        };
        let out = if pretty {
            serde_json::to_string_pretty(&status)?
        } else {
            serde_json::to_string(&status)?
        };
        println!("{out}");
        return Ok(());
    }

    log!("post"; "`{}` by {} on {}", post.meta.title, post.meta.author, post.meta.date);
    log!("post"; "preview {}", preview.display());
    for (index, block) in post.blocks().iter().enumerate() {
        log!("post"; "{:>3}. {}", index + 1, summary(block));
    }
    Ok(())
}

/// One-line description of a block, truncated for the terminal.
fn summary(block: &Block) -> String {
    const WIDTH: usize = 60;
    let text = match block {
        Block::Header { text } | Block::Text { text } | Block::Quote { text } => text.clone(),
        Block::Image { image, caption, .. } => format!("{image} {caption}"),
        Block::Link { url, label, .. } => format!("{label} <{url}>"),
    };
    let line = text.replace('\n', " ");
    let shown: String = line.chars().take(WIDTH).collect();
    let ellipsis = if line.chars().count() > WIDTH { "…" } else { "" };
    format!("{:<6} {shown}{ellipsis}", block.kind())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_truncates_and_flattens() {
        let block = Block::Text {
            text: format!("first\n{}", "x".repeat(80)),
        };
        let line = summary(&block);
        assert!(line.starts_with("text   first x"));
        assert!(line.ends_with('…'));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_summary_link() {
        let block = Block::Link {
            url: "https://example.com".into(),
            label: "Example".into(),
            title: None,
        };
        assert_eq!(summary(&block), "link   Example <https://example.com>");
    }
}
