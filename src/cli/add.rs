//! `add`: append one block to the post in progress.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

use super::AddCommand;
use crate::config::PostConfig;
use crate::logger::status_success;
use crate::post::{Block, Session};

pub fn add_block(config: &PostConfig, command: &AddCommand) -> Result<()> {
    let mut session = Session::open(config)?;

    let Some(block) = to_block(command)? else {
        if let AddCommand::Image { path, alt, caption } = command {
            let image = session.add_image(path, alt.clone(), caption.clone())?;
            status_success(&format!("added image {image}"));
        }
        return Ok(());
    };
    session.add(block)?;

    let count = session.post().map_or(0, |post| post.blocks().len());
    status_success(&format!("added {} (block {count})", command_kind(command)));
    Ok(())
}

/// The block for a text-only command; images go through the pipeline.
fn to_block(command: &AddCommand) -> Result<Option<Block>> {
    Ok(Some(match command {
        AddCommand::Heading { text } => Block::Header { text: text.clone() },
        AddCommand::Text { text, file } => Block::Text {
            text: read_text(text.as_deref(), file.as_deref())?,
        },
        AddCommand::Quote { text } => Block::Quote { text: text.clone() },
        AddCommand::Link { url, label, title } => Block::Link {
            url: url.trim().to_string(),
            label: label.clone(),
            title: title.clone(),
        },
        AddCommand::Image { .. } => return Ok(None),
    }))
}

const fn command_kind(command: &AddCommand) -> &'static str {
    match command {
        AddCommand::Heading { .. } => "heading",
        AddCommand::Text { .. } => "text",
        AddCommand::Image { .. } => "image",
        AddCommand::Quote { .. } => "quote",
        AddCommand::Link { .. } => "link",
    }
}

/// Paragraph text from the argument, a file, or stdin for `-`.
///
/// Line endings are normalized to `\n` and trailing newlines dropped.
fn read_text(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    let raw = match (text, file) {
        (_, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read `{}`", path.display()))?,
        (Some("-"), None) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
        (Some(text), None) => text.to_string(),
        (None, None) => String::new(),
    };
    Ok(raw.replace("\r\n", "\n").trim_end_matches('\n').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("p.txt");
        fs::write(&path, "first\r\nsecond\r\n\r\n").unwrap();
        assert_eq!(read_text(None, Some(&path)).unwrap(), "first\nsecond");
    }

    #[test]
    fn test_read_text_inline() {
        assert_eq!(read_text(Some("a\nb\n"), None).unwrap(), "a\nb");
    }

    #[test]
    fn test_read_text_missing_file() {
        let err = read_text(None, Some(Path::new("/nonexistent/p.txt"))).unwrap_err();
        assert!(err.to_string().contains("p.txt"));
    }

    #[test]
    fn test_link_url_is_trimmed() {
        let block = to_block(&AddCommand::Link {
            url: "  https://example.com \n".into(),
            label: "Example".into(),
            title: None,
        })
        .unwrap();
        assert_eq!(
            block,
            Some(Block::Link {
                url: "https://example.com".into(),
                label: "Example".into(),
                title: None,
            })
        );
    }

    #[test]
    fn test_add_without_post() {
        let dir = TempDir::new().unwrap();
        let config = PostConfig::for_root(dir.path());
        let err = add_block(&config, &AddCommand::Quote { text: "q".into() }).unwrap_err();
        assert!(err.to_string().contains("postforge start"));
    }
}
