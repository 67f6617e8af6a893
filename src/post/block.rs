//! Content blocks.

use serde::{Deserialize, Serialize};

use crate::error::{PostError, Result};
use crate::image::{ImageRef, ImageRole};
use crate::security::validate_link_url;

/// One content unit of a post, in rendering order.
///
/// Text is stored raw and escaped when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    /// Section heading.
    Header { text: String },
    /// Paragraph; newlines render as `<br>`.
    Text { text: String },
    Image {
        image: ImageRef,
        alt: String,
        caption: String,
    },
    Quote { text: String },
    /// A paragraph holding a single anchor.
    Link {
        url: String,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl Block {
    /// Marker name of this block kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Header { .. } => "header",
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Quote { .. } => "quote",
            Self::Link { .. } => "link",
        }
    }

    /// Alt text and caption of an image block, checked before the image
    /// itself is imported.
    pub fn validate_image_text(alt: &str, caption: &str) -> Result<()> {
        require("image alt text", alt)?;
        require("image caption", caption)
    }

    /// Check required fields before the block is rendered anywhere.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Header { text } => require("heading text", text),
            Self::Text { text } => require("text", text),
            Self::Quote { text } => require("quote", text),
            Self::Image {
                image,
                alt,
                caption,
            } => {
                if image.role != ImageRole::Body {
                    return Err(PostError::validation(format!(
                        "`{image}` is a header image, not an article image"
                    )));
                }
                Self::validate_image_text(alt, caption)
            }
            Self::Link { url, label, title } => {
                require("link label", label)?;
                if title.as_deref().is_some_and(|t| t.trim().is_empty()) {
                    return Err(PostError::validation("link title is blank"));
                }
                validate_link_url(url).map(drop)
            }
        }
    }
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(PostError::validation(format!("{field} is required")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_image() -> ImageRef {
        ImageRef::new(ImageRole::Body, "0123456789abcdef")
    }

    #[test]
    fn test_blank_text_rejected() {
        let err = Block::Text { text: "  \n".into() }.validate().unwrap_err();
        assert_eq!(err.to_string(), "text is required");
    }

    #[test]
    fn test_image_requires_alt_and_caption() {
        let block = Block::Image {
            image: body_image(),
            alt: String::new(),
            caption: "A caption".into(),
        };
        assert!(block.validate().unwrap_err().to_string().contains("alt"));

        let block = Block::Image {
            image: body_image(),
            alt: "Alt".into(),
            caption: " ".into(),
        };
        assert!(block.validate().unwrap_err().to_string().contains("caption"));
    }

    #[test]
    fn test_image_rejects_header_role() {
        let block = Block::Image {
            image: ImageRef::new(ImageRole::Header, "0123456789abcdef"),
            alt: "Alt".into(),
            caption: "Caption".into(),
        };
        assert!(matches!(block.validate(), Err(PostError::Validation(_))));
    }

    #[test]
    fn test_link_scheme_checked() {
        let block = Block::Link {
            url: "javascript:alert(1)".into(),
            label: "click".into(),
            title: None,
        };
        assert!(matches!(block.validate(), Err(PostError::Validation(_))));

        let block = Block::Link {
            url: "https://example.com".into(),
            label: "example".into(),
            title: Some("Example site".into()),
        };
        assert!(block.validate().is_ok());
    }

    #[test]
    fn test_serialized_with_kind_tag() {
        let json = serde_json::to_value(Block::Quote { text: "q".into() }).unwrap();
        assert_eq!(json["kind"], "quote");
        assert_eq!(json["text"], "q");
    }
}
