//! Post header data.

use serde::{Deserialize, Serialize};

use crate::error::{PostError, Result};
use crate::image::{ImageRef, ImageRole};

/// Everything the post header shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    /// Browser tab title, after the site title.
    pub page_title: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    /// Already formatted; stored as shown.
    pub date: String,
    pub header_image: ImageRef,
}

impl PostMeta {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("page title", &self.page_title),
            ("title", &self.title),
            ("subtitle", &self.subtitle),
            ("author", &self.author),
            ("date", &self.date),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(PostError::validation(format!("{field} is required")));
            }
        }
        if self.header_image.role != ImageRole::Header {
            return Err(PostError::validation(format!(
                "`{}` is an article image, not a header image",
                self.header_image
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> PostMeta {
        PostMeta {
            page_title: "Trip".into(),
            title: "A trip".into(),
            subtitle: "By the sea".into(),
            author: "Ana".into(),
            date: "01/02/24".into(),
            header_image: ImageRef::new(ImageRole::Header, "0123456789abcdef"),
        }
    }

    #[test]
    fn test_complete_meta_valid() {
        assert!(meta().validate().is_ok());
    }

    #[test]
    fn test_blank_field_named() {
        let mut m = meta();
        m.author = " ".into();
        assert_eq!(m.validate().unwrap_err().to_string(), "author is required");
    }

    #[test]
    fn test_body_image_as_header_rejected() {
        let mut m = meta();
        m.header_image = ImageRef::new(ImageRole::Body, "0123456789abcdef");
        assert!(m.validate().is_err());
    }
}
