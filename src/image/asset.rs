//! Image identities and derivative descriptions.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::{Layout, Tree};

/// Number of hex chars of the source digest kept in file names.
pub const ID_LEN: usize = 16;

/// Pixel size, used both for limits and actual image sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether both sides are at least as large as `min`.
    pub const fn covers(self, min: Self) -> bool {
        self.width >= min.width && self.height >= min.height
    }

    /// Largest size with this aspect ratio that fits inside `max`.
    ///
    /// Never upscales: a size already inside `max` is returned unchanged.
    #[allow(clippy::cast_possible_truncation)] // Result is bounded by `max`
    pub fn fit_within(self, max: Self) -> Self {
        if self.is_empty() || max.is_empty() {
            return self;
        }
        if self.width <= max.width && self.height <= max.height {
            return self;
        }

        let (w, h) = (u64::from(self.width), u64::from(self.height));
        let (max_w, max_h) = (u64::from(max.width), u64::from(max.height));

        // Compare w/h against max_w/max_h without floats.
        if w * max_h >= h * max_w {
            let height = ((h * max_w + w / 2) / w).max(1);
            Self::new(max.width, height as u32)
        } else {
            let width = ((w * max_h + h / 2) / h).max(1);
            Self::new(width as u32, max.height)
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What an image is used for in the post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    /// Hero image behind the post heading.
    Header,
    /// Image block inside the article.
    Body,
}

impl ImageRole {
    /// File name prefix of derivatives with this role.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Header => "head",
            Self::Body => "img",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "head" => Some(Self::Header),
            "img" => Some(Self::Body),
            _ => None,
        }
    }
}

/// Logical identity of an optimized image: role + digest of the source.
///
/// The same source bytes always map to the same `ImageRef`, so processing an
/// image again lands on the same file in each tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef {
    pub role: ImageRole,
    pub id: String,
}

impl ImageRef {
    pub fn new(role: ImageRole, id: impl Into<String>) -> Self {
        Self {
            role,
            id: id.into(),
        }
    }

    /// Derive the reference from source bytes.
    pub fn from_bytes(role: ImageRole, bytes: &[u8]) -> Self {
        let digest = blake3::hash(bytes);
        let id = hex::encode(&digest.as_bytes()[..ID_LEN / 2]);
        Self::new(role, id)
    }

    /// `<prefix>_<id>.webp`
    pub fn file_name(&self) -> String {
        format!("{}_{}.webp", self.role.prefix(), self.id)
    }

    /// Recover a reference from an href or path ending in a derivative name.
    pub fn from_href(href: &str) -> Option<Self> {
        let name = href.rsplit(['/', '\\']).next()?;
        let stem = name.strip_suffix(".webp")?;
        let (prefix, id) = stem.split_once('_')?;
        let role = ImageRole::from_prefix(prefix)?;
        let valid_id = id.len() == ID_LEN
            && id
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        valid_id.then(|| Self::new(role, id))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// One derivative to produce: source → WebP in a tree.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub source: PathBuf,
    pub image: ImageRef,
    pub max: Dimensions,
    pub destination: PathBuf,
}

impl ImageAsset {
    /// Describe a derivative; the destination is resolved from the layout.
    pub fn new(
        layout: &Layout,
        source: &Path,
        image: ImageRef,
        tree: Tree,
        max: Dimensions,
    ) -> crate::error::Result<Self> {
        let destination = layout.image_path(tree, &image)?;
        Ok(Self {
            source: source.to_path_buf(),
            image,
            max,
            destination,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_landscape() {
        let fitted = Dimensions::new(2000, 1000).fit_within(Dimensions::new(1900, 800));
        assert_eq!(fitted, Dimensions::new(1600, 800));
    }

    #[test]
    fn test_fit_within_portrait() {
        let fitted = Dimensions::new(1000, 2000).fit_within(Dimensions::new(778, 514));
        assert_eq!(fitted, Dimensions::new(257, 514));
    }

    #[test]
    fn test_fit_within_never_upscales() {
        let small = Dimensions::new(100, 50);
        assert_eq!(small.fit_within(Dimensions::new(1900, 800)), small);
    }

    #[test]
    fn test_fit_within_keeps_one_pixel() {
        let fitted = Dimensions::new(10_000, 1).fit_within(Dimensions::new(100, 100));
        assert_eq!(fitted, Dimensions::new(100, 1));
    }

    #[test]
    fn test_ref_from_bytes_is_stable() {
        let a = ImageRef::from_bytes(ImageRole::Body, b"same bytes");
        let b = ImageRef::from_bytes(ImageRole::Body, b"same bytes");
        let c = ImageRef::from_bytes(ImageRole::Body, b"other bytes");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.id.len(), ID_LEN);
    }

    #[test]
    fn test_ref_from_href() {
        let image = ImageRef::from_bytes(ImageRole::Header, b"hero");
        let href = format!("../img/head_p/{}", image.file_name());
        assert_eq!(ImageRef::from_href(&href), Some(image));

        assert_eq!(ImageRef::from_href("img/photo.webp"), None);
        assert_eq!(ImageRef::from_href("img/img_XYZ.webp"), None);
        assert_eq!(ImageRef::from_href("img/img_0123456789abcdef.png"), None);
    }
}
