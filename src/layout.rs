//! Preview and export directory trees.
//!
//! ```text
//! <root>/
//! ├── temp/                 preview tree
//! │   ├── post.html         appended to block by block
//! │   └── img/              head_*.webp, img_*.webp
//! ├── needs/                theme css/js referenced by the preview
//! └── exp/                  export tree
//!     ├── post/<name>.html  written once on export
//!     └── img/
//!         ├── head_p/       header images
//!         └── post/         body images
//! ```
//!
//! Directory names come from `[layout]`; the relative shape is fixed, so the
//! hrefs written into HTML only depend on the [`Tree`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PostConfig;
use crate::error::{PostError, Result};
use crate::image::{ImageRef, ImageRole};
use crate::security::safe_join;

/// File name of the preview document inside the preview tree.
pub const PREVIEW_FILE: &str = "post.html";
const IMAGE_DIR: &str = "img";
const EXPORT_POST_DIR: &str = "post";
const EXPORT_HEADER_DIR: &str = "head_p";
const EXPORT_BODY_DIR: &str = "post";

/// Which output tree an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tree {
    Preview,
    Export,
}

impl Tree {
    /// Image href as written into this tree's HTML document.
    ///
    /// The preview document sits next to `img/`; the export document sits
    /// in `post/`, one level below `img/`.
    pub fn image_href(self, image: &ImageRef) -> String {
        match (self, image.role) {
            (Self::Preview, _) => format!("{IMAGE_DIR}/{}", image.file_name()),
            (Self::Export, ImageRole::Header) => {
                format!("../{IMAGE_DIR}/{EXPORT_HEADER_DIR}/{}", image.file_name())
            }
            (Self::Export, ImageRole::Body) => {
                format!("../{IMAGE_DIR}/{EXPORT_BODY_DIR}/{}", image.file_name())
            }
        }
    }
}

/// Resolved absolute locations of both trees.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    preview: PathBuf,
    export: PathBuf,
    assets: PathBuf,
}

impl Layout {
    pub fn new(
        root: impl Into<PathBuf>,
        preview: impl Into<PathBuf>,
        export: impl Into<PathBuf>,
        assets: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            preview: preview.into(),
            export: export.into(),
            assets: assets.into(),
        }
    }

    /// Layout rooted at `root` with the default directory names.
    #[cfg(test)]
    pub fn with_defaults(root: &Path) -> Self {
        Self::new(root, root.join("temp"), root.join("exp"), root.join("needs"))
    }

    /// Build from a loaded config (paths already normalized).
    pub fn from_config(config: &PostConfig) -> Self {
        Self::new(
            config.get_root(),
            &config.layout.preview,
            &config.layout.export,
            &config.layout.assets,
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets
    }

    pub fn tree_dir(&self, tree: Tree) -> &Path {
        match tree {
            Tree::Preview => &self.preview,
            Tree::Export => &self.export,
        }
    }

    #[cfg(test)]
    pub fn preview_file(&self) -> PathBuf {
        self.preview.join(PREVIEW_FILE)
    }

    pub fn export_post_dir(&self) -> PathBuf {
        self.export.join(EXPORT_POST_DIR)
    }

    pub fn image_dir(&self, tree: Tree, role: ImageRole) -> PathBuf {
        match (tree, role) {
            (Tree::Preview, _) => self.preview.join(IMAGE_DIR),
            (Tree::Export, ImageRole::Header) => {
                self.export.join(IMAGE_DIR).join(EXPORT_HEADER_DIR)
            }
            (Tree::Export, ImageRole::Body) => self.export.join(IMAGE_DIR).join(EXPORT_BODY_DIR),
        }
    }

    /// Destination of one optimized derivative, checked against its tree.
    pub fn image_path(&self, tree: Tree, image: &ImageRef) -> Result<PathBuf> {
        let dir = self.image_dir(tree, image.role);
        let relative = dir
            .strip_prefix(self.tree_dir(tree))
            .map(|rel| rel.join(image.file_name()))
            .unwrap_or_else(|_| PathBuf::from(image.file_name()));
        safe_join(self.tree_dir(tree), relative)
    }

    /// Create every directory of both trees.
    pub fn ensure_dirs(&self) -> Result<()> {
        let dirs = [
            self.preview.clone(),
            self.image_dir(Tree::Preview, ImageRole::Body),
            self.export_post_dir(),
            self.image_dir(Tree::Export, ImageRole::Header),
            self.image_dir(Tree::Export, ImageRole::Body),
        ];
        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|e| PostError::io(&dir, e))?;
        }
        Ok(())
    }
}
