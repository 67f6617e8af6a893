//! Append-only document builder.
//!
//! The preview file is the single source of truth between commands: every
//! appended block hits the file before it is recorded in memory, so a
//! process that dies mid-command leaves a file that still resumes.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::parse::{ParsedPost, parse_post};
use super::render::Renderer;
use super::{Block, Post, PostMeta};
use crate::config::{ExportConfig, PostConfig};
use crate::debug;
use crate::error::{PostError, Result};
use crate::image::ImageRef;
use crate::layout::{Layout, PREVIEW_FILE, Tree};
use crate::security::{safe_join, validate_path};

/// The capability set of a post under composition.
pub trait Composer {
    /// Validate `block`, append its preview fragment, then record it.
    fn append(&mut self, block: Block) -> Result<()>;

    /// Rebuild the post from a document written for either tree.
    fn resume(&mut self, path: &Path) -> Result<&Post>;

    /// Render the complete export document into `target_dir`.
    ///
    /// Returns the written file.
    fn export(&self, target_dir: &Path) -> Result<PathBuf>;
}

fn not_started() -> PostError {
    PostError::validation("no post in progress, run `postforge start` first")
}

#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    layout: Layout,
    preview: Renderer,
    export: Renderer,
    naming: ExportConfig,
    post: Option<Post>,
}

impl DocumentBuilder {
    pub fn new(config: &PostConfig) -> Self {
        Self {
            layout: Layout::from_config(config),
            preview: Renderer::new(Tree::Preview, config),
            export: Renderer::new(Tree::Export, config),
            naming: config.export.clone(),
            post: None,
        }
    }

    pub const fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn preview_path(&self) -> Result<PathBuf> {
        safe_join(self.layout.tree_dir(Tree::Preview), PREVIEW_FILE)
    }

    /// File name the export document gets for the current post.
    pub fn export_file_name(&self) -> Result<String> {
        let post = self.post.as_ref().ok_or_else(not_started)?;
        Ok(self.naming.file_name_for(&post.meta.title))
    }

    /// Begin a new post, truncating any previous preview file.
    ///
    /// The header image must already be in the preview tree.
    pub fn start(&mut self, meta: PostMeta) -> Result<&Post> {
        meta.validate()?;
        self.require_imported(&meta.header_image)?;

        let post = Post::new(meta);
        let path = self.preview_path()?;
        write_file(&path, &self.preview.head(&post.meta))?;
        debug!("post"; "started {}", path.display());

        Ok(self.post.insert(post))
    }

    fn require_imported(&self, image: &ImageRef) -> Result<()> {
        if self.layout.image_path(Tree::Preview, image)?.is_file() {
            Ok(())
        } else {
            Err(PostError::validation(format!(
                "image `{image}` is not in the preview tree, add it again"
            )))
        }
    }

    /// Parse a document from either tree without touching any file.
    ///
    /// Returns the resolved path with the parsed post.
    pub fn read(&self, path: &Path) -> Result<(PathBuf, ParsedPost)> {
        let path = self.locate(path)?;
        let html = fs::read_to_string(&path).map_err(|e| PostError::io(&path, e))?;
        let parsed = parse_post(&html, &path)?;
        Ok((path, parsed))
    }

    /// Accept only documents inside one of the two trees.
    fn locate(&self, path: &Path) -> Result<PathBuf> {
        validate_path(path, self.layout.tree_dir(Tree::Preview))
            .or_else(|_| validate_path(path, self.layout.tree_dir(Tree::Export)))
    }

    /// Copy derivatives missing from the preview tree back from the export
    /// tree. Both hold the same lossless pixels, so the bytes match.
    fn restore_preview_images(&self, post: &Post) -> Result<()> {
        for image in post.images() {
            let preview = self.layout.image_path(Tree::Preview, &image)?;
            let exported = self.layout.image_path(Tree::Export, &image)?;
            if !preview.is_file() && exported.is_file() {
                if let Some(parent) = preview.parent() {
                    fs::create_dir_all(parent).map_err(|e| PostError::io(parent, e))?;
                }
                fs::copy(&exported, &preview).map_err(|e| PostError::io(&preview, e))?;
                debug!("post"; "restored {} from export tree", image);
            }
        }
        Ok(())
    }
}

impl Composer for DocumentBuilder {
    fn append(&mut self, block: Block) -> Result<()> {
        if self.post.is_none() {
            return Err(not_started());
        }
        block.validate()?;
        if let Block::Image { image, .. } = &block {
            self.require_imported(image)?;
        }

        let path = self.preview_path()?;
        append_file(&path, &self.preview.block(&block))?;
        debug!("post"; "appended {} block", block.kind());

        self.post.as_mut().ok_or_else(not_started)?.push(block);
        Ok(())
    }

    /// Resuming anything but an open preview file rewrites the preview file
    /// so later appends land after the last block.
    fn resume(&mut self, path: &Path) -> Result<&Post> {
        let (path, parsed) = self.read(path)?;

        let preview_path = self.preview_path()?;
        if parsed.finalized || path != preview_path {
            self.restore_preview_images(&parsed.post)?;
            write_file(&preview_path, &self.preview.open_document(&parsed.post))?;
            debug!("post"; "rewrote {} from {}", preview_path.display(), path.display());
        }

        Ok(self.post.insert(parsed.post))
    }

    fn export(&self, target_dir: &Path) -> Result<PathBuf> {
        let post = self.post.as_ref().ok_or_else(not_started)?;
        let target_dir = validate_path(target_dir, self.layout.tree_dir(Tree::Export))?;
        let path = safe_join(&target_dir, self.export_file_name()?)?;

        write_atomic(&path, &self.export.document(post))?;
        Ok(path)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PostError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| PostError::io(path, e))
}

fn append_file(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| PostError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| PostError::io(path, e))
}

/// Write and sync next to `path`, then rename over it.
///
/// Readers never see a half-written export document.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let tmp = path.with_extension("html.tmp");
    let written = write_synced(&tmp, content).and_then(|()| {
        fs::rename(&tmp, path).map_err(|e| PostError::io(path, e))
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_synced(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PostError::io(parent, e))?;
    }
    let mut file = File::create(path).map_err(|e| PostError::io(path, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| PostError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageRole;
    use tempfile::TempDir;

    fn setup() -> (TempDir, DocumentBuilder) {
        let dir = TempDir::new().unwrap();
        let config = PostConfig::for_root(dir.path());
        let builder = DocumentBuilder::new(&config);
        builder.layout().ensure_dirs().unwrap();
        (dir, builder)
    }

    /// Put a stand-in derivative into the preview tree.
    fn imported(builder: &DocumentBuilder, role: ImageRole, id: &str) -> ImageRef {
        let image = ImageRef::new(role, id);
        let path = builder.layout().image_path(Tree::Preview, &image).unwrap();
        fs::write(path, b"webp").unwrap();
        image
    }

    fn meta(builder: &DocumentBuilder) -> PostMeta {
        PostMeta {
            page_title: "Trip".into(),
            title: "A trip".into(),
            subtitle: "By the sea".into(),
            author: "Ana".into(),
            date: "01/02/24".into(),
            header_image: imported(builder, ImageRole::Header, "fedcba9876543210"),
        }
    }

    #[test]
    fn test_append_before_start_rejected() {
        let (_dir, mut builder) = setup();
        let err = builder.append(Block::Quote { text: "q".into() }).unwrap_err();
        assert!(matches!(err, PostError::Validation(_)));
    }

    #[test]
    fn test_export_before_start_rejected() {
        let (_dir, builder) = setup();
        let target = builder.layout().export_post_dir();
        assert!(matches!(builder.export(&target), Err(PostError::Validation(_))));
    }

    #[test]
    fn test_start_requires_imported_header() {
        let (_dir, mut builder) = setup();
        let mut m = meta(&builder);
        m.header_image = ImageRef::new(ImageRole::Header, "0000000000000000");
        let err = builder.start(m).unwrap_err();
        assert!(err.to_string().contains("add it again"));
    }

    #[test]
    fn test_append_grows_preview_file() {
        let (_dir, mut builder) = setup();
        let m = meta(&builder);
        builder.start(m).unwrap();
        let path = builder.preview_path().unwrap();
        let before = fs::read_to_string(&path).unwrap();

        builder.append(Block::Header { text: "Intro".into() }).unwrap();
        let after = fs::read_to_string(&path).unwrap();

        assert!(after.starts_with(&before));
        assert!(after.ends_with(
            "<!-- postforge:block:header -->\n<h2 class=\"section-heading\">Intro</h2>\n<!-- /postforge:block -->\n"
        ));
        assert_eq!(builder.post().unwrap().blocks().len(), 1);
    }

    #[test]
    fn test_invalid_block_leaves_file_untouched() {
        let (_dir, mut builder) = setup();
        let m = meta(&builder);
        builder.start(m).unwrap();
        let path = builder.preview_path().unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let err = builder
            .append(Block::Link {
                url: "javascript:alert(1)".into(),
                label: "x".into(),
                title: None,
            })
            .unwrap_err();
        assert!(matches!(err, PostError::Validation(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert!(builder.post().unwrap().blocks().is_empty());
    }

    #[test]
    fn test_image_block_requires_derivative() {
        let (_dir, mut builder) = setup();
        let m = meta(&builder);
        builder.start(m).unwrap();

        let err = builder
            .append(Block::Image {
                image: ImageRef::new(ImageRole::Body, "0123456789abcdef"),
                alt: "a".into(),
                caption: "c".into(),
            })
            .unwrap_err();
        assert!(matches!(err, PostError::Validation(_)));
    }

    #[test]
    fn test_resume_preview_keeps_file() {
        let (_dir, mut builder) = setup();
        let m = meta(&builder);
        builder.start(m).unwrap();
        builder.append(Block::Text { text: "a\nb".into() }).unwrap();
        let path = builder.preview_path().unwrap();
        let before = fs::read_to_string(&path).unwrap();
        let expected = builder.post().cloned().unwrap();

        let mut fresh = DocumentBuilder {
            post: None,
            ..builder.clone()
        };
        let resumed = fresh.resume(&path).unwrap();
        assert_eq!(resumed, &expected);
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_resume_rejects_outside_trees() {
        let (dir, mut builder) = setup();
        let stray = dir.path().join("stray.html");
        fs::write(&stray, "<!DOCTYPE html>").unwrap();
        let err = builder.resume(&stray).unwrap_err();
        assert!(matches!(err, PostError::PathTraversal { .. }));
    }

    #[test]
    fn test_export_rejects_target_outside_tree() {
        let (dir, mut builder) = setup();
        let m = meta(&builder);
        builder.start(m).unwrap();
        let err = builder.export(dir.path()).unwrap_err();
        assert!(matches!(err, PostError::PathTraversal { .. }));
    }

    #[test]
    fn test_export_writes_once_without_tmp() {
        let (_dir, mut builder) = setup();
        let m = meta(&builder);
        builder.start(m).unwrap();
        let target = builder.layout().export_post_dir();

        let path = builder.export(&target).unwrap();
        assert!(path.ends_with("exp/post/post.html"));
        assert!(!path.with_extension("html.tmp").exists());
        let html = fs::read_to_string(&path).unwrap();
        assert!(html.trim_end().ends_with("<!-- /postforge:tail -->"));
    }
}
