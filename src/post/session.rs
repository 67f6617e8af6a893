//! The post under composition, owned by the command that runs.

use std::fs::{self, File, OpenOptions, TryLockError};
use std::path::{Path, PathBuf};

use super::builder::{Composer, DocumentBuilder};
use super::{Block, Post, PostMeta};
use crate::config::PostConfig;
use crate::error::{PostError, Result};
use crate::image::{ImageAsset, ImagePipeline, ImageRef, ImageRole};
use crate::layout::{Layout, Tree};
use crate::{debug, log};

const LOCK_FILE: &str = ".postforge.lock";

/// Header fields of a post to start, with the header image source.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub page_title: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub header_image: PathBuf,
}

/// What an export produced.
#[derive(Debug)]
pub struct ExportReport {
    pub document: PathBuf,
    pub images: Vec<ImageAsset>,
}

/// Exclusive OS lock on the export tree's lock file, held for one export.
///
/// The file itself stays on disk. The lock dies with its process, so an
/// export that was killed never blocks the next one.
#[derive(Debug)]
pub struct ExportLock {
    path: PathBuf,
    file: File,
}

impl ExportLock {
    pub fn acquire(export_dir: &Path) -> Result<Self> {
        fs::create_dir_all(export_dir).map_err(|e| PostError::io(export_dir, e))?;
        let path = export_dir.join(LOCK_FILE);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| PostError::io(&path, e))?;

        match file.try_lock() {
            Ok(()) => Ok(Self { path, file }),
            Err(TryLockError::WouldBlock) => Err(PostError::ExportBusy(path)),
            Err(TryLockError::Error(e)) => Err(PostError::io(&path, e)),
        }
    }
}

impl Drop for ExportLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            debug!("export"; "failed to unlock {}: {}", self.path.display(), e);
        }
    }
}

/// Builder plus image pipeline for one post.
#[derive(Debug)]
pub struct Session {
    builder: DocumentBuilder,
    pipeline: ImagePipeline,
}

impl Session {
    /// A session without a post.
    pub fn new(config: &PostConfig) -> Self {
        let builder = DocumentBuilder::new(config);
        let pipeline = ImagePipeline::new(builder.layout().clone(), &config.image);
        Self { builder, pipeline }
    }

    /// Resume the post in progress from the preview file.
    pub fn open(config: &PostConfig) -> Result<Self> {
        let mut session = Self::new(config);
        let path = session.builder.preview_path()?;
        if !path.is_file() {
            return Err(PostError::validation(
                "no post in progress, run `postforge start` first",
            ));
        }
        session.builder.resume(&path)?;
        Ok(session)
    }

    /// Resume the post in progress if the preview file parses.
    ///
    /// A corrupt preview file is reported and skipped.
    pub fn resume_or_fresh(config: &PostConfig) -> Result<Self> {
        let mut session = Self::new(config);
        let path = session.builder.preview_path()?;
        if path.is_file()
            && let Err(e) = session.builder.resume(&path)
        {
            log!("warning"; "{}, starting fresh", e);
        }
        Ok(session)
    }

    /// Resume from any document written into either tree.
    ///
    /// A different post in the preview file is only replaced with
    /// `replace`; a corrupt preview file is replaced either way.
    pub fn resume_from(config: &PostConfig, path: &Path, replace: bool) -> Result<Self> {
        let mut session = Self::new(config);
        if !replace {
            let (_, incoming) = session.builder.read(path)?;
            let preview = session.builder.preview_path()?;
            if preview.is_file()
                && let Ok((_, current)) = session.builder.read(&preview)
                && current.post != incoming.post
            {
                return Err(PostError::validation(format!(
                    "post `{}` is in progress, export it or pass --force to replace it",
                    current.post.meta.title
                )));
            }
        }
        session.builder.resume(path)?;
        Ok(session)
    }

    pub const fn post(&self) -> Option<&Post> {
        self.builder.post()
    }

    pub const fn layout(&self) -> &Layout {
        self.builder.layout()
    }

    pub fn preview_path(&self) -> Result<PathBuf> {
        self.builder.preview_path()
    }

    /// Import the header image and write the preview head.
    pub fn begin(&mut self, draft: NewPost) -> Result<&Post> {
        self.layout().ensure_dirs()?;
        let header_image = self.pipeline.import(&draft.header_image, ImageRole::Header)?;
        self.builder.start(PostMeta {
            page_title: draft.page_title,
            title: draft.title,
            subtitle: draft.subtitle,
            author: draft.author,
            date: draft.date,
            header_image,
        })
    }

    pub fn add(&mut self, block: Block) -> Result<()> {
        self.builder.append(block)
    }

    /// Import an article image and append its block.
    pub fn add_image(&mut self, source: &Path, alt: String, caption: String) -> Result<ImageRef> {
        if self.post().is_none() {
            return Err(PostError::validation(
                "no post in progress, run `postforge start` first",
            ));
        }
        Block::validate_image_text(&alt, &caption)?;
        let image = self.pipeline.import(source, ImageRole::Body)?;
        self.builder.append(Block::Image {
            image: image.clone(),
            alt,
            caption,
        })?;
        Ok(image)
    }

    /// Materialize every image into the export tree, then write the page.
    ///
    /// Nothing is removed on failure, so the export can be repeated.
    pub fn export(&self) -> Result<ExportReport> {
        let post = self.post().ok_or_else(|| {
            PostError::validation("no post in progress, run `postforge start` first")
        })?;
        let layout = self.layout();
        let _lock = ExportLock::acquire(layout.tree_dir(Tree::Export))?;
        layout.ensure_dirs()?;

        let images = self.pipeline.materialize(&post.images())?;
        let document = self.builder.export(&layout.export_post_dir())?;
        Ok(ExportReport { document, images })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_second_lock_is_busy() {
        let dir = TempDir::new().unwrap();
        let first = ExportLock::acquire(dir.path()).unwrap();
        let err = ExportLock::acquire(dir.path()).unwrap_err();
        assert!(matches!(err, PostError::ExportBusy(_)));

        drop(first);
        assert!(ExportLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_leftover_lock_file_is_not_busy() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(LOCK_FILE), "").unwrap();

        let lock = ExportLock::acquire(dir.path()).unwrap();
        assert!(matches!(
            ExportLock::acquire(dir.path()).unwrap_err(),
            PostError::ExportBusy(_)
        ));
        drop(lock);
        assert!(ExportLock::acquire(dir.path()).is_ok());
    }

    #[test]
    fn test_open_without_post() {
        let dir = TempDir::new().unwrap();
        let config = PostConfig::for_root(dir.path());
        let err = Session::open(&config).err().unwrap();
        assert!(err.to_string().contains("postforge start"));
    }

    #[test]
    fn test_corrupt_preview_falls_back_to_fresh() {
        let dir = TempDir::new().unwrap();
        let config = PostConfig::for_root(dir.path());
        fs::create_dir_all(dir.path().join("temp")).unwrap();
        fs::write(dir.path().join("temp/post.html"), "<html>hand written</html>").unwrap();

        let session = Session::resume_or_fresh(&config).unwrap();
        assert!(session.post().is_none());
        assert!(matches!(
            Session::open(&config).err().unwrap(),
            PostError::CorruptDocument { .. }
        ));
    }
}
