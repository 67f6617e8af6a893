//! Error taxonomy for the post services.
//!
//! Library code returns [`PostError`]; the CLI layer wraps it in
//! `anyhow` with command context.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T, E = PostError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PostError {
    /// Bad block or header content.
    #[error("{0}")]
    Validation(String),

    /// A resumed file does not match the fragment-marker layout.
    #[error("cannot resume `{}`: {reason}", path.display())]
    CorruptDocument { path: PathBuf, reason: String },

    #[error("unsupported image `{}`: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    #[error("failed to encode `{}` as webp: {reason}", path.display())]
    Encode { path: PathBuf, reason: String },

    #[error("path `{}` escapes `{}`", path.display(), root.display())]
    PathTraversal { path: PathBuf, root: PathBuf },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("another export is running (lock file `{}`)", .0.display())]
    ExportBusy(PathBuf),
}

impl PostError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn corrupt(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::CorruptDocument {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn unsupported(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Errors caused by user input rather than the environment.
    ///
    /// These abort the single operation and are shown without a cause chain.
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::PathTraversal { .. }
                | Self::UnsupportedFormat { .. }
                | Self::ExportBusy(_)
        )
    }

    /// Errors after which repeating the same export may succeed.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Encode { .. } | Self::ExportBusy(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_io_error_display() {
        let err = PostError::io("exp/post/post.html", io::Error::new(ErrorKind::Other, "disk full"));
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("exp/post/post.html"));
        assert!(err.is_retryable());
        assert!(!err.is_user_facing());
    }

    #[test]
    fn test_traversal_is_user_facing() {
        let err = PostError::PathTraversal {
            path: PathBuf::from("/etc/passwd"),
            root: PathBuf::from("/site"),
        };
        assert!(err.is_user_facing());
        assert_eq!(err.to_string(), "path `/etc/passwd` escapes `/site`");
    }

    #[test]
    fn test_corrupt_display_names_file() {
        let err = PostError::corrupt("temp/post.html", "missing postforge signature");
        assert_eq!(
            err.to_string(),
            "cannot resume `temp/post.html`: missing postforge signature"
        );
    }
}
