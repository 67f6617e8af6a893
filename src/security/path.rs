//! Path containment checks for every file the tool reads or writes.
//!
//! - `normalize_path` - absolute form (canonicalize + fallback)
//! - `validate_path` - reject paths resolving outside an allowed root
//! - `safe_join` - join a relative path onto a base, then validate

use std::path::{Component, Path, PathBuf};

use crate::error::{PostError, Result};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to joining with the current directory and lexical cleanup.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        };
        lexical_clean(&absolute)
    })
}

/// Check that `path` resolves inside `allowed_root`.
///
/// Relative paths are taken relative to the root. `..` segments are
/// resolved lexically, then the longest existing ancestor is canonicalized
/// so a symlink inside the root cannot point the result elsewhere.
///
/// Returns the resolved absolute path.
pub fn validate_path(path: &Path, allowed_root: &Path) -> Result<PathBuf> {
    let root = normalize_path(allowed_root);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let resolved = resolve_existing_prefix(&lexical_clean(&joined));
    if resolved.starts_with(&root) {
        Ok(resolved)
    } else {
        Err(PostError::PathTraversal {
            path: path.to_path_buf(),
            root,
        })
    }
}

/// Join `relative` onto `base`, failing if the result leaves `base`.
#[inline]
pub fn safe_join(base: &Path, relative: impl AsRef<Path>) -> Result<PathBuf> {
    validate_path(relative.as_ref(), base)
}

/// Resolve `.` and `..` without touching the filesystem.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // `pop` stops at the root, so `/..` stays `/`
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the deepest existing ancestor and re-append the rest.
fn resolve_existing_prefix(path: &Path) -> PathBuf {
    let mut existing = path;
    let mut tail = Vec::new();

    loop {
        if let Ok(canonical) = existing.canonicalize() {
            let mut resolved = canonical;
            for part in tail.iter().rev() {
                resolved.push(part);
            }
            return resolved;
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return path.to_path_buf(),
        }
    }
}
