//! Preview tree cleanup.

use std::fs;

use crate::debug;
use crate::layout::{Layout, Tree};

/// Remove everything inside the preview tree, keeping the directory.
///
/// Best effort: entries that cannot be removed are skipped. Returns the
/// number of entries removed.
pub fn clean_preview(layout: &Layout) -> usize {
    let dir = layout.tree_dir(Tree::Preview);
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
        let result = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        match result {
            Ok(()) => removed += 1,
            Err(e) => debug!("clean"; "skipped {}: {}", path.display(), e),
        }
    }
    removed
}
