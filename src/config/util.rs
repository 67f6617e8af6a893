//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
///
/// ```text
/// /home/user/blog/temp/img/     ← start
/// /home/user/blog/postforge.toml  ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

/// Expand `~` and resolve `path` against `root` when relative.
pub fn expand_against(root: &Path, path: &Path) -> PathBuf {
    let expanded = match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    };
    if expanded.is_relative() {
        root.join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("temp/img");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("postforge.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("postforge.toml")).unwrap();
        assert_eq!(found, dir.path().join("postforge.toml"));
    }

    #[test]
    fn test_find_config_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(dir.path(), Path::new("no-such-config-file.toml")).is_none());
    }

    #[test]
    fn test_expand_relative_and_absolute() {
        let root = Path::new("/blog");
        assert_eq!(expand_against(root, Path::new("exp")), PathBuf::from("/blog/exp"));
        assert_eq!(expand_against(root, Path::new("/srv/www")), PathBuf::from("/srv/www"));
    }
}
