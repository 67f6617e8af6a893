//! Project configuration management for `postforge.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── assets     # [assets]
//! │   ├── export     # [export]
//! │   ├── image      # [image]
//! │   ├── layout     # [layout]
//! │   └── site       # [site]
//! ├── types/         # ConfigError, ConfigDiagnostics
//! └── mod.rs         # PostConfig (this file)
//! ```
//!
//! The project root is the directory holding `postforge.toml`; every
//! relative path in the file is resolved against it.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{AssetSet, AssetsConfig, ExportConfig, ImageConfig, LayoutConfig, SiteConfig};
pub use types::{ConfigDiagnostics, ConfigError};

use crate::cli::{Cli, Commands};
use crate::log;
use crate::security::normalize_path;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing postforge.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub assets: AssetsConfig,
}

impl PostConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// `init` starts from defaults rooted at its target directory; every
    /// other command searches upward from cwd for the config file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        if !cli.is_init() && !exists {
            bail!(ConfigError::NotFound(cli.config.clone()));
        }

        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        config.validate_paths(&root)?;
        config.config_path = config_path;
        config.normalize(&root);
        config.validate()?;

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        match &cli.command {
            Commands::Init { dir } => {
                let base = dir.as_ref().map_or_else(|| cwd.clone(), |d| cwd.join(d));
                let path = base.join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            _ => match find_config_file(&cwd, &cli.config) {
                Some(path) => Ok((path, true)),
                None => Ok((cwd.join(&cli.config), false)),
            },
        }
    }

    /// Configuration rooted at `root` with every section at its default.
    #[cfg(test)]
    pub fn for_root(root: &Path) -> Self {
        let mut config = Self {
            config_path: root.join(crate::cli::DEFAULT_CONFIG),
            ..Self::default()
        };
        config.normalize(root);
        config
    }

    /// Parse configuration from TOML string
    #[cfg(test)]
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("Failed to parse `{}`", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored: {}", display_path, fields.join(", "));
    }

    /// Serialized defaults, written by `init`.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Self::default()).context("Failed to serialize default config")
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Make the root and every configured path absolute.
    fn normalize(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.config_path = normalize_path(&self.config_path);
        self.layout.normalize(&root);
        self.root = root;
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Pre-validate paths before normalization.
    ///
    /// Normalization turns every path absolute, after which a relative
    /// `preview` can no longer be told apart from an absolute one.
    fn validate_paths(&self, root: &Path) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.layout.validate_paths(root, &mut diag);
        diag.into_result().map_err(Into::into)
    }

    /// Validate every section, reporting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.site.validate(&mut diag);
        self.layout.validate(&mut diag);
        self.export.validate(&mut diag);
        self.image.validate(&mut diag);
        self.assets.validate(&mut diag);

        diag.into_result().map_err(Into::into)
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PostConfig {
    let (parsed, ignored) = PostConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_invalid_toml() {
        assert!(PostConfig::parse("[site\ntitle = \"My Blog\"").is_err());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[site]\ntitle = \"Blog\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = PostConfig::parse_with_ignored(content).unwrap();

        assert_eq!(config.site.title, "Blog");
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_default_toml_round_trips() {
        let content = PostConfig::default_toml().unwrap();
        let parsed = test_parse_config(&content);
        assert_eq!(parsed.layout.preview, PathBuf::from("temp"));
        assert_eq!(parsed.export.file_name, "post.html");
        assert_eq!(parsed.assets.export_js.len(), 3);
    }

    #[test]
    fn test_for_root_resolves_layout() {
        let dir = TempDir::new().unwrap();
        let config = PostConfig::for_root(dir.path());
        let root = normalize_path(dir.path());
        assert_eq!(config.get_root(), root);
        assert_eq!(config.layout.preview, root.join("temp"));
        assert_eq!(config.layout.export, root.join("exp"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = test_parse_config(
            "[export]\nfile_name = \"post.txt\"\n[image]\nbody = { width = 0, height = 1 }",
        );
        let dir = TempDir::new().unwrap();
        config.normalize(dir.path());

        let err = config.validate().unwrap_err();
        let Some(ConfigError::Diagnostics(diag)) = err.downcast_ref::<ConfigError>() else {
            panic!("expected diagnostics, got {err}");
        };
        assert_eq!(diag.errors().len(), 2);
    }

    #[test]
    fn test_root_relative() {
        let dir = TempDir::new().unwrap();
        let config = PostConfig::for_root(dir.path());
        let path = config.get_root().join("exp/post/post.html");
        assert_eq!(config.root_relative(&path), PathBuf::from("exp/post/post.html"));
    }
}
