//! Command-line interface module.

mod args;
pub mod add;
pub mod clean;
pub mod export;
pub mod init;
pub mod preview;
pub mod resume;
pub mod start;
pub mod status;

pub use args::{AddCommand, Cli, Commands, StartArgs};

/// Config file name searched upward from the working directory.
pub const DEFAULT_CONFIG: &str = "postforge.toml";
