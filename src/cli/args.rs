//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use super::DEFAULT_CONFIG;

/// Compose a blog post block by block and export it as static HTML
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: postforge.toml)
    #[arg(short = 'C', long, global = true, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default postforge.toml and create the preview/export trees
    Init {
        /// Project directory (relative to current directory)
        #[arg(value_hint = clap::ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Start a new post with its header
    #[command(visible_alias = "s")]
    Start {
        #[command(flatten)]
        args: StartArgs,
    },

    /// Append a block to the post in progress
    #[command(visible_alias = "a")]
    Add {
        #[command(subcommand)]
        block: AddCommand,
    },

    /// Continue a post from a previously written preview or export file
    Resume {
        /// HTML document inside the preview or export tree
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Replace a different post already in progress
        #[arg(short, long)]
        force: bool,
    },

    /// Show the post in progress
    Status {
        /// Print the post as JSON
        #[arg(short, long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(short, long, requires = "json")]
        pretty: bool,
    },

    /// Print the preview file path and open it in the browser
    #[command(visible_alias = "p")]
    Preview {
        /// Only print the path
        #[arg(long)]
        no_open: bool,
    },

    /// Write the final page and images into the export tree
    #[command(visible_alias = "e")]
    Export {
        /// Keep the preview tree after a successful export
        #[arg(short, long)]
        keep_temp: bool,
    },

    /// Empty the preview tree
    Clean,
}

/// Header fields of a new post.
#[derive(clap::Args, Debug, Clone)]
pub struct StartArgs {
    /// Browser tab title, shown after the site title
    #[arg(long)]
    pub page_title: String,

    /// Article title
    #[arg(short, long)]
    pub title: String,

    /// Article subtitle
    #[arg(short, long)]
    pub subtitle: String,

    /// Author name (default: site.author)
    #[arg(short, long)]
    pub author: Option<String>,

    /// Header image (jpg, jpeg, png or webp)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub image: PathBuf,

    /// Date shown under the title (default: today, formatted by site.date_format)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Replace a post already in progress
    #[arg(short, long)]
    pub force: bool,
}

/// Block kinds that can be appended.
#[derive(Subcommand, Debug, Clone)]
pub enum AddCommand {
    /// Section heading
    #[command(visible_alias = "h")]
    Heading { text: String },

    /// Paragraph; line breaks are kept
    #[command(visible_alias = "t")]
    Text {
        /// Paragraph text, `-` to read stdin
        #[arg(required_unless_present = "file")]
        text: Option<String>,

        /// Read the paragraph from a file
        #[arg(short, long, conflicts_with = "text", value_hint = clap::ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Article image with alt text and caption
    #[command(visible_alias = "i")]
    Image {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,

        /// Alternative text
        #[arg(long)]
        alt: String,

        /// Caption shown under the image
        #[arg(short, long)]
        caption: String,
    },

    /// Blockquote
    #[command(visible_alias = "q")]
    Quote { text: String },

    /// Paragraph holding one link
    #[command(visible_alias = "l")]
    Link {
        /// http, https or mailto URL, or a relative reference
        url: String,

        /// Link text
        #[arg(short, long)]
        label: String,

        /// Tooltip
        #[arg(short, long)]
        title: Option<String>,
    },
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}
