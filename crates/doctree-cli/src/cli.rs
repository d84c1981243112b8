//! # CLI Structure and Argument Parsing
//!
//! `doctree` reads a directory of markdown and text files, rebuilds the outline
//! each document implies and pages through it.
//!
//! ```bash
//! doctree list ./docs
//! doctree tree ./docs guide.md
//! doctree render ./docs guide.md --as rst
//! doctree window ./docs guide.md --offset 20 --limit 10 --tree
//! doctree find ./docs guide.md --text "install" --context 2
//! ```
//!
//! Every command takes the source directory first and, except `list`, a
//! document id (the file path relative to that directory).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::args::{DocumentArgs, FindTarget, PaginationArgs, PreviewMode, RenderStyle};
use crate::output::{FormatArg, OutputFormat};

/// Main CLI structure for the `doctree` command
#[derive(Parser, Clone, Debug)]
#[command(name = "doctree")]
#[command(version)]
#[command(about = "doctree - outline, render and page through local documents", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Read settings from this TOML file instead of the platform config dir
    #[arg(long, global = true, value_name = "PATH", env = "DOCTREE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// List the documents in a directory
    List {
        /// Directory holding the documents
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        #[command(flatten)]
        format: FormatArg,
    },

    /// Print the outline a document's blocks imply
    Tree {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        format: FormatArg,
    },

    /// Render a whole document
    Render {
        #[command(flatten)]
        document: DocumentArgs,

        /// Output style
        #[arg(long = "as", value_enum, default_value_t = RenderStyle::Markdown)]
        style: RenderStyle,
    },

    /// Show the beginning of a document
    Preview {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        mode: PreviewMode,
    },

    /// Show one page of blocks, or of outline nodes with `--tree`
    Window {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        pagination: PaginationArgs,

        /// Page through the flattened outline instead of the raw blocks
        #[arg(long)]
        tree: bool,

        /// Print every page in order instead of a single one
        #[arg(long, conflicts_with = "offset")]
        all: bool,

        #[command(flatten)]
        format: FormatArg,
    },

    /// Show the page around a block id or the first block containing some text
    Find {
        #[command(flatten)]
        document: DocumentArgs,

        #[command(flatten)]
        target: FindTarget,

        /// Items of leading context before the match
        #[arg(short = 'C', long, value_name = "COUNT")]
        context: Option<usize>,

        /// Match `--text` case-sensitively
        #[arg(long)]
        case_sensitive: bool,

        /// Search the flattened outline instead of the raw blocks
        #[arg(long)]
        tree: bool,

        /// Maximum number of items in the page
        #[arg(short = 'l', long, value_name = "COUNT")]
        limit: Option<usize>,

        #[command(flatten)]
        format: FormatArg,
    },
}

impl Commands {
    /// Output format of commands that have one.
    pub const fn output_format(&self) -> Option<OutputFormat> {
        match self {
            Self::List { format, .. }
            | Self::Tree { format, .. }
            | Self::Window { format, .. }
            | Self::Find { format, .. } => Some(format.format),
            Self::Render { .. } | Self::Preview { .. } => None,
        }
    }
}
