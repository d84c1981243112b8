//! Arguments that pick a document and say what to do with it.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use doctree_core::DepthMode;

/// Source directory plus a document id inside it.
#[derive(Args, Clone, Debug)]
pub struct DocumentArgs {
    /// Directory holding the documents
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Document id: the file path relative to DIR
    #[arg(value_name = "DOC")]
    pub doc: String,

    /// How blocks nest in the outline (overrides the config file)
    #[arg(long, value_enum, value_name = "MODE")]
    pub depth_mode: Option<DepthArg>,
}

/// Command-line spelling of [`DepthMode`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DepthArg {
    /// Nest by block type only
    Type,
    /// Nest list items by their indentation as well
    Indent,
}

impl From<DepthArg> for DepthMode {
    fn from(arg: DepthArg) -> Self {
        match arg {
            DepthArg::Type => Self::Type,
            DepthArg::Indent => Self::Indent,
        }
    }
}

/// Whole-document renderings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderStyle {
    Markdown,
    Rst,
    /// Nested JSON outline
    Outline,
}

/// At most one preview bound. A bound given without a number takes its size
/// from the `[preview]` config; with no bound the configured block count
/// applies.
#[derive(Args, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[group(multiple = false)]
pub struct PreviewMode {
    /// Show the first N blocks
    #[arg(long, value_name = "N", num_args = 0..=1)]
    pub blocks: Option<Option<usize>>,

    /// Show the first N characters of text
    #[arg(long, value_name = "N", num_args = 0..=1)]
    pub chars: Option<Option<usize>>,

    /// Show the first N sentences
    #[arg(long, value_name = "N", num_args = 0..=1)]
    pub sentences: Option<Option<usize>>,
}

/// Exactly one thing to look for.
#[derive(Args, Clone, Debug)]
#[group(required = true, multiple = false)]
pub struct FindTarget {
    /// Block id to locate
    #[arg(long, value_name = "ID")]
    pub block: Option<String>,

    /// Text to locate (first block containing it)
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,
}
