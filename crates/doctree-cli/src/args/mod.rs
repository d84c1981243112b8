//! Reusable argument groups, flattened into commands with `#[command(flatten)]`.

mod document;
mod pagination;

pub use document::{DepthArg, DocumentArgs, FindTarget, PreviewMode, RenderStyle};
pub use pagination::PaginationArgs;
