//! Window command implementation

use anyhow::Result;
use doctree_core::{BlockWindow, NodeWindow};

use crate::args::PaginationArgs;
use crate::output::{OutputFormat, print_json};
use crate::utils::session::Session;

/// Which view to page through and how.
#[derive(Debug, Clone)]
pub struct WindowRequest {
    pub pagination: PaginationArgs,
    pub tree: bool,
    pub all: bool,
    pub format: OutputFormat,
}

/// Execute the window command
pub fn execute(session: &mut Session, doc: &str, request: &WindowRequest) -> Result<()> {
    let windower = session.config.window.windower();
    let tree_windower = session.config.window.tree_windower();
    let offset = request.pagination.offset_or_default();
    let limit = request.pagination.limit;
    let format = request.format;
    let document = session.document(doc)?;

    match (request.tree, request.all) {
        (false, false) => {
            let window = windower.create_window(document, offset, limit)?;
            emit_blocks(&[window], format)
        },
        (false, true) => {
            let windows: Vec<BlockWindow> = windower.generate_all_windows(document, limit)?.collect();
            emit_blocks(&windows, format)
        },
        (true, false) => {
            let window = tree_windower.window_tree(document, offset, limit)?;
            emit_nodes(&[window], format)
        },
        (true, true) => {
            let windows: Vec<NodeWindow> = tree_windower.generate_all_windows(document, limit)?.collect();
            emit_nodes(&windows, format)
        },
    }
}

pub fn emit_blocks(windows: &[BlockWindow], format: OutputFormat) -> Result<()> {
    match (format, windows) {
        (OutputFormat::Json, [window]) => print_json(window),
        (OutputFormat::Json, _) => print_json(windows),
        (OutputFormat::Text, _) => {
            let pages: Vec<String> = windows.iter().map(BlockWindow::to_markdown).collect();
            println!("{}", pages.join("\n\n"));
            Ok(())
        },
    }
}

pub fn emit_nodes(windows: &[NodeWindow], format: OutputFormat) -> Result<()> {
    match (format, windows) {
        (OutputFormat::Json, [window]) => print_json(window),
        (OutputFormat::Json, _) => print_json(windows),
        (OutputFormat::Text, _) => {
            let pages: Vec<String> = windows.iter().map(NodeWindow::to_markdown).collect();
            println!("{}", pages.join("\n\n"));
            Ok(())
        },
    }
}
