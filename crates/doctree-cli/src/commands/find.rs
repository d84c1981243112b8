//! Find command implementation

use anyhow::{Result, bail};

use crate::args::FindTarget;
use crate::commands::window::{emit_blocks, emit_nodes};
use crate::output::OutputFormat;
use crate::utils::session::Session;

/// What to look for and how to page the result.
#[derive(Debug, Clone)]
pub struct FindRequest {
    pub target: FindTarget,
    pub context: Option<usize>,
    pub case_sensitive: bool,
    pub tree: bool,
    pub limit: Option<usize>,
    pub format: OutputFormat,
}

/// Execute the find command
///
/// Fails when the block id or text does not occur in the document.
pub fn execute(session: &mut Session, doc: &str, request: &FindRequest) -> Result<()> {
    let windower = session.config.window.windower();
    let tree_windower = session.config.window.tree_windower();
    let block_context = request.context.unwrap_or(session.config.window.block_context);
    let document = session.document(doc)?;
    let FindTarget { block, text } = &request.target;

    let found = if request.tree {
        let window = match (block, text) {
            (Some(id), _) => tree_windower.find_node_window(document, id, request.context, request.limit)?,
            (None, Some(text)) => tree_windower.find_text_window(
                document,
                text,
                request.case_sensitive,
                request.context,
                request.limit,
            )?,
            (None, None) => None,
        };
        window.map(|window| emit_nodes(&[window], request.format)).transpose()?
    } else {
        let window = match (block, text) {
            (Some(id), _) => windower.find_block_window(document, id, block_context, request.limit)?,
            (None, Some(text)) => windower.find_text_window(
                document,
                text,
                request.case_sensitive,
                block_context,
                request.limit,
            )?,
            (None, None) => None,
        };
        window.map(|window| emit_blocks(&[window], request.format)).transpose()?
    };

    if found.is_none() {
        match (block, text) {
            (Some(id), _) => bail!("Block '{id}' not found in '{doc}'"),
            (None, Some(text)) => bail!("Text '{text}' not found in '{doc}'"),
            (None, None) => bail!("Nothing to find: pass --block or --text"),
        }
    }
    Ok(())
}
