//! Tree command implementation

use anyhow::Result;
use colored::Colorize;
use doctree_core::{Block, DocTree, NO_CONTENT};

use crate::output::{OutputFormat, print_json};
use crate::utils::session::Session;

const SUMMARY_CHARS: usize = 72;

/// Execute the tree command
pub fn execute(session: &mut Session, doc: &str, format: OutputFormat) -> Result<()> {
    let document = session.document(doc)?;
    let tree = document.tree()?;

    match format {
        OutputFormat::Text => print!("{}", outline_text(tree)),
        OutputFormat::Json => print_json(&tree.to_value())?,
    }
    Ok(())
}

/// One line per node, indented two spaces per level.
fn outline_text(tree: &DocTree) -> String {
    if tree.is_empty() {
        return format!("{NO_CONTENT}\n");
    }

    let mut out = String::new();
    for (_, depth, node) in tree.preorder() {
        let block = node.block();
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} {}\n", label(block).dimmed(), summary(block)));
    }
    out
}

fn label(block: &Block) -> String {
    block.heading_level().map_or_else(
        || format!("[{}]", block.block_type),
        |level| "#".repeat(level),
    )
}

/// First line of the content, shortened on a char boundary.
fn summary(block: &Block) -> String {
    let line = block.content.lines().next().unwrap_or_default();
    if line.chars().count() > SUMMARY_CHARS {
        let cut: String = line.chars().take(SUMMARY_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}
