//! Preview command implementation

use anyhow::Result;
use colored::Colorize;

use crate::args::PreviewMode;
use crate::utils::session::Session;

/// Execute the preview command
///
/// Bounds given without a number, and the no-bound default, come from the
/// `[preview]` section of the config.
pub fn execute(session: &mut Session, doc: &str, mode: PreviewMode) -> Result<()> {
    let defaults = session.config.preview.clone();
    let document = session.document(doc)?;

    if let Some(chars) = mode.chars {
        println!("{}", document.preview_text(chars.unwrap_or(defaults.chars))?);
    } else if let Some(sentences) = mode.sentences {
        println!(
            "{}",
            document.preview_sentences(sentences.unwrap_or(defaults.sentences))?
        );
    } else {
        let count = mode.blocks.flatten().unwrap_or(defaults.blocks);
        for block in document.preview_blocks(count)? {
            println!("{} {}", format!("[{}]", block.block_type).dimmed(), block.content);
        }
    }
    Ok(())
}
