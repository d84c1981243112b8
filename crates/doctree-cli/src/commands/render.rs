//! Render command implementation

use anyhow::Result;

use crate::args::RenderStyle;
use crate::output::print_json;
use crate::utils::session::Session;

/// Execute the render command
pub fn execute(session: &mut Session, doc: &str, style: RenderStyle) -> Result<()> {
    let document = session.document(doc)?;
    match style {
        RenderStyle::Markdown => println!("{}", document.to_markdown()?),
        RenderStyle::Rst => println!("{}", document.to_rst()?),
        RenderStyle::Outline => print_json(&document.to_outline()?)?,
    }
    Ok(())
}
