//! List command implementation

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use doctree_core::DocumentMeta;
use serde::Serialize;

use crate::output::{OutputFormat, print_json};
use crate::utils::session::Session;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInfo<'a> {
    id: &'a str,
    title: &'a str,
    last_edited_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_id: Option<&'a str>,
}

impl<'a> From<&'a DocumentMeta> for DocumentInfo<'a> {
    fn from(meta: &'a DocumentMeta) -> Self {
        Self {
            id: &meta.id,
            title: &meta.title,
            last_edited_time: meta.last_edited_time,
            source_id: meta.source_id.as_deref(),
        }
    }
}

/// Execute the list command
pub fn execute(session: &mut Session, format: OutputFormat) -> Result<()> {
    session
        .collection
        .preload_metadata()
        .with_context(|| format!("Failed to list documents in {}", session.dir().display()))?;

    let documents: Vec<DocumentInfo<'_>> = session
        .collection
        .documents()
        .map(|document| DocumentInfo::from(document.meta()))
        .collect();

    match format {
        OutputFormat::Text => print_text(&documents, session),
        OutputFormat::Json => print_json(&documents)?,
    }
    Ok(())
}

fn print_text(documents: &[DocumentInfo<'_>], session: &Session) {
    if documents.is_empty() {
        println!(
            "No documents matching '{}' in {}",
            session.config.local.pattern,
            session.dir().display()
        );
        return;
    }

    for document in documents {
        println!(
            "{}  {}  {}",
            document.id.cyan(),
            document.title.bold(),
            document
                .last_edited_time
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }
}
