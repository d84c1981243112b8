//! Text renderings of a [`DocTree`].
//!
//! All renderers walk the tree in pre-order, so output order always matches
//! block order. None of them recurse.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::tree::{DocTree, NodeId};
use crate::types::{Block, DocumentMeta};

/// Placeholder body used when a document has no blocks.
pub const NO_CONTENT: &str = "(No content available)";

const RST_UNDERLINES: [char; 6] = ['=', '-', '~', '"', '\'', '`'];

/// Markdown rendering. Nested list items are indented two spaces per level of
/// depth below the root.
#[must_use]
pub fn markdown(title: &str, tree: &DocTree) -> String {
    if tree.is_empty() {
        return format!("# {title}\n\n{NO_CONTENT}");
    }

    tree.preorder()
        .map(|(_, level, node)| markdown_line(node.block(), level))
        .collect::<Vec<_>>()
        .join("\n")
}

fn markdown_line(block: &Block, level: usize) -> String {
    let indent = "  ".repeat(level);
    let content = &block.content;
    if let Some(heading) = block.heading_level() {
        return format!("{} {content}", "#".repeat(heading));
    }
    match block.block_type.as_str() {
        "bulleted_list_item" => format!("{indent}- {content}"),
        "numbered_list_item" => format!("{indent}1. {content}"),
        "to_do" => format!("{indent}- [ ] {content}"),
        "code" => format!("```\n{content}\n```"),
        "quote" => format!("> {content}"),
        "divider" => "---".to_string(),
        _ => content.clone(),
    }
}

/// reStructuredText rendering, one blank line between blocks.
#[must_use]
pub fn rst(title: &str, tree: &DocTree) -> String {
    if tree.is_empty() {
        let underline = "=".repeat(title.chars().count());
        return format!("{title}\n{underline}\n\n{NO_CONTENT}");
    }

    tree.preorder()
        .map(|(_, level, node)| rst_section(node.block(), level))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn rst_section(block: &Block, level: usize) -> String {
    let indent = "  ".repeat(level);
    let content = &block.content;
    if let Some(heading) = block.heading_level() {
        let mark = RST_UNDERLINES[heading.clamp(1, RST_UNDERLINES.len()) - 1];
        let underline: String = std::iter::repeat_n(mark, content.chars().count()).collect();
        return format!("{content}\n{underline}");
    }
    match block.block_type.as_str() {
        "bulleted_list_item" | "to_do" => format!("{indent}* {content}"),
        "numbered_list_item" => format!("{indent}#. {content}"),
        "code" => format!(".. code-block::\n\n   {}", content.replace('\n', "\n   ")),
        "quote" => content
            .split('\n')
            .map(|line| format!("   {line}"))
            .collect::<Vec<_>>()
            .join("\n"),
        "divider" => "----".to_string(),
        _ => content.clone(),
    }
}

/// Nested outline of a document, serializable as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub id: String,
    pub title: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    pub content: Vec<OutlineEntry>,
}

/// One outline position.
///
/// Entries are kept in a list rather than keyed by `key`, so two blocks that
/// share a key both survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub key: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineEntry>,
}

/// Build the outline for `meta` over `tree`.
#[must_use]
pub fn outline(meta: &DocumentMeta, tree: &DocTree) -> Outline {
    Outline {
        id: meta.id.clone(),
        title: meta.title.clone(),
        created_time: meta.created_time,
        last_edited_time: meta.last_edited_time,
        content: outline_entries(tree),
    }
}

fn outline_entries(tree: &DocTree) -> Vec<OutlineEntry> {
    let slots = tree.len() + 1;
    let mut levels = vec![0usize; slots];
    for (id, level, _) in tree.preorder() {
        levels[id] = level;
    }

    // Child indices are always larger than their parent's; a reverse sweep
    // finishes every child before its parent asks for it.
    let mut built: Vec<Option<OutlineEntry>> = vec![None; slots];
    for id in (1..slots).rev() {
        let Some(node) = tree.get(id) else { continue };
        let block = node.block();
        built[id] = Some(OutlineEntry {
            key: outline_key(block, levels[id]),
            entry_type: block.block_type.clone(),
            content: block.content.clone(),
            children: take_children(&mut built, node.children()),
        });
    }

    take_children(&mut built, tree.root().children())
}

fn take_children(built: &mut [Option<OutlineEntry>], children: &[NodeId]) -> Vec<OutlineEntry> {
    children
        .iter()
        .filter_map(|&child| built.get_mut(child).and_then(Option::take))
        .collect()
}

fn outline_key(block: &Block, level: usize) -> String {
    let prefix = if block.heading_level().is_some() {
        "heading"
    } else {
        match block.block_type.as_str() {
            "bulleted_list_item" => "bullet",
            "numbered_list_item" => "numbered",
            other => other,
        }
    };
    format!("{prefix}_{level}_{}", clean_key(&block.content))
}

/// First three words, punctuation removed, lowercased, joined by `_`.
fn clean_key(text: &str) -> String {
    text.split_whitespace()
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "_")
}

/// Markdown for a slice of blocks shown as one page of a larger document.
///
/// Headings are shifted one level down so the page header stays on top.
pub fn window_markdown<'a>(
    title: &str,
    start: usize,
    end: usize,
    total: usize,
    blocks: impl IntoIterator<Item = &'a Block>,
    has_next: bool,
) -> String {
    let mut lines = vec![format!("# {title} (Window {start}-{end} of {total})")];
    for block in blocks {
        let content = &block.content;
        let line = match (block.heading_level(), block.block_type.as_str()) {
            (Some(level), _) => format!("{} {content}", "#".repeat(level + 1)),
            (None, "bulleted_list_item") => format!("- {content}"),
            (None, "numbered_list_item") => format!("1. {content}"),
            (None, "paragraph") => format!("{content}\n"),
            (None, "code") => format!("```\n{content}\n```"),
            (None, "quote") => format!("> {content}"),
            _ => content.clone(),
        };
        lines.push(line);
    }
    if has_next {
        lines.push("\n---\n*More content available in next window*".to_string());
    }
    lines.join("\n")
}
