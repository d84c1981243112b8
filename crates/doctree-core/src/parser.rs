//! Markdown and plain text to [`Block`] sequences.
//!
//! Markdown goes through tree-sitter. The walk is iterative and carries the
//! list nesting depth so list items come out with their `indent_level` set.

use tracing::{debug, warn};
use tree_sitter::{Node, Parser};

use crate::error::{Error, Result};
use crate::types::Block;

/// Turns markdown text into a flat, ordered block sequence.
pub struct MarkdownBlockParser {
    parser: Parser,
}

impl std::fmt::Debug for MarkdownBlockParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownBlockParser").finish_non_exhaustive()
    }
}

impl MarkdownBlockParser {
    /// # Errors
    ///
    /// Fails when the markdown grammar cannot be loaded.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Parse `text`, numbering block ids `<id_prefix>_1`, `<id_prefix>_2`, ...
    ///
    /// # Errors
    ///
    /// Fails when tree-sitter produces no tree at all. Malformed markdown still
    /// parses; it is logged and whatever structure was recovered is used.
    pub fn parse(&mut self, text: &str, id_prefix: &str) -> Result<Vec<Block>> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| Error::Parse("Failed to parse markdown".into()))?;

        let root = tree.root_node();
        if root.has_error() {
            warn!(id_prefix, "markdown parse tree contains errors");
        }

        let mut emitter = Emitter::new(id_prefix);
        let mut stack: Vec<(Node, usize)> = vec![(root, 0)];

        while let Some((node, indent)) = stack.pop() {
            match node.kind() {
                "document" | "section" => push_children(&mut stack, node, indent, |_| true),
                "list" => push_children(&mut stack, node, indent, |child| child.kind() == "list_item"),
                "list_item" => {
                    let (block_type, content, first_paragraph) = list_item(node, text);
                    let has_children = named_children(node).any(|child| child.kind() == "list");
                    emitter.emit(&block_type, content, indent, has_children);
                    push_children(&mut stack, node, indent + 1, |child| {
                        Some(child.id()) != first_paragraph && is_block(child)
                    });
                },
                "atx_heading" => {
                    let level = heading_level(node);
                    let content = node
                        .child_by_field_name("heading_content")
                        .map_or_else(
                            || node_text(node, text).trim_start_matches('#').trim().to_string(),
                            |content| node_text(content, text).trim().to_string(),
                        );
                    emitter.emit(&format!("heading_{level}"), content, 0, false);
                },
                "setext_heading" => {
                    let level = heading_level(node);
                    let content = node
                        .child_by_field_name("heading_content")
                        .map_or_else(String::new, |content| clean_lines(node_text(content, text)));
                    emitter.emit(&format!("heading_{level}"), content, 0, false);
                },
                "paragraph" => emitter.emit("paragraph", clean_lines(node_text(node, text)), indent, false),
                "fenced_code_block" => {
                    let content = named_children(node)
                        .find(|child| child.kind() == "code_fence_content")
                        .map(|child| node_text(child, text).trim_end_matches(['\n', '\r']).to_string())
                        .unwrap_or_default();
                    emitter.emit("code", content, indent, false);
                },
                "indented_code_block" => {
                    let content = node_text(node, text)
                        .lines()
                        .map(|line| line.strip_prefix("    ").or_else(|| line.strip_prefix('\t')).unwrap_or(line))
                        .collect::<Vec<_>>()
                        .join("\n");
                    emitter.emit("code", content.trim_end().to_string(), indent, false);
                },
                "block_quote" => emitter.emit("quote", strip_quote_markers(node_text(node, text)), indent, false),
                "thematic_break" => emitter.emit("divider", String::new(), indent, false),
                "pipe_table" => emitter.emit("table", node_text(node, text).trim().to_string(), indent, false),
                "html_block" => emitter.emit("html", node_text(node, text).trim().to_string(), indent, false),
                other => debug!(kind = other, "skipping markdown node"),
            }
        }

        Ok(emitter.blocks)
    }
}

/// Split plain text on blank lines into `paragraph` blocks.
#[must_use]
pub fn parse_plain_text(text: &str, id_prefix: &str) -> Vec<Block> {
    let mut emitter = Emitter::new(id_prefix);
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().chain(std::iter::once("")) {
        if line.trim().is_empty() {
            if !current.is_empty() {
                emitter.emit("paragraph", current.join("\n").trim().to_string(), 0, false);
                current.clear();
            }
        } else {
            current.push(line);
        }
    }

    emitter.blocks
}

struct Emitter<'a> {
    prefix: &'a str,
    blocks: Vec<Block>,
}

impl<'a> Emitter<'a> {
    const fn new(prefix: &'a str) -> Self {
        Self {
            prefix,
            blocks: Vec::new(),
        }
    }

    fn emit(&mut self, block_type: &str, content: String, indent: usize, has_children: bool) {
        let id = format!("{}_{}", self.prefix, self.blocks.len() + 1);
        self.blocks.push(
            Block::new(id, block_type, content)
                .with_indent(indent)
                .with_children(has_children),
        );
    }
}

fn named_children(node: Node<'_>) -> std::vec::IntoIter<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect::<Vec<_>>().into_iter()
}

/// Push matching children so they pop in document order.
fn push_children<'t>(
    stack: &mut Vec<(Node<'t>, usize)>,
    node: Node<'t>,
    indent: usize,
    keep: impl Fn(Node<'t>) -> bool,
) {
    let children: Vec<Node<'t>> = named_children(node).filter(|child| keep(*child)).collect();
    stack.extend(children.into_iter().rev().map(|child| (child, indent)));
}

fn is_block(node: Node<'_>) -> bool {
    !node.kind().starts_with("list_marker")
        && !node.kind().starts_with("task_list_marker")
        && node.kind() != "block_continuation"
}

fn node_text<'s>(node: Node<'_>, text: &'s str) -> &'s str {
    text.get(node.byte_range()).unwrap_or_default()
}

fn heading_level(node: Node<'_>) -> usize {
    for child in named_children(node) {
        match child.kind() {
            "atx_h1_marker" | "setext_h1_underline" => return 1,
            "atx_h2_marker" | "setext_h2_underline" => return 2,
            "atx_h3_marker" => return 3,
            "atx_h4_marker" => return 4,
            "atx_h5_marker" => return 5,
            "atx_h6_marker" => return 6,
            _ => {},
        }
    }
    1
}

/// Block type, content, and the id of the paragraph used as content.
fn list_item(node: Node<'_>, text: &str) -> (String, String, Option<usize>) {
    let mut block_type = "bulleted_list_item";
    let mut checkbox = false;
    let mut first_paragraph = None;

    for child in named_children(node) {
        match child.kind() {
            "list_marker_dot" | "list_marker_parenthesis" => block_type = "numbered_list_item",
            "task_list_marker_checked" | "task_list_marker_unchecked" => checkbox = true,
            "paragraph" if first_paragraph.is_none() => first_paragraph = Some(child),
            _ => {},
        }
    }

    let mut content = first_paragraph.map_or_else(String::new, |p| clean_lines(node_text(p, text)));
    for marker in ["[ ] ", "[x] ", "[X] "] {
        if let Some(rest) = content.strip_prefix(marker) {
            content = rest.to_string();
            checkbox = true;
            break;
        }
    }
    if checkbox {
        block_type = "to_do";
    }

    (block_type.to_string(), content, first_paragraph.map(|p| p.id()))
}

/// Trim every line and drop the empty ones.
fn clean_lines(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_quote_markers(raw: &str) -> String {
    raw.lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('>').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line).trim_end()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(markdown: &str) -> Vec<Block> {
        MarkdownBlockParser::new().unwrap().parse(markdown, "doc").unwrap()
    }

    fn shape(blocks: &[Block]) -> Vec<(&str, &str)> {
        blocks
            .iter()
            .map(|b| (b.block_type.as_str(), b.content.as_str()))
            .collect()
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let blocks = parse("# Title\n\nIntro text\nspans lines.\n\n## Section\n\nBody.\n");

        assert_eq!(
            shape(&blocks),
            vec![
                ("heading_1", "Title"),
                ("paragraph", "Intro text\nspans lines."),
                ("heading_2", "Section"),
                ("paragraph", "Body."),
            ]
        );
    }

    #[test]
    fn test_ids_are_numbered_from_one() {
        let blocks = parse("# A\n\nB\n");

        let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["doc_1", "doc_2"]);
    }

    #[test]
    fn test_setext_headings() {
        let blocks = parse("Main\n====\n\nSub\n---\n\ntext\n");

        assert_eq!(
            shape(&blocks),
            vec![("heading_1", "Main"), ("heading_2", "Sub"), ("paragraph", "text")]
        );
    }

    #[test]
    fn test_nested_lists_carry_indent() {
        // Given: a bullet list with one nested item
        let markdown = "- parent\n  - child\n- sibling\n";

        // When: parsing
        let blocks = parse(markdown);

        // Then: nesting depth lands in indent_level and the parent knows it has children
        assert_eq!(
            shape(&blocks),
            vec![
                ("bulleted_list_item", "parent"),
                ("bulleted_list_item", "child"),
                ("bulleted_list_item", "sibling"),
            ]
        );
        assert_eq!(blocks[0].indent_level, 0);
        assert!(blocks[0].has_children);
        assert_eq!(blocks[1].indent_level, 1);
        assert!(!blocks[1].has_children);
        assert_eq!(blocks[2].indent_level, 0);
    }

    #[test]
    fn test_numbered_and_todo_items() {
        let blocks = parse("1. first\n2. second\n\n- [ ] open task\n");

        assert_eq!(
            shape(&blocks),
            vec![
                ("numbered_list_item", "first"),
                ("numbered_list_item", "second"),
                ("to_do", "open task"),
            ]
        );
    }

    #[test]
    fn test_code_quote_and_divider() {
        let blocks = parse("```rust\nfn main() {}\n```\n\n> quoted line\n> second\n\n---\n");

        assert_eq!(
            shape(&blocks),
            vec![
                ("code", "fn main() {}"),
                ("quote", "quoted line\nsecond"),
                ("divider", ""),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
    }

    #[test]
    fn test_plain_text_splits_on_blank_lines() {
        let blocks = parse_plain_text("first line\nsame para\n\n\nsecond para\n", "notes");

        assert_eq!(
            shape(&blocks),
            vec![("paragraph", "first line\nsame para"), ("paragraph", "second para")]
        );
        assert_eq!(blocks[1].id, "notes_2");
    }
}
