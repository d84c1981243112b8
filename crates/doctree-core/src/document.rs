use tracing::warn;

use crate::render::{self, Outline};
use crate::tree::{DepthMode, DocTree, TreeBuilder};
use crate::types::{Block, DocumentMeta};

/// Metadata, an ordered block sequence and the outline built from it.
///
/// The tree is built on first use and cached until the blocks change, which is
/// why the rendering methods take `&mut self`.
#[derive(Debug, Clone)]
pub struct Document {
    meta: DocumentMeta,
    blocks: Vec<Block>,
    tree: Option<DocTree>,
    depth_mode: DepthMode,
}

impl Document {
    #[must_use]
    pub const fn new(meta: DocumentMeta) -> Self {
        Self {
            meta,
            blocks: Vec::new(),
            tree: None,
            depth_mode: DepthMode::Type,
        }
    }

    #[must_use]
    pub const fn with_blocks(meta: DocumentMeta, blocks: Vec<Block>) -> Self {
        Self {
            meta,
            blocks,
            tree: None,
            depth_mode: DepthMode::Type,
        }
    }

    #[must_use]
    pub fn with_depth_mode(mut self, depth_mode: DepthMode) -> Self {
        if self.depth_mode != depth_mode {
            self.depth_mode = depth_mode;
            self.tree = None;
        }
        self
    }

    #[must_use]
    pub const fn meta(&self) -> &DocumentMeta {
        &self.meta
    }

    pub const fn meta_mut(&mut self) -> &mut DocumentMeta {
        &mut self.meta
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.meta.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.meta.title
    }

    #[must_use]
    pub const fn depth_mode(&self) -> DepthMode {
        self.depth_mode
    }

    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The cached tree, if one has been built for the current blocks.
    #[must_use]
    pub const fn tree(&self) -> Option<&DocTree> {
        self.tree.as_ref()
    }

    /// Replace the block sequence. Any cached tree is dropped.
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.blocks = blocks;
        self.tree = None;
    }

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
        self.tree = None;
    }

    /// Drop blocks and tree, keeping metadata.
    pub fn clear_content(&mut self) {
        self.blocks = Vec::new();
        self.tree = None;
    }

    /// Build the tree unless one is already cached for the current blocks.
    pub fn build_tree(&mut self) -> &DocTree {
        if self.blocks.is_empty() && self.tree.is_none() {
            warn!(document_id = %self.meta.id, "no blocks to build a tree from");
        }
        let blocks = &self.blocks;
        let mode = self.depth_mode;
        self.tree
            .get_or_insert_with(|| TreeBuilder::with_strategy(mode).build(blocks))
    }

    /// Discard the cached tree and build it again.
    pub fn rebuild_tree(&mut self) -> &DocTree {
        self.tree = None;
        self.build_tree()
    }

    #[must_use]
    pub fn to_outline(&mut self) -> Outline {
        let meta = self.meta.clone();
        render::outline(&meta, self.build_tree())
    }

    #[must_use]
    pub fn to_markdown(&mut self) -> String {
        let title = self.meta.title.clone();
        render::markdown(&title, self.build_tree())
    }

    #[must_use]
    pub fn to_rst(&mut self) -> String {
        let title = self.meta.title.clone();
        render::rst(&title, self.build_tree())
    }

    /// The first `n` blocks.
    #[must_use]
    pub fn preview_blocks(&self, n: usize) -> &[Block] {
        &self.blocks[..n.min(self.blocks.len())]
    }

    /// The first `n_chars` characters of all block content joined by spaces,
    /// with `...` appended when the text was cut.
    #[must_use]
    pub fn preview_text(&self, n_chars: usize) -> String {
        truncate_chars(&self.joined_text(), n_chars)
    }

    /// The first `n` sentences of all block content, with `...` appended when
    /// more sentences follow.
    #[must_use]
    pub fn preview_sentences(&self, n: usize) -> String {
        let text = self.joined_text();
        let sentences = split_sentences(&text);
        let preview = sentences
            .iter()
            .take(n)
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if sentences.len() > n {
            format!("{preview}...")
        } else {
            preview
        }
    }

    fn joined_text(&self) -> String {
        self.blocks
            .iter()
            .map(|block| block.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub(crate) fn truncate_chars(text: &str, n_chars: usize) -> String {
    match text.char_indices().nth(n_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Split after `.`, `!` or `?` when followed by whitespace. The whitespace run
/// is consumed; the punctuation stays with its sentence. A blank tail is not a
/// sentence.
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = i + c.len_utf8();
        let mut resume = None;
        while let Some(&(j, next)) = chars.peek() {
            if !next.is_whitespace() {
                break;
            }
            resume = Some(j + next.len_utf8());
            chars.next();
        }
        if let Some(resume) = resume {
            sentences.push(&text[start..end]);
            start = resume;
        }
    }
    let tail = &text[start..];
    if !tail.trim().is_empty() {
        sentences.push(tail);
    }
    sentences
}
