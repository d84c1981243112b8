//! Offset/limit pagination over a document's blocks or its flattened tree.
//!
//! [`Windower`] pages through the flat block sequence, [`TreeWindower`]
//! through the pre-order node list of the built tree. Both speak the same
//! protocol: create a window, step to the next or previous one, iterate all of
//! them, or jump to the window holding a given id or text.
//!
//! ```rust
//! use doctree_core::{Block, Document, DocumentMeta, Windower};
//!
//! # fn main() -> doctree_core::Result<()> {
//! let blocks = (0..10)
//!     .map(|i| Block::new(format!("b{i}"), "paragraph", format!("p{i}")))
//!     .collect();
//! let mut doc = Document::with_blocks(DocumentMeta::new("d", "Doc"), blocks);
//!
//! let windower = Windower::new(3);
//! let first = windower.create_window(&mut doc, 0, None)?;
//! assert!(!first.has_previous && first.has_next);
//! assert_eq!(first.items.len(), 3);
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;

use serde::Serialize;
use tracing::warn;

use crate::document::Document;
use crate::error::Result;
use crate::lazy::LazyDocument;
use crate::render;
use crate::tree::{DocTree, FlatNode};
use crate::types::Block;

/// Default blocks per [`Windower`] window.
pub const DEFAULT_WINDOW_SIZE: usize = 50;
/// Default nodes per [`TreeWindower`] window.
pub const DEFAULT_TREE_NODES: usize = 20;
/// Default nodes of leading context for [`TreeWindower::find_node_window`].
pub const DEFAULT_NODE_CONTEXT: usize = 5;

/// Anything a windower can page through.
///
/// Implemented for [`Document`] and [`LazyDocument`]; for the latter, asking for
/// blocks or the tree triggers the lazy load.
pub trait ContentSource {
    fn source_id(&self) -> &str;

    fn source_title(&self) -> &str;

    /// # Errors
    ///
    /// Fails when loading the content fails.
    fn load_blocks(&mut self) -> Result<&[Block]>;

    /// # Errors
    ///
    /// Fails when loading the content fails.
    fn load_tree(&mut self) -> Result<&DocTree>;
}

impl ContentSource for Document {
    fn source_id(&self) -> &str {
        self.id()
    }

    fn source_title(&self) -> &str {
        self.title()
    }

    fn load_blocks(&mut self) -> Result<&[Block]> {
        Ok(self.blocks())
    }

    fn load_tree(&mut self) -> Result<&DocTree> {
        Ok(self.build_tree())
    }
}

impl ContentSource for LazyDocument {
    fn source_id(&self) -> &str {
        self.id()
    }

    fn source_title(&self) -> &str {
        self.title()
    }

    fn load_blocks(&mut self) -> Result<&[Block]> {
        self.blocks()
    }

    fn load_tree(&mut self) -> Result<&DocTree> {
        self.tree()
    }
}

/// An immutable page of items from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Window<T> {
    pub document_id: String,
    pub document_title: String,
    pub offset: usize,
    pub limit: usize,
    pub total_count: usize,
    pub items: Vec<T>,
    pub has_previous: bool,
    pub has_next: bool,
}

/// A page of blocks.
pub type BlockWindow = Window<Block>;
/// A page of flattened tree nodes.
pub type NodeWindow = Window<FlatNode>;

impl<T: Clone> Window<T> {
    /// Slice `all` at `offset`.
    ///
    /// A zero `limit` is treated as one. An `offset` at or past the end is
    /// pulled back to show the last `limit` items.
    fn slice(
        document_id: String,
        document_title: String,
        all: &[T],
        offset: usize,
        limit: usize,
    ) -> Self {
        let limit = limit.max(1);
        let total_count = all.len();
        let offset = if offset >= total_count {
            total_count.saturating_sub(limit)
        } else {
            offset
        };
        let end = offset.saturating_add(limit).min(total_count);

        Self {
            document_id,
            document_title,
            offset,
            limit,
            total_count,
            items: all[offset..end].to_vec(),
            has_previous: offset > 0,
            has_next: end < total_count,
        }
    }
}

impl<T> Window<T> {
    #[must_use]
    pub const fn start_index(&self) -> usize {
        self.offset
    }

    /// Exclusive end index.
    #[must_use]
    pub fn end_index(&self) -> usize {
        self.offset.saturating_add(self.limit).min(self.total_count)
    }

    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.offset == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.offset.saturating_add(self.limit) >= self.total_count
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    const fn next_offset(&self) -> usize {
        self.offset.saturating_add(self.limit)
    }

    const fn previous_offset(&self) -> usize {
        self.offset.saturating_sub(self.limit)
    }
}

impl Window<Block> {
    /// Markdown for this page with a `Window a-b of n` header.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        render::window_markdown(
            &self.document_title,
            self.start_index(),
            self.end_index(),
            self.total_count,
            &self.items,
            self.has_next,
        )
    }
}

impl Window<FlatNode> {
    #[must_use]
    pub fn to_markdown(&self) -> String {
        render::window_markdown(
            &self.document_title,
            self.start_index(),
            self.end_index(),
            self.total_count,
            self.items.iter().map(|node| &node.block),
            self.has_next,
        )
    }
}

/// Every window of a document in order, without overlap.
///
/// Cloning restarts iteration from the clone's current position.
#[derive(Debug, Clone)]
pub struct Windows<'a, T: Clone> {
    document_id: String,
    document_title: String,
    items: Cow<'a, [T]>,
    size: usize,
    offset: usize,
}

impl<T: Clone> Iterator for Windows<'_, T> {
    type Item = Window<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.items.len() {
            return None;
        }
        let window = Window::slice(
            self.document_id.clone(),
            self.document_title.clone(),
            &self.items,
            self.offset,
            self.size,
        );
        self.offset += self.size;
        Some(window)
    }
}

fn text_matcher(text: &str, case_sensitive: bool) -> impl Fn(&str) -> bool {
    let needle = if case_sensitive {
        text.to_string()
    } else {
        text.to_lowercase()
    };
    move |content: &str| {
        if case_sensitive {
            content.contains(&needle)
        } else {
            content.to_lowercase().contains(&needle)
        }
    }
}

fn labels<S: ContentSource + ?Sized>(source: &S) -> (String, String) {
    (
        source.source_id().to_string(),
        source.source_title().to_string(),
    )
}

/// Pages through a document's flat block sequence.
#[derive(Debug, Clone, Copy)]
pub struct Windower {
    default_size: usize,
}

impl Default for Windower {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}

impl Windower {
    /// A zero size is treated as one.
    #[must_use]
    pub fn new(default_size: usize) -> Self {
        Self {
            default_size: default_size.max(1),
        }
    }

    #[must_use]
    pub const fn default_size(&self) -> usize {
        self.default_size
    }

    /// Window of `limit` blocks (the default size when `None`) at `offset`.
    ///
    /// # Errors
    ///
    /// Fails only when the source cannot load its blocks.
    pub fn create_window<S: ContentSource + ?Sized>(
        &self,
        source: &mut S,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<BlockWindow> {
        let (id, title) = labels(source);
        let blocks = source.load_blocks()?;
        Ok(Window::slice(
            id,
            title,
            blocks,
            offset,
            limit.unwrap_or(self.default_size),
        ))
    }

    /// # Errors
    ///
    /// Fails only when the source cannot load its blocks.
    pub fn next_window<S: ContentSource + ?Sized>(
        &self,
        current: &BlockWindow,
        source: &mut S,
    ) -> Result<BlockWindow> {
        self.create_window(source, current.next_offset(), Some(current.limit))
    }

    /// # Errors
    ///
    /// Fails only when the source cannot load its blocks.
    pub fn previous_window<S: ContentSource + ?Sized>(
        &self,
        current: &BlockWindow,
        source: &mut S,
    ) -> Result<BlockWindow> {
        self.create_window(source, current.previous_offset(), Some(current.limit))
    }

    /// All windows of `size` blocks covering the document exactly once.
    ///
    /// # Errors
    ///
    /// Fails only when the source cannot load its blocks.
    pub fn generate_all_windows<'a, S: ContentSource + ?Sized>(
        &self,
        source: &'a mut S,
        size: Option<usize>,
    ) -> Result<Windows<'a, Block>> {
        let (document_id, document_title) = labels(source);
        let blocks = source.load_blocks()?;
        Ok(Windows {
            document_id,
            document_title,
            items: Cow::Borrowed(blocks),
            size: size.unwrap_or(self.default_size).max(1),
            offset: 0,
        })
    }

    /// Window starting `context` blocks before the block with `block_id`.
    ///
    /// # Errors
    ///
    /// Fails only when the source cannot load its blocks. An unknown id gives
    /// `Ok(None)`.
    pub fn find_block_window<S: ContentSource + ?Sized>(
        &self,
        source: &mut S,
        block_id: &str,
        context: usize,
        limit: Option<usize>,
    ) -> Result<Option<BlockWindow>> {
        let position = source
            .load_blocks()?
            .iter()
            .position(|block| block.id == block_id);
        let Some(index) = position else {
            warn!(document_id = %source.source_id(), block_id, "block not found");
            return Ok(None);
        };
        self.create_window(source, index.saturating_sub(context), limit)
            .map(Some)
    }

    /// Window starting `context` blocks before the first block containing `text`.
    ///
    /// # Errors
    ///
    /// Fails only when the source cannot load its blocks. No match gives
    /// `Ok(None)`.
    pub fn find_text_window<S: ContentSource + ?Sized>(
        &self,
        source: &mut S,
        text: &str,
        case_sensitive: bool,
        context: usize,
        limit: Option<usize>,
    ) -> Result<Option<BlockWindow>> {
        let matches = text_matcher(text, case_sensitive);
        let position = source
            .load_blocks()?
            .iter()
            .position(|block| matches(&block.content));
        let Some(index) = position else {
            warn!(document_id = %source.source_id(), text, "text not found");
            return Ok(None);
        };
        self.create_window(source, index.saturating_sub(context), limit)
            .map(Some)
    }
}

/// Pages through the pre-order node list of a document's tree, root excluded.
#[derive(Debug, Clone, Copy)]
pub struct TreeWindower {
    default_nodes: usize,
    default_context: usize,
}

impl Default for TreeWindower {
    fn default() -> Self {
        Self::new(DEFAULT_TREE_NODES)
    }
}

impl TreeWindower {
    /// A zero size is treated as one.
    #[must_use]
    pub fn new(default_nodes: usize) -> Self {
        Self {
            default_nodes: default_nodes.max(1),
            default_context: DEFAULT_NODE_CONTEXT,
        }
    }

    #[must_use]
    pub const fn with_context(mut self, default_context: usize) -> Self {
        self.default_context = default_context;
        self
    }

    #[must_use]
    pub const fn default_nodes(&self) -> usize {
        self.default_nodes
    }

    fn flattened<S: ContentSource + ?Sized>(source: &mut S) -> Result<(String, String, Vec<FlatNode>)> {
        let (id, title) = labels(source);
        let nodes = source.load_tree()?.flatten();
        Ok((id, title, nodes))
    }

    /// Window of `limit` nodes (the default when `None`) at `offset`.
    ///
    /// # Errors
    ///
    /// Fails only when the source cannot load or build its tree.
    pub fn window_tree<S: ContentSource + ?Sized>(
        &self,
        source: &mut S,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<NodeWindow> {
        let (id, title, nodes) = Self::flattened(source)?;
        Ok(Window::slice(
            id,
            title,
            &nodes,
            offset,
            limit.unwrap_or(self.default_nodes),
        ))
    }

    /// # Errors
    ///
    /// Fails only when the source cannot load or build its tree.
    pub fn next_window<S: ContentSource + ?Sized>(
        &self,
        current: &NodeWindow,
        source: &mut S,
    ) -> Result<NodeWindow> {
        self.window_tree(source, current.next_offset(), Some(current.limit))
    }

    /// # Errors
    ///
    /// Fails only when the source cannot load or build its tree.
    pub fn previous_window<S: ContentSource + ?Sized>(
        &self,
        current: &NodeWindow,
        source: &mut S,
    ) -> Result<NodeWindow> {
        self.window_tree(source, current.previous_offset(), Some(current.limit))
    }

    /// # Errors
    ///
    /// Fails only when the source cannot load or build its tree.
    pub fn generate_all_windows<S: ContentSource + ?Sized>(
        &self,
        source: &mut S,
        size: Option<usize>,
    ) -> Result<Windows<'static, FlatNode>> {
        let (document_id, document_title, nodes) = Self::flattened(source)?;
        Ok(Windows {
            document_id,
            document_title,
            items: Cow::Owned(nodes),
            size: size.unwrap_or(self.default_nodes).max(1),
            offset: 0,
        })
    }

    /// Window starting `context` nodes (the default context when `None`)
    /// before the node wrapping `block_id`.
    ///
    /// # Errors
    ///
    /// Fails only when the source cannot load or build its tree. An unknown id
    /// gives `Ok(None)`.
    pub fn find_node_window<S: ContentSource + ?Sized>(
        &self,
        source: &mut S,
        block_id: &str,
        context: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Option<NodeWindow>> {
        let (id, title, nodes) = Self::flattened(source)?;
        let Some(index) = nodes.iter().position(|node| node.block.id == block_id) else {
            warn!(document_id = %id, block_id, "node not found");
            return Ok(None);
        };
        let offset = index.saturating_sub(context.unwrap_or(self.default_context));
        Ok(Some(Window::slice(
            id,
            title,
            &nodes,
            offset,
            limit.unwrap_or(self.default_nodes),
        )))
    }

    /// Window starting `context` nodes before the first node containing `text`.
    ///
    /// # Errors
    ///
    /// Fails only when the source cannot load or build its tree. No match gives
    /// `Ok(None)`.
    pub fn find_text_window<S: ContentSource + ?Sized>(
        &self,
        source: &mut S,
        text: &str,
        case_sensitive: bool,
        context: Option<usize>,
        limit: Option<usize>,
    ) -> Result<Option<NodeWindow>> {
        let matches = text_matcher(text, case_sensitive);
        let (id, title, nodes) = Self::flattened(source)?;
        let Some(index) = nodes.iter().position(|node| matches(&node.block.content)) else {
            warn!(document_id = %id, text, "text not found in tree");
            return Ok(None);
        };
        let offset = index.saturating_sub(context.unwrap_or(self.default_context));
        Ok(Some(Window::slice(
            id,
            title,
            &nodes,
            offset,
            limit.unwrap_or(self.default_nodes),
        )))
    }
}
