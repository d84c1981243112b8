//! Outline reconstruction from a flat block sequence.
//!
//! Nodes live in an arena owned by [`DocTree`] and refer to their children by
//! index. Index `0` is always the sentinel root. Because the builder appends
//! nodes in block order and only ever attaches to a node already on the current
//! path, every child index is greater than its parent's and the pre-order walk of
//! the tree reproduces the input order.
//!
//! ```rust
//! use doctree_core::{Block, TreeBuilder};
//!
//! let blocks = vec![
//!     Block::new("1", "heading_1", "Intro"),
//!     Block::new("2", "heading_2", "A"),
//!     Block::new("3", "paragraph", "x"),
//! ];
//! let tree = TreeBuilder::new().build(&blocks);
//! assert_eq!(tree.len(), 3);
//! assert_eq!(tree.root().children().len(), 1);
//! ```

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use crate::types::Block;

/// Index of a node inside a [`DocTree`] arena.
pub type NodeId = usize;

/// Depth assigned to every block that is not a level 1-3 heading.
pub const BODY_DEPTH: usize = 4;

/// Decides how deep a block nests in the outline. Depths are `>= 1`; the root
/// sits at depth 0.
pub trait DepthStrategy {
    fn depth(&self, block: &Block) -> usize;
}

impl<F> DepthStrategy for F
where
    F: Fn(&Block) -> usize,
{
    fn depth(&self, block: &Block) -> usize {
        self(block)
    }
}

/// Built-in depth strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthMode {
    /// `heading_1..3` map to `1..3`, everything else to [`BODY_DEPTH`].
    /// `indent_level` is ignored.
    #[default]
    Type,
    /// Headings as in [`DepthMode::Type`]; other blocks nest by
    /// `BODY_DEPTH + indent_level`, so indented list items become children of
    /// the item above them.
    Indent,
}

impl DepthStrategy for DepthMode {
    fn depth(&self, block: &Block) -> usize {
        match self {
            Self::Type => type_depth(block),
            Self::Indent => match block.heading_level() {
                Some(level @ 1..=3) => level,
                _ => BODY_DEPTH.saturating_add(block.indent_level),
            },
        }
    }
}

fn type_depth(block: &Block) -> usize {
    match block.block_type.as_str() {
        "heading_1" => 1,
        "heading_2" => 2,
        "heading_3" => 3,
        _ => BODY_DEPTH,
    }
}

/// A tree position: one block plus the ordered indices of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    block: Block,
    children: Vec<NodeId>,
}

impl Node {
    #[must_use]
    pub const fn block(&self) -> &Block {
        &self.block
    }

    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Owned snapshot of a node taken from a pre-order walk.
///
/// `depth` is `0` for children of the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatNode {
    pub node_id: NodeId,
    pub depth: usize,
    pub child_count: usize,
    pub block: Block,
}

/// A rooted outline built from an ordered block sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTree {
    nodes: Vec<Node>,
}

impl Default for DocTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl DocTree {
    /// Arena index of the sentinel root.
    pub const ROOT: NodeId = 0;

    /// A tree holding only the root.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node {
                block: Block::root(),
                children: Vec::new(),
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of content nodes (root excluded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pre-order walk below the root, children before following siblings.
    #[must_use]
    pub fn preorder(&self) -> PreOrder<'_> {
        let stack = self
            .root()
            .children
            .iter()
            .rev()
            .map(|&id| (id, 0))
            .collect();
        PreOrder { tree: self, stack }
    }

    /// Owned pre-order snapshot of every content node.
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatNode> {
        self.preorder()
            .map(|(node_id, depth, node)| FlatNode {
                node_id,
                depth,
                child_count: node.children.len(),
                block: node.block.clone(),
            })
            .collect()
    }

    /// Locate the node wrapping the block with `block_id`.
    #[must_use]
    pub fn find_by_id(&self, block_id: &str) -> Option<NodeId> {
        self.preorder()
            .find(|(_, _, node)| node.block.id == block_id)
            .map(|(id, _, _)| id)
    }

    /// All nodes whose block carries `block_type`, in document order.
    #[must_use]
    pub fn find_by_type(&self, block_type: &str) -> Vec<NodeId> {
        self.preorder()
            .filter(|(_, _, node)| node.block.block_type == block_type)
            .map(|(id, _, _)| id)
            .collect()
    }

    /// All nodes whose content matches `pattern`, in document order.
    #[must_use]
    pub fn find_by_content(&self, pattern: &Regex) -> Vec<NodeId> {
        self.preorder()
            .filter(|(_, _, node)| pattern.is_match(&node.block.content))
            .map(|(id, _, _)| id)
            .collect()
    }

    /// Nested `{id, type, content, children}` value, root included.
    #[must_use]
    pub fn to_value(&self) -> Value {
        // Children always have larger indices than their parent, so a reverse
        // sweep sees every child before the node that owns it.
        let mut built: Vec<Option<Value>> = vec![None; self.nodes.len()];
        for id in (0..self.nodes.len()).rev() {
            let node = &self.nodes[id];
            let children: Vec<Value> = node
                .children
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[id] = Some(json!({
                "id": node.block.id,
                "type": node.block.block_type,
                "content": node.block.content,
                "children": children,
            }));
        }
        built[Self::ROOT].take().unwrap_or(Value::Null)
    }

    fn attach(&mut self, parent: NodeId, block: Block) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            block,
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }
}

/// Iterator returned by [`DocTree::preorder`], yielding `(id, depth, node)`.
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    tree: &'a DocTree,
    stack: Vec<(NodeId, usize)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (NodeId, usize, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.stack
            .extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        Some((id, depth, node))
    }
}

/// Turns an ordered block sequence into a [`DocTree`].
///
/// Total and deterministic: any input yields a valid tree with exactly one node
/// per block.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder<S = DepthMode> {
    strategy: S,
}

impl TreeBuilder {
    /// Builder using the type-based depth heuristic.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: DepthStrategy> TreeBuilder<S> {
    pub const fn with_strategy(strategy: S) -> Self {
        Self { strategy }
    }

    /// Build the outline.
    ///
    /// Each block attaches to the nearest shallower node on the current path.
    /// Setting a node at depth `d` forgets every remembered node at depth `>= d`,
    /// so a later block can never attach to a node from an earlier section.
    /// Depth jumps of more than one level nest directly under the last shallower
    /// node without synthetic intermediates.
    pub fn build(&self, blocks: &[Block]) -> DocTree {
        let mut tree = DocTree::empty();
        // (depth, node) pairs with strictly increasing depth; the root stays at the bottom.
        let mut path: Vec<(usize, NodeId)> = vec![(0, DocTree::ROOT)];

        for block in blocks {
            let depth = self.strategy.depth(block).max(1);
            while path.last().is_some_and(|&(d, _)| d >= depth) {
                path.pop();
            }
            let parent = path.last().map_or(DocTree::ROOT, |&(_, id)| id);
            let id = tree.attach(parent, block.clone());
            path.push((depth, id));
        }

        debug!(blocks = blocks.len(), "built document tree");
        tree
    }
}

/// Build with the default type-based strategy.
#[must_use]
pub fn build_tree(blocks: &[Block]) -> DocTree {
    TreeBuilder::new().build(blocks)
}
