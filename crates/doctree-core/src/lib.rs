//! # doctree-core
//!
//! Outline reconstruction, lazy loading and windowed navigation for documents
//! made of flat, typed content blocks.
//!
//! A document arrives as an ordered list of [`Block`]s (headings, paragraphs,
//! list items, ...) with no parent pointers. This crate rebuilds the outline
//! those blocks imply, defers fetching them until something actually reads
//! them, and pages through either view without rendering the whole document.
//!
//! ## Architecture
//!
//! - **Types**: [`Block`] and [`DocumentMeta`]
//! - **Tree**: arena-backed [`DocTree`] built by [`TreeBuilder`] with a
//!   pluggable [`DepthStrategy`]
//! - **Document**: [`Document`] with markdown, RST, outline and preview views
//! - **Lazy loading**: [`LazyDocument`] over a [`Provider`], and
//!   [`LazyCollection`] for many of them
//! - **Windowing**: [`Windower`] over blocks, [`TreeWindower`] over the
//!   flattened tree
//! - **Sources**: [`LocalSource`] reading markdown and text files, parsed by
//!   the tree-sitter based [`MarkdownBlockParser`]
//!
//! ## Quick Start
//!
//! ```rust
//! use doctree_core::{Block, Document, DocumentMeta, Windower};
//!
//! let mut doc = Document::with_blocks(
//!     DocumentMeta::new("intro", "Intro"),
//!     vec![
//!         Block::new("1", "heading_1", "Intro"),
//!         Block::new("2", "heading_2", "A"),
//!         Block::new("3", "paragraph", "x"),
//!     ],
//! );
//!
//! assert_eq!(doc.to_markdown(), "# Intro\n## A\nx");
//!
//! let window = Windower::new(2).create_window(&mut doc, 0, None)?;
//! assert!(window.has_next);
//! # Ok::<(), doctree_core::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Very little here fails. Provider errors are absorbed by [`LazyDocument`]
//! and ids or text that cannot be found come back as `None`:
//!
//! ```rust
//! use doctree_core::{Document, DocumentMeta, Windower};
//!
//! let mut doc = Document::new(DocumentMeta::new("empty", "Empty"));
//! let found = Windower::default().find_block_window(&mut doc, "nope", 0, None)?;
//! assert!(found.is_none());
//! # Ok::<(), doctree_core::Error>(())
//! ```

/// Many lazy documents sharing one provider
pub mod collection;
/// Configuration management
pub mod config;
/// Documents and their derived views
pub mod document;
/// Error types and result aliases
pub mod error;
/// Load-on-demand documents
pub mod lazy;
/// Directory-backed provider
pub mod local;
/// Tree-sitter based markdown to block parser
pub mod parser;
/// Content provider interface
pub mod provider;
/// Markdown, RST and outline rendering
pub mod render;
/// Outline tree and builder
pub mod tree;
/// Core data types
pub mod types;
/// Offset/limit pagination
pub mod window;

// Re-export commonly used types
pub use collection::{LazyCollection, create_lazy_document};
pub use config::{Config, LoadingConfig, LocalConfig, PreviewConfig, WindowConfig};
pub use document::Document;
pub use error::{Error, Result};
pub use lazy::{ErrorPolicy, FetchFailure, LazyDocument, LoadState, TreeState};
pub use local::LocalSource;
pub use parser::{MarkdownBlockParser, parse_plain_text};
pub use provider::{Fetched, Provider};
pub use render::{NO_CONTENT, Outline, OutlineEntry};
pub use tree::{DepthMode, DepthStrategy, DocTree, FlatNode, Node, NodeId, TreeBuilder, build_tree};
pub use types::*;
pub use window::{BlockWindow, ContentSource, NodeWindow, TreeWindower, Window, Windower};
