//! Load-on-demand documents.
//!
//! A [`LazyDocument`] holds metadata up front and asks its [`Provider`] for
//! blocks the first time anything needs them. The tree is built the first time
//! anything needs it. Both steps are memoized until
//! [`LazyDocument::clear_content`] resets them.
//!
//! Provider failures never escape: the document still ends up `Loaded`, with
//! no blocks, so a broken upstream is not hammered with retries. Under
//! [`ErrorPolicy::Retain`] the failure stays readable through
//! [`LazyDocument::last_error`].
//!
//! ## Threading
//!
//! A single instance is not synchronized. The `Loading`/`Building` states
//! guard against re-entry on the same call stack only; share an instance
//! across threads behind a `Mutex`. Distinct instances are independent and
//! `Send`, so a worker pool can preload many of them at once.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::render::Outline;
use crate::tree::{DepthMode, DocTree};
use crate::types::{Block, DocumentMeta};

/// Block loading progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
}

/// Tree building progress. Only leaves `NotBuilt` once blocks are `Loaded`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeState {
    #[default]
    NotBuilt,
    Building,
    Built,
}

/// What happens to a provider failure after it is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Keep the last failure for [`LazyDocument::last_error`].
    #[default]
    Retain,
    /// Discard it.
    Silent,
}

/// Snapshot of an absorbed provider failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub message: String,
    pub category: &'static str,
    pub at: DateTime<Utc>,
}

impl From<&Error> for FetchFailure {
    fn from(err: &Error) -> Self {
        Self {
            message: err.to_string(),
            category: err.category(),
            at: Utc::now(),
        }
    }
}

/// A [`Document`] whose blocks and tree materialize on first use.
pub struct LazyDocument {
    document: Document,
    provider: Option<Arc<dyn Provider>>,
    load_state: LoadState,
    tree_state: TreeState,
    error_policy: ErrorPolicy,
    provider_calls: usize,
    last_error: Option<FetchFailure>,
}

impl std::fmt::Debug for LazyDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyDocument")
            .field("id", &self.document.id())
            .field("blocks", &self.document.blocks().len())
            .field("load_state", &self.load_state)
            .field("tree_state", &self.tree_state)
            .field("has_provider", &self.provider.is_some())
            .field("provider_calls", &self.provider_calls)
            .finish_non_exhaustive()
    }
}

impl LazyDocument {
    /// Metadata-only document that fetches from `provider` on first use.
    #[must_use]
    pub fn new(meta: DocumentMeta, provider: Arc<dyn Provider>) -> Self {
        Self {
            provider: Some(provider),
            ..Self::detached(meta)
        }
    }

    /// Metadata-only document with nothing to load from. Reads see no blocks
    /// until some are assigned.
    #[must_use]
    pub const fn detached(meta: DocumentMeta) -> Self {
        Self {
            document: Document::new(meta),
            provider: None,
            load_state: LoadState::NotLoaded,
            tree_state: TreeState::NotBuilt,
            error_policy: ErrorPolicy::Retain,
            provider_calls: 0,
            last_error: None,
        }
    }

    /// Wrap an already populated document. Its blocks count as loaded.
    #[must_use]
    pub fn from_document(document: Document) -> Self {
        let mut lazy = Self::detached(document.meta().clone());
        lazy.document = document;
        lazy.load_state = LoadState::Loaded;
        lazy
    }

    #[must_use]
    pub const fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    #[must_use]
    pub fn with_depth_mode(mut self, depth_mode: DepthMode) -> Self {
        self.document = self.document.with_depth_mode(depth_mode);
        self.tree_state = TreeState::NotBuilt;
        self
    }

    #[must_use]
    pub const fn meta(&self) -> &DocumentMeta {
        self.document.meta()
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.document.id()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.document.title()
    }

    /// The wrapped document as it is right now, without triggering a load.
    #[must_use]
    pub const fn peek(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub const fn load_state(&self) -> LoadState {
        self.load_state
    }

    #[must_use]
    pub const fn tree_state(&self) -> TreeState {
        self.tree_state
    }

    #[must_use]
    pub fn is_blocks_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    #[must_use]
    pub fn is_tree_built(&self) -> bool {
        self.tree_state == TreeState::Built
    }

    /// How many times the provider has been asked for this document.
    #[must_use]
    pub const fn provider_calls(&self) -> usize {
        self.provider_calls
    }

    /// The most recent absorbed fetch failure, if the policy retains it.
    #[must_use]
    pub const fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    /// Load blocks from the provider unless already loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when a previous load never finished. Provider
    /// failures are logged and absorbed, leaving the document loaded and empty.
    pub fn ensure_blocks_loaded(&mut self) -> Result<()> {
        match self.load_state {
            LoadState::Loaded => return Ok(()),
            LoadState::Loading => return Err(Error::Reentrant(self.id().to_string())),
            LoadState::NotLoaded => {},
        }

        let Some(provider) = self.provider.clone() else {
            warn!(document_id = %self.id(), "no provider available to load blocks");
            return Ok(());
        };

        self.load_state = LoadState::Loading;
        self.provider_calls += 1;
        debug!(document_id = %self.id(), "lazy loading blocks");

        let blocks = match provider.fetch(self.id()) {
            Ok(fetched) => {
                if fetched.blocks.is_empty() {
                    warn!(document_id = %self.id(), "provider returned no blocks");
                }
                self.last_error = None;
                fetched.blocks
            },
            Err(err) => {
                warn!(
                    document_id = %self.id(),
                    category = err.category(),
                    error = %err,
                    "failed to load blocks, continuing with empty content"
                );
                if self.error_policy == ErrorPolicy::Retain {
                    self.last_error = Some(FetchFailure::from(&err));
                }
                Vec::new()
            },
        };

        self.document.set_blocks(blocks);
        self.document.meta_mut().last_fetched = Some(Utc::now());
        self.load_state = LoadState::Loaded;
        self.tree_state = TreeState::NotBuilt;
        debug!(
            document_id = %self.id(),
            blocks = self.document.blocks().len(),
            "blocks loaded"
        );
        Ok(())
    }

    /// Load blocks if needed, then build the tree unless already built.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reentrant`] when a previous load or build never finished.
    pub fn ensure_tree_built(&mut self) -> Result<()> {
        self.ensure_blocks_loaded()?;
        match self.tree_state {
            TreeState::Built => return Ok(()),
            TreeState::Building => return Err(Error::Reentrant(self.id().to_string())),
            TreeState::NotBuilt => {},
        }

        self.tree_state = TreeState::Building;
        debug!(document_id = %self.id(), "building tree");
        self.document.build_tree();
        self.tree_state = TreeState::Built;
        Ok(())
    }

    /// Blocks, loading them first if needed.
    ///
    /// # Errors
    ///
    /// See [`LazyDocument::ensure_blocks_loaded`].
    pub fn blocks(&mut self) -> Result<&[Block]> {
        self.ensure_blocks_loaded()?;
        Ok(self.document.blocks())
    }

    /// The tree, loading blocks and building it first if needed.
    ///
    /// # Errors
    ///
    /// See [`LazyDocument::ensure_tree_built`].
    pub fn tree(&mut self) -> Result<&DocTree> {
        self.ensure_tree_built()?;
        Ok(self.document.build_tree())
    }

    /// Assign blocks directly. The provider is never consulted.
    pub fn set_blocks(&mut self, blocks: Vec<Block>) {
        self.document.set_blocks(blocks);
        self.load_state = LoadState::Loaded;
        self.tree_state = TreeState::NotBuilt;
    }

    /// Drop loaded content so the next read fetches again.
    pub fn clear_content(&mut self) {
        self.document.clear_content();
        self.load_state = LoadState::NotLoaded;
        self.tree_state = TreeState::NotBuilt;
        self.last_error = None;
    }

    /// # Errors
    ///
    /// See [`LazyDocument::ensure_tree_built`].
    pub fn to_markdown(&mut self) -> Result<String> {
        self.ensure_tree_built()?;
        Ok(self.document.to_markdown())
    }

    /// # Errors
    ///
    /// See [`LazyDocument::ensure_tree_built`].
    pub fn to_rst(&mut self) -> Result<String> {
        self.ensure_tree_built()?;
        Ok(self.document.to_rst())
    }

    /// # Errors
    ///
    /// See [`LazyDocument::ensure_tree_built`].
    pub fn to_outline(&mut self) -> Result<Outline> {
        self.ensure_tree_built()?;
        Ok(self.document.to_outline())
    }

    /// # Errors
    ///
    /// See [`LazyDocument::ensure_blocks_loaded`].
    pub fn preview_blocks(&mut self, n: usize) -> Result<&[Block]> {
        self.ensure_blocks_loaded()?;
        Ok(self.document.preview_blocks(n))
    }

    /// # Errors
    ///
    /// See [`LazyDocument::ensure_blocks_loaded`].
    pub fn preview_text(&mut self, n_chars: usize) -> Result<String> {
        self.ensure_blocks_loaded()?;
        Ok(self.document.preview_text(n_chars))
    }

    /// # Errors
    ///
    /// See [`LazyDocument::ensure_blocks_loaded`].
    pub fn preview_sentences(&mut self, n: usize) -> Result<String> {
        self.ensure_blocks_loaded()?;
        Ok(self.document.preview_sentences(n))
    }

    /// Unwrap into the plain document, loading blocks first.
    ///
    /// # Errors
    ///
    /// See [`LazyDocument::ensure_blocks_loaded`].
    pub fn into_document(mut self) -> Result<Document> {
        self.ensure_blocks_loaded()?;
        Ok(self.document)
    }
}
