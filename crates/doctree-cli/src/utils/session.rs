//! Opening a directory as a lazily loaded document collection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use doctree_core::{Config, DepthMode, LazyCollection, LazyDocument, LocalSource};
use tracing::debug;

/// Settings plus the collection built over one source directory.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub collection: LazyCollection,
    dir: PathBuf,
}

impl Session {
    /// Open `dir` with settings from `config_path` (or the platform default).
    ///
    /// `depth_mode` overrides the configured one when given.
    pub fn open(dir: &Path, config_path: Option<&Path>, depth_mode: Option<DepthMode>) -> Result<Self> {
        let mut config = load_config(config_path)?;
        if let Some(depth_mode) = depth_mode {
            config.loading.depth_mode = depth_mode;
        }

        let source = LocalSource::new(dir)
            .with_context(|| format!("Failed to open source directory {}", dir.display()))?
            .with_pattern(config.local.pattern.clone());
        debug!(source_id = source.source_id(), "opened source");

        let collection = LazyCollection::new(Arc::new(source))
            .with_error_policy(config.loading.error_policy)
            .with_depth_mode(config.loading.depth_mode);

        Ok(Self {
            config,
            collection,
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The document with id `id`, loading it on first access.
    pub fn document(&mut self, id: &str) -> Result<&mut LazyDocument> {
        let dir = self.dir.display().to_string();
        self.collection
            .get_document(id)
            .with_context(|| format!("Document '{id}' not found in {dir}"))
    }
}

/// Settings from an explicit file, or the platform config location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}
