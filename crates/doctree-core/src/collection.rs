//! Many lazy documents behind one provider.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::lazy::{ErrorPolicy, LazyDocument};
use crate::provider::Provider;
use crate::tree::DepthMode;
use crate::types::DocumentMeta;

/// An ordered set of [`LazyDocument`]s sharing a [`Provider`].
///
/// Documents keep the order in which they were registered.
pub struct LazyCollection {
    provider: Arc<dyn Provider>,
    documents: Vec<LazyDocument>,
    index: HashMap<String, usize>,
    error_policy: ErrorPolicy,
    depth_mode: DepthMode,
}

impl std::fmt::Debug for LazyCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyCollection")
            .field("documents", &self.documents)
            .field("error_policy", &self.error_policy)
            .field("depth_mode", &self.depth_mode)
            .finish_non_exhaustive()
    }
}

impl LazyCollection {
    /// Empty collection. Call [`LazyCollection::preload_metadata`] to populate it
    /// from the provider's listing.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            documents: Vec::new(),
            index: HashMap::new(),
            error_policy: ErrorPolicy::default(),
            depth_mode: DepthMode::default(),
        }
    }

    /// Policy applied to documents registered from now on.
    #[must_use]
    pub const fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Depth mode applied to documents registered from now on.
    #[must_use]
    pub const fn with_depth_mode(mut self, depth_mode: DepthMode) -> Self {
        self.depth_mode = depth_mode;
        self
    }

    fn lazy(&self, meta: DocumentMeta) -> LazyDocument {
        LazyDocument::new(meta, Arc::clone(&self.provider))
            .with_error_policy(self.error_policy)
            .with_depth_mode(self.depth_mode)
    }

    /// Register a document, replacing any previous one with the same id.
    pub fn insert(&mut self, document: LazyDocument) -> &mut LazyDocument {
        let id = document.id().to_string();
        let position = match self.index.get(&id) {
            Some(&position) => {
                self.documents[position] = document;
                position
            },
            None => {
                self.documents.push(document);
                self.index.insert(id, self.documents.len() - 1);
                self.documents.len() - 1
            },
        };
        &mut self.documents[position]
    }

    /// Register a not-yet-loaded document for every entry the provider lists.
    ///
    /// Returns the number of documents registered.
    ///
    /// # Errors
    ///
    /// Fails when the provider cannot produce its listing.
    pub fn preload_metadata(&mut self) -> Result<usize> {
        info!("preloading document metadata");
        let listed = self.provider.list()?;
        let count = listed.len();
        for meta in listed {
            let document = self.lazy(meta);
            self.insert(document);
        }
        info!(count, "preloaded document metadata");
        Ok(count)
    }

    /// A registered document, or one fetched now and registered with its blocks
    /// already assigned. `None` when the provider cannot supply it.
    pub fn get_document(&mut self, id: &str) -> Option<&mut LazyDocument> {
        if let Some(&position) = self.index.get(id) {
            return self.documents.get_mut(position);
        }

        let fetched = match self.provider.fetch(id) {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(document_id = id, category = err.category(), error = %err, "could not load document");
                return None;
            },
        };

        let mut document = self.lazy(fetched.meta);
        if !fetched.blocks.is_empty() {
            document.set_blocks(fetched.blocks);
        }
        Some(self.insert(document))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(LazyDocument::id)
    }

    pub fn documents(&self) -> impl Iterator<Item = &LazyDocument> {
        self.documents.iter()
    }

    /// Mutable access to every document, for callers driving loads themselves
    /// (for example across worker threads).
    pub fn documents_mut(&mut self) -> &mut [LazyDocument] {
        &mut self.documents
    }

    /// Case-insensitive substring search over titles and, when
    /// `search_content` is set, block contents. Searching content loads blocks.
    ///
    /// Returns matching ids in collection order.
    pub fn search_documents(
        &mut self,
        query: &str,
        search_titles: bool,
        search_content: bool,
    ) -> Vec<String> {
        let query = query.to_lowercase();
        let mut matches = Vec::new();

        for document in &mut self.documents {
            if search_titles && document.title().to_lowercase().contains(&query) {
                matches.push(document.id().to_string());
                continue;
            }
            if !search_content {
                continue;
            }
            let id = document.id().to_string();
            match document.blocks() {
                Ok(blocks) => {
                    if blocks
                        .iter()
                        .any(|block| block.content.to_lowercase().contains(&query))
                    {
                        matches.push(id);
                    }
                },
                Err(err) => warn!(document_id = %id, error = %err, "skipping document in search"),
            }
        }

        debug!(query = %query, matches = matches.len(), "searched documents");
        matches
    }

    /// Load blocks for each listed id that is registered. Unknown ids are
    /// skipped. Returns how many documents ended up loaded.
    pub fn batch_preload<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut loaded = 0;
        for id in ids {
            let id = id.as_ref();
            let Some(&position) = self.index.get(id) else {
                debug!(document_id = id, "skipping unknown document in preload");
                continue;
            };
            match self.documents[position].ensure_blocks_loaded() {
                Ok(()) => loaded += 1,
                Err(err) => warn!(document_id = id, error = %err, "preload failed"),
            }
        }
        loaded
    }

    /// Free loaded content. With `keep_metadata` the documents stay registered
    /// and reload on next use; without it the collection is emptied.
    pub fn clear_loaded_content(&mut self, keep_metadata: bool) {
        if keep_metadata {
            for document in &mut self.documents {
                document.clear_content();
            }
        } else {
            self.documents.clear();
            self.index.clear();
        }
    }
}

/// Fetch a document's metadata and return it as a not-yet-loaded lazy document.
///
/// The blocks fetched along the way are dropped; they are fetched again on first
/// read.
///
/// # Errors
///
/// Propagates the provider's error when the document cannot be fetched.
pub fn create_lazy_document(id: &str, provider: Arc<dyn Provider>) -> Result<LazyDocument> {
    let fetched = provider.fetch(id)?;
    Ok(LazyDocument::new(fetched.meta, provider))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::lazy::LoadState;
    use crate::provider::Fetched;
    use crate::types::Block;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// In-memory provider recording which ids were fetched.
    struct Library {
        docs: Vec<(DocumentMeta, Vec<Block>)>,
        fetched: Mutex<Vec<String>>,
    }

    impl Library {
        fn new() -> Self {
            let doc = |id: &str, title: &str, body: &str| {
                (
                    DocumentMeta::new(id, title),
                    vec![Block::new(format!("{id}_1"), "paragraph", body)],
                )
            };
            Self {
                docs: vec![
                    doc("rust", "Rust Notes", "ownership and borrowing"),
                    doc("go", "Go Notes", "goroutines and channels"),
                    doc("zig", "Zig Notes", "comptime and allocators"),
                ],
                fetched: Mutex::new(Vec::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetched.lock().unwrap().len()
        }
    }

    impl Provider for Library {
        fn fetch(&self, document_id: &str) -> Result<Fetched> {
            self.fetched.lock().unwrap().push(document_id.to_string());
            self.docs
                .iter()
                .find(|(meta, _)| meta.id == document_id)
                .map(|(meta, blocks)| Fetched::new(meta.clone(), blocks.clone()))
                .ok_or_else(|| Error::NotFound(document_id.to_string()))
        }

        fn list(&self) -> Result<Vec<DocumentMeta>> {
            Ok(self.docs.iter().map(|(meta, _)| meta.clone()).collect())
        }
    }

    fn preloaded() -> (Arc<Library>, LazyCollection) {
        let library = Arc::new(Library::new());
        let mut collection = LazyCollection::new(library.clone());
        collection.preload_metadata().unwrap();
        (library, collection)
    }

    #[test]
    fn test_preload_metadata_fetches_nothing() {
        let (library, collection) = preloaded();

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.ids().collect::<Vec<_>>(), vec!["rust", "go", "zig"]);
        assert_eq!(library.fetch_count(), 0);
        assert!(collection.documents().all(|d| d.load_state() == LoadState::NotLoaded));
    }

    #[test]
    fn test_get_document_fetches_unknown_once() -> Result<()> {
        // Given: an empty collection
        let library = Arc::new(Library::new());
        let mut collection = LazyCollection::new(library.clone());

        // When: asking for a document not yet registered, then reading it
        let document = collection.get_document("go").unwrap();
        let blocks = document.blocks()?.len();

        // Then: the blocks came from the single registration fetch
        assert_eq!(blocks, 1);
        assert_eq!(library.fetch_count(), 1);
        assert!(collection.contains("go"));
        assert!(collection.get_document("missing").is_none());
        Ok(())
    }

    #[test]
    fn test_search_titles_and_content() {
        let (library, mut collection) = preloaded();

        let by_title = collection.search_documents("NOTES", true, false);
        assert_eq!(by_title.len(), 3);
        assert_eq!(library.fetch_count(), 0);

        let by_content = collection.search_documents("channels", false, true);
        assert_eq!(by_content, vec!["go"]);
        assert_eq!(library.fetch_count(), 3);
    }

    #[test]
    fn test_batch_preload_skips_unknown_ids() {
        let (library, mut collection) = preloaded();

        let loaded = collection.batch_preload(["rust", "nope", "zig"]);

        assert_eq!(loaded, 2);
        assert_eq!(library.fetch_count(), 2);
    }

    #[test]
    fn test_clear_loaded_content() {
        let (library, mut collection) = preloaded();
        collection.batch_preload(["rust"]);

        collection.clear_loaded_content(true);
        assert_eq!(collection.len(), 3);
        assert!(collection.documents().all(|d| !d.is_blocks_loaded()));

        collection.batch_preload(["rust"]);
        assert_eq!(library.fetch_count(), 2);

        collection.clear_loaded_content(false);
        assert!(collection.is_empty());
        assert!(!collection.contains("rust"));
    }

    #[test]
    fn test_create_lazy_document_drops_blocks() -> Result<()> {
        let library = Arc::new(Library::new());

        let mut document = create_lazy_document("zig", library.clone())?;

        assert_eq!(document.load_state(), LoadState::NotLoaded);
        assert_eq!(document.title(), "Zig Notes");
        assert_eq!(document.blocks()?.len(), 1);
        assert_eq!(library.fetch_count(), 2);
        assert!(create_lazy_document("nope", library).is_err());
        Ok(())
    }

    #[test]
    fn test_documents_load_across_threads() {
        let (library, mut collection) = preloaded();

        std::thread::scope(|scope| {
            for document in collection.documents_mut() {
                scope.spawn(move || document.ensure_blocks_loaded().unwrap());
            }
        });

        assert_eq!(library.fetch_count(), 3);
        assert!(collection.documents().all(LazyDocument::is_blocks_loaded));
    }
}
