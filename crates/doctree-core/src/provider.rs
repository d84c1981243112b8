//! The seam between documents and wherever their content lives.

use crate::error::Result;
use crate::types::{Block, DocumentMeta};

/// A document's metadata together with its ordered blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub meta: DocumentMeta,
    pub blocks: Vec<Block>,
}

impl Fetched {
    #[must_use]
    pub const fn new(meta: DocumentMeta, blocks: Vec<Block>) -> Self {
        Self { meta, blocks }
    }
}

/// Supplies document content on demand.
///
/// Calls block until they return or fail; timeouts and retries are the
/// implementation's business. `fetch` must be safe to call repeatedly for the
/// same id.
pub trait Provider: Send + Sync {
    /// Fetch metadata and blocks for `document_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`](crate::Error::Fetch) or
    /// [`Error::NotFound`](crate::Error::NotFound) when the document cannot be
    /// supplied.
    fn fetch(&self, document_id: &str) -> Result<Fetched>;

    /// Metadata for every document this provider knows about, without content.
    ///
    /// # Errors
    ///
    /// Implementations may fail when the listing itself cannot be produced.
    fn list(&self) -> Result<Vec<DocumentMeta>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Fixed;

    impl Provider for Fixed {
        fn fetch(&self, document_id: &str) -> Result<Fetched> {
            if document_id == "known" {
                Ok(Fetched::new(
                    DocumentMeta::new("known", "Known"),
                    vec![Block::new("b1", "paragraph", "hi")],
                ))
            } else {
                Err(Error::NotFound(document_id.to_string()))
            }
        }
    }

    #[test]
    fn test_default_listing_is_empty() {
        assert!(Fixed.list().unwrap().is_empty());
    }

    #[test]
    fn test_provider_is_object_safe() {
        let provider: Box<dyn Provider> = Box::new(Fixed);

        assert_eq!(provider.fetch("known").unwrap().blocks.len(), 1);
        assert!(matches!(provider.fetch("other"), Err(Error::NotFound(_))));
    }
}
