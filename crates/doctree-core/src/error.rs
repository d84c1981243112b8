//! Error types and handling for doctree-core operations.
//!
//! Almost nothing in this crate is fatal. Provider failures are absorbed at the
//! lazy-loading boundary and missing find targets are reported as `None`, so the
//! [`Error`] type mostly surfaces from configuration, filesystem access, and the
//! [`Provider`](crate::Provider) implementations themselves.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading local documents or configuration files
//! - **Fetch Errors**: a provider could not supply a document's blocks
//! - **Parse Errors**: markdown could not be turned into blocks
//! - **Configuration Errors**: invalid or unreadable settings
//! - **Reentrancy**: a load was invoked while the same load was in progress
//!
//! ```rust
//! use doctree_core::Error;
//!
//! let err = Error::Fetch {
//!     document_id: "doc-1".to_string(),
//!     reason: "connection reset".to_string(),
//! };
//! assert!(err.is_recoverable());
//! assert_eq!(err.category(), "fetch");
//! ```

use thiserror::Error;

/// The main error type for doctree-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading local source files, scanning directories and loading
    /// configuration. Timeouts and interruptions are treated as recoverable.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A provider failed to supply a document.
    ///
    /// Raised by [`Provider`](crate::Provider) implementations for transport,
    /// authentication or upstream failures. Lazy documents absorb it and move
    /// to an empty-but-loaded state.
    #[error("Failed to fetch document '{document_id}': {reason}")]
    Fetch {
        /// Identifier of the document that was requested.
        document_id: String,
        /// Human readable cause.
        reason: String,
    },

    /// Requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Markdown or text content could not be parsed into blocks.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A load operation was re-entered while already in progress.
    ///
    /// The guard is a same-thread flag, not a lock. Seeing this error means a
    /// document was left in the `Loading` state, typically because a provider
    /// panicked during a previous fetch.
    #[error("Reentrant load: {0}")]
    Reentrant(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl Error {
    /// Check if the error might be recoverable through retry logic.
    ///
    /// Fetch failures and temporary I/O conditions are worth retrying; parse,
    /// configuration and lookup failures are permanent.
    ///
    /// ```rust
    /// use doctree_core::Error;
    /// use std::io;
    ///
    /// assert!(Error::Io(io::Error::new(io::ErrorKind::TimedOut, "slow")).is_recoverable());
    /// assert!(!Error::Config("bad window size".into()).is_recoverable());
    /// ```
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch { .. } => true,
            Self::Io(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted
            ),
            _ => false,
        }
    }

    /// Get the error category as a string identifier.
    ///
    /// Useful for grouping errors in log fields.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Fetch { .. } => "fetch",
            Self::NotFound(_) => "not_found",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Reentrant(_) => "reentrant",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for Results with doctree-core errors.
pub type Result<T> = std::result::Result<T, Error>;
