use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reserved type tag carried by the sentinel root of every [`DocTree`](crate::DocTree).
pub const ROOT_TYPE: &str = "root";

/// Deepest `heading_N` tag treated as a heading.
pub const MAX_HEADING_LEVEL: usize = 6;

/// An immutable unit of document content.
///
/// `block_type` is an open tag (`heading_1`, `paragraph`, `bulleted_list_item`, ...).
/// `indent_level` is informational unless an indent-based
/// [`DepthMode`](crate::DepthMode) is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    pub content: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(default)]
    pub indent_level: usize,
}

impl Block {
    /// Create a block with no children hint and zero indentation.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        block_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            content: content.into(),
            has_children: false,
            indent_level: 0,
        }
    }

    #[must_use]
    pub const fn with_indent(mut self, indent_level: usize) -> Self {
        self.indent_level = indent_level;
        self
    }

    #[must_use]
    pub const fn with_children(mut self, has_children: bool) -> Self {
        self.has_children = has_children;
        self
    }

    pub(crate) fn root() -> Self {
        Self::new(ROOT_TYPE, ROOT_TYPE, "").with_children(true)
    }

    /// Heading level for `heading_1` through `heading_6`, `None` for
    /// everything else.
    #[must_use]
    pub fn heading_level(&self) -> Option<usize> {
        self.block_type
            .strip_prefix("heading_")
            .and_then(|level| level.parse().ok())
            .filter(|level| (1..=MAX_HEADING_LEVEL).contains(level))
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.block_type == ROOT_TYPE
    }
}

/// Descriptive metadata of a document, independent of its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: String,
    pub title: String,
    pub created_time: DateTime<Utc>,
    pub last_edited_time: DateTime<Utc>,
    pub last_fetched: Option<DateTime<Utc>>,
    pub source_id: Option<String>,
}

impl DocumentMeta {
    /// Metadata stamped with the current time for both timestamps.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            title: title.into(),
            created_time: now,
            last_edited_time: now,
            last_fetched: None,
            source_id: None,
        }
    }

    #[must_use]
    pub const fn with_times(
        mut self,
        created_time: DateTime<Utc>,
        last_edited_time: DateTime<Utc>,
    ) -> Self {
        self.created_time = created_time;
        self.last_edited_time = last_edited_time;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }
}
