//! A [`Provider`] over a directory of markdown and text files.
//!
//! Document ids are paths relative to the root directory, titles are file
//! stems. `.md` files go through [`MarkdownBlockParser`]; everything else is
//! split into paragraphs on blank lines.

use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::parser::{MarkdownBlockParser, parse_plain_text};
use crate::provider::{Fetched, Provider};
use crate::types::{Block, DocumentMeta};

/// Default glob for documents below the root directory.
pub const DEFAULT_PATTERN: &str = "**/*.md";

/// Serves documents from files below one directory.
#[derive(Debug)]
pub struct LocalSource {
    root: PathBuf,
    pattern: String,
    source_id: String,
    parser: Mutex<MarkdownBlockParser>,
}

impl LocalSource {
    /// Source over `root` using [`DEFAULT_PATTERN`].
    ///
    /// # Errors
    ///
    /// Fails when `root` is not a directory or the markdown grammar cannot be
    /// loaded.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(Error::NotFound(format!(
                "Directory path does not exist or is not a directory: {}",
                root.display()
            )));
        }
        // Globbing and id derivation both work on the canonical path.
        let root = root.canonicalize()?;

        let dirname = root
            .file_name()
            .map_or_else(|| "root".to_string(), |name| name.to_string_lossy().into_owned());

        info!(root = %root.display(), "initialized local source");
        Ok(Self {
            root,
            pattern: DEFAULT_PATTERN.to_string(),
            source_id: format!("local-{dirname}"),
            parser: Mutex::new(MarkdownBlockParser::new()?),
        })
    }

    /// Glob, relative to the root, selecting which files are listed.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    fn meta_for(&self, document_id: &str, path: &Path) -> Result<DocumentMeta> {
        let metadata = fs::metadata(path)?;
        let modified = metadata.modified().map_or_else(|_| Utc::now(), to_utc);
        let created = metadata.created().map_or(modified, to_utc);
        let title = path
            .file_stem()
            .map_or_else(|| document_id.to_string(), |stem| stem.to_string_lossy().into_owned());

        let mut meta = DocumentMeta::new(document_id, title)
            .with_times(created, modified)
            .with_source(self.source_id.clone());
        meta.last_fetched = Some(Utc::now());
        Ok(meta)
    }

    fn parse_file(&self, path: &Path) -> Result<Vec<Block>> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8_lossy(&bytes);
        if matches!(text, Cow::Owned(_)) {
            warn!(path = %path.display(), "file is not valid UTF-8, decoded lossily");
        }

        let prefix = path
            .file_stem()
            .map_or_else(|| "block".to_string(), |stem| stem.to_string_lossy().into_owned());
        let is_markdown = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"));

        if is_markdown {
            let mut parser = self
                .parser
                .lock()
                .map_err(|_| Error::Other("markdown parser lock poisoned".into()))?;
            parser.parse(&text, &prefix)
        } else {
            Ok(parse_plain_text(&text, &prefix))
        }
    }
}

fn to_utc(time: SystemTime) -> DateTime<Utc> {
    DateTime::<Utc>::from(time)
}

impl Provider for LocalSource {
    fn fetch(&self, document_id: &str) -> Result<Fetched> {
        let escapes_root = Path::new(document_id)
            .components()
            .any(|part| !matches!(part, Component::Normal(_) | Component::CurDir));
        let path = self.root.join(document_id);
        if escapes_root || !path.is_file() {
            return Err(Error::NotFound(format!(
                "Document file not found: {}",
                path.display()
            )));
        }

        let meta = self.meta_for(document_id, &path)?;
        let blocks = self.parse_file(&path)?;
        debug!(document_id, blocks = blocks.len(), "parsed local document");
        Ok(Fetched::new(meta, blocks))
    }

    fn list(&self) -> Result<Vec<DocumentMeta>> {
        let pattern = self.root.join(&self.pattern);
        let pattern = pattern.to_string_lossy();
        let paths = glob::glob(&pattern)
            .map_err(|e| Error::Config(format!("Invalid file pattern '{}': {e}", self.pattern)))?;

        let mut documents = Vec::new();
        for entry in paths {
            let path = match entry {
                Ok(path) => path,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable path");
                    continue;
                },
            };
            if !path.is_file() {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.root) else {
                continue;
            };
            let id = relative.to_string_lossy().replace('\\', "/");
            documents.push(self.meta_for(&id, &path)?);
        }

        documents.sort_by(|a, b| a.id.cmp(&b.id));
        info!(count = documents.len(), root = %self.root.display(), "listed local documents");
        Ok(documents)
    }
}
