//! JSON channel feed loading
//!
//! A feed folder holds any number of `*.json` documents, each carrying a
//! `result` array of channel objects. Documents are read in sorted path order
//! so that first-occurrence deduplication is reproducible between runs.

use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::errors::{InputError, InputResult};
use crate::models::RawChannel;

/// Channel entries read from one feed document
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub path: PathBuf,
    pub entries: Vec<RawChannel>,
}

impl FeedDocument {
    /// Decode a document body; `Ok(None)` when it has no `result` array
    pub fn parse(path: &Path, content: &str) -> InputResult<Option<Self>> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| InputError::malformed(path, e.to_string()))?;

        let Some(items) = value.get("result").and_then(|r| r.as_array()) else {
            return Ok(None);
        };

        let mut entries = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            match serde_json::from_value::<RawChannel>(item.clone()) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(
                    "Error processing channel #{} in {}: {}",
                    position + 1,
                    path.display(),
                    e
                ),
            }
        }

        Ok(Some(Self {
            path: path.to_path_buf(),
            entries,
        }))
    }
}

/// Reads every feed document in a folder
#[derive(Debug, Clone)]
pub struct FeedLoader {
    folder: PathBuf,
}

impl FeedLoader {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Sorted list of `*.json` files in the folder
    pub async fn discover(&self) -> InputResult<Vec<PathBuf>> {
        let mut dir = tokio::fs::read_dir(&self.folder)
            .await
            .map_err(|e| InputError::from_io(&self.folder, e))?;

        let mut files = Vec::new();
        while let Some(entry) = dir
            .next_entry()
            .await
            .map_err(|e| InputError::from_io(&self.folder, e))?
        {
            let path = entry.path();
            let is_json = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load all usable documents
    ///
    /// Unreadable and malformed documents are logged and skipped; the call
    /// only fails when there is nothing to work with at all.
    pub async fn load(&self) -> InputResult<Vec<FeedDocument>> {
        let files = self.discover().await?;
        if files.is_empty() {
            return Err(InputError::NoDocuments {
                path: self.folder.clone(),
            });
        }

        info!("Found {} JSON files to process", files.len());

        let mut documents = Vec::with_capacity(files.len());
        for path in &files {
            let content = match tokio::fs::read_to_string(path).await {
                Ok(content) => content,
                Err(e) => {
                    error!("{}", InputError::from_io(path, e));
                    continue;
                }
            };

            match FeedDocument::parse(path, &content) {
                Ok(Some(document)) => {
                    debug!("Read {} entries from {}", document.entries.len(), path.display());
                    documents.push(document);
                }
                Ok(None) => warn!("Skipping {} - no 'result' array found", path.display()),
                Err(e) => error!("{}", e),
            }
        }

        if documents.is_empty() {
            return Err(InputError::NoUsableDocuments {
                path: self.folder.clone(),
                count: files.len(),
            });
        }
        Ok(documents)
    }
}
