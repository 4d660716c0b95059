//! The texts/metadatas record persisted next to the vector index
//!
//! Entry `i` describes row `i` of the index.

use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-document metadata stored alongside the text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocMetadata {
    /// Basename of the file the text came from
    pub source: String,
}

/// Original texts and their metadata, in index row order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocStore {
    pub texts: Vec<String>,
    pub metadatas: Vec<DocMetadata>,
}

impl DocStore {
    pub fn new(texts: Vec<String>, metadatas: Vec<DocMetadata>) -> Self {
        Self { texts, metadatas }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Text and metadata for index row `position`
    pub fn get(&self, position: usize) -> Option<(&str, &DocMetadata)> {
        let text = self.texts.get(position)?;
        let meta = self.metadatas.get(position)?;
        Some((text.as_str(), meta))
    }

    /// Fail unless texts, metadatas and the index all have `rows` entries
    pub fn check_rows(&self, rows: usize) -> Result<(), IndexError> {
        if self.texts.len() != rows || self.metadatas.len() != rows {
            return Err(IndexError::ArtifactMismatch {
                vectors: rows,
                texts: self.texts.len(),
                metadatas: self.metadatas.len(),
            });
        }
        Ok(())
    }

    /// Load the record from disk
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = std::fs::read_to_string(path).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let store: DocStore = serde_json::from_str(&content).map_err(|e| IndexError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        tracing::debug!("Loaded {} documents from {:?}", store.len(), path);
        Ok(store)
    }

    /// Save the record to disk, replacing any existing file
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| IndexError::Encode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        crate::paths::write_atomic(path, content.as_bytes()).map_err(|source| IndexError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!("Saved {} documents to {:?}", self.len(), path);
        Ok(())
    }
}
