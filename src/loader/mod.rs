//! Collects documents from a flat directory of text files

use crate::config::InputConfig;
use crate::docstore::{DocMetadata, DocStore};
use crate::error::LoaderError;
use globset::{Glob, GlobMatcher};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One non-blank input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Basename of the origin file
    pub source_name: String,
    /// File content with surrounding whitespace trimmed, never empty
    pub text: String,
}

pub struct DocumentLoader {
    pub(crate) root: PathBuf,
    pub(crate) pattern: String,
    pub(crate) max_file_size: u64,
}

impl DocumentLoader {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let defaults = InputConfig::default();
        Self {
            root: root.as_ref().to_path_buf(),
            pattern: defaults.pattern,
            max_file_size: defaults.max_file_size,
        }
    }

    pub fn from_config(config: &InputConfig) -> Self {
        Self {
            root: config.data_dir.clone(),
            pattern: config.pattern.clone(),
            max_file_size: config.max_file_size,
        }
    }

    /// Only file names matching this glob are read (default `*.txt`)
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Read every matching file directly under the root, in file name order,
    /// skipping files that are blank after trimming.
    ///
    /// Fails if the root is missing, or if no usable document is found.
    pub fn load(&self) -> Result<Vec<Document>, LoaderError> {
        if !self.root.exists() {
            return Err(LoaderError::DirectoryNotFound(self.root.display().to_string()));
        }
        if !self.root.is_dir() {
            return Err(LoaderError::NotADirectory(self.root.display().to_string()));
        }

        let matcher = self.matcher()?;
        let mut documents = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|e| LoaderError::FileReadFailed {
                file: e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| self.root.display().to_string()),
                reason: e.to_string(),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            // Hidden files (including `._*` resource forks) never match
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name.starts_with('.') || !matcher.is_match(&file_name) {
                continue;
            }

            if let Ok(metadata) = entry.metadata()
                && metadata.len() > self.max_file_size
            {
                tracing::warn!(
                    "Skipping {} ({} bytes exceeds limit of {})",
                    file_name,
                    metadata.len(),
                    self.max_file_size
                );
                continue;
            }

            let content =
                fs::read_to_string(entry.path()).map_err(|e| LoaderError::FileReadFailed {
                    file: entry.path().display().to_string(),
                    reason: e.to_string(),
                })?;

            let text = content.trim();
            if text.is_empty() {
                tracing::debug!("Skipping blank file: {}", file_name);
                continue;
            }

            documents.push(Document {
                source_name: file_name,
                text: text.to_string(),
            });
        }

        if documents.is_empty() {
            return Err(LoaderError::NoDocuments {
                dir: self.root.display().to_string(),
                pattern: self.pattern.clone(),
            });
        }

        tracing::info!(
            "Loaded {} documents from {}",
            documents.len(),
            self.root.display()
        );
        Ok(documents)
    }

    fn matcher(&self) -> Result<GlobMatcher, LoaderError> {
        Glob::new(&self.pattern)
            .map(|glob| glob.compile_matcher())
            .map_err(|e| LoaderError::InvalidPattern {
                pattern: self.pattern.clone(),
                reason: e.to_string(),
            })
    }
}

/// Split documents into the parallel texts/metadatas record, keeping order
pub fn into_doc_store(documents: Vec<Document>) -> DocStore {
    let mut texts = Vec::with_capacity(documents.len());
    let mut metadatas = Vec::with_capacity(documents.len());
    for doc in documents {
        texts.push(doc.text);
        metadatas.push(DocMetadata {
            source: doc.source_name,
        });
    }
    DocStore::new(texts, metadatas)
}
