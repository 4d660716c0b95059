//! Core library client for docvec
//!
//! [`DocIndexClient`] ties the loader, embedder, normalizer, index and
//! document record together: `build` produces the two artifacts, `search`
//! and `info` read them back.

mod indexing;

use crate::config::Config;
use crate::docstore::DocStore;
use crate::embedding::{EmbeddingProvider, FastEmbedManager};
use crate::index::FlatIpIndex;
use crate::normalize::normalize_in_place;
use crate::types::{IndexInfo, SearchHit, SearchResponse};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Main client for building and querying a document index
///
/// The embedding model is loaded on first use, so input problems (a
/// missing data directory, no usable documents) are reported before any
/// model download starts.
///
/// # Example
///
/// ```no_run
/// use docvec::{Config, DocIndexClient};
///
/// fn main() -> anyhow::Result<()> {
///     let mut config = Config::default();
///     config.input.data_dir = "notes".into();
///
///     let client = DocIndexClient::with_config(config)?;
///     let report = client.build()?;
///     println!("Indexed {} documents", report.documents_indexed);
///
///     for hit in client.search("which courses first?", None, None)?.results {
///         println!("{:.3} {}", hit.score, hit.source);
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct DocIndexClient {
    pub(crate) config: Arc<Config>,
    provider: Arc<OnceCell<Arc<dyn EmbeddingProvider>>>,
}

impl DocIndexClient {
    /// Create a client from the config file, environment and defaults
    pub fn new() -> Result<Self> {
        let config = Config::new().context("Failed to load configuration")?;
        Self::with_config(config)
    }

    /// Create a client with a custom configuration, using FastEmbed for
    /// embeddings
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        tracing::debug!("Data directory: {}", config.input.data_dir.display());
        tracing::debug!("Embedding model: {}", config.embedding.model_name);
        tracing::debug!("Batch size: {}", config.embedding.batch_size);

        Ok(Self {
            config: Arc::new(config),
            provider: Arc::new(OnceCell::new()),
        })
    }

    /// Create a client that embeds with `provider` instead of FastEmbed
    pub fn with_provider(config: Config, provider: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let client = Self::with_config(config)?;
        let _ = client.provider.set(provider);
        Ok(client)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The embedding provider, loading the configured FastEmbed model if none
    /// has been set yet
    pub(crate) fn provider(&self) -> Result<&Arc<dyn EmbeddingProvider>> {
        self.provider.get_or_try_init(|| {
            let manager = FastEmbedManager::from_config(&self.config.embedding)
                .context("Failed to initialize embedding provider")?;
            Ok(Arc::new(manager) as Arc<dyn EmbeddingProvider>)
        })
    }

    /// Load the persisted index and document record, checking that they
    /// describe the same rows
    pub fn load_artifacts(&self) -> Result<(FlatIpIndex, DocStore)> {
        let index_path = &self.config.output.index_path;
        let docs_path = &self.config.output.docs_path;

        let index = FlatIpIndex::load(index_path)
            .with_context(|| format!("Failed to load index from {}", index_path.display()))?;
        let docs = DocStore::load(docs_path)
            .with_context(|| format!("Failed to load documents from {}", docs_path.display()))?;

        docs.check_rows(index.len()).with_context(|| {
            format!(
                "{} and {} are out of sync; rebuild the index",
                index_path.display(),
                docs_path.display()
            )
        })?;

        Ok((index, docs))
    }

    /// Embed `query` and return the closest documents, best first.
    ///
    /// `limit` and `min_score` fall back to the `search` config section.
    pub fn search(
        &self,
        query: &str,
        limit: Option<usize>,
        min_score: Option<f32>,
    ) -> Result<SearchResponse> {
        let start = Instant::now();
        anyhow::ensure!(!query.trim().is_empty(), "Search query must not be empty");

        let limit = limit.unwrap_or(self.config.search.limit);
        let min_score = min_score.unwrap_or(self.config.search.min_score);

        let (index, docs) = self.load_artifacts()?;
        let provider = self.provider()?;

        let mut query_vector = provider
            .embed_batch(vec![query.to_string()])
            .context("Failed to embed query")?
            .into_iter()
            .next()
            .context("Embedding provider returned no vector for the query")?;
        normalize_in_place(&mut query_vector);

        let neighbors = index
            .search(&query_vector, limit)
            .context("Query does not match the index; was it built with another model?")?;

        let results: Vec<SearchHit> = neighbors
            .into_iter()
            .filter(|n| n.score >= min_score)
            .filter_map(|n| {
                docs.get(n.position).map(|(text, meta)| SearchHit {
                    position: n.position,
                    score: n.score,
                    source: meta.source.clone(),
                    text: text.to_string(),
                })
            })
            .collect();

        tracing::debug!("Search returned {} results", results.len());

        Ok(SearchResponse {
            query: query.to_string(),
            results,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Describe the persisted artifacts without loading the embedding model
    pub fn info(&self) -> Result<IndexInfo> {
        let (index, docs) = self.load_artifacts()?;

        let sources: BTreeSet<String> = docs.metadatas.iter().map(|m| m.source.clone()).collect();

        Ok(IndexInfo {
            index_path: self.config.output.index_path.clone(),
            docs_path: self.config.output.docs_path.clone(),
            vectors: index.len(),
            dimension: index.dimension(),
            documents: docs.len(),
            sources: sources.into_iter().collect(),
        })
    }
}
