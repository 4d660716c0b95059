use super::DocIndexClient;
use crate::embedding::embed_in_batches;
use crate::index::FlatIpIndex;
use crate::loader::{DocumentLoader, into_doc_store};
use crate::normalize::normalize_rows;
use crate::types::BuildReport;

use anyhow::{Context, Result};
use std::time::Instant;

impl DocIndexClient {
    /// Build the index from the configured data directory and write both
    /// artifacts.
    ///
    /// Runs load, embed, normalize, insert, persist in that order. Nothing is
    /// written unless every earlier step succeeded; an existing index at the
    /// same paths is replaced.
    pub fn build(&self) -> Result<BuildReport> {
        let start = Instant::now();
        let input = &self.config.input;
        let output = &self.config.output;

        let documents = DocumentLoader::from_config(input)
            .load()
            .context("Failed to load documents")?;
        let docs = into_doc_store(documents);

        let provider = self.provider()?;
        tracing::info!(
            "Embedding {} documents with {} (batch size {})",
            docs.len(),
            provider.model_name(),
            self.config.embedding.batch_size
        );

        let mut vectors = embed_in_batches(
            provider.as_ref(),
            &docs.texts,
            self.config.embedding.batch_size,
        )
        .context("Failed to generate embeddings")?;

        let zero_vectors = normalize_rows(&mut vectors);

        let dimension = provider.dimension();
        tracing::info!(
            "Vectors shape: ({}, {}), dim={}",
            vectors.len(),
            dimension,
            dimension
        );

        let mut index = FlatIpIndex::new(dimension).context("Failed to create index")?;
        index
            .add(&vectors)
            .context("Failed to add vectors to index")?;
        docs.check_rows(index.len())?;

        index
            .save(&output.index_path)
            .with_context(|| format!("Failed to save index to {}", output.index_path.display()))?;
        docs.save(&output.docs_path).with_context(|| {
            format!("Failed to save documents to {}", output.docs_path.display())
        })?;

        tracing::info!(
            "Saved index to '{}' and docs to '{}'",
            output.index_path.display(),
            output.docs_path.display()
        );

        Ok(BuildReport {
            documents_indexed: docs.len(),
            dimension,
            zero_vectors,
            model_name: provider.model_name().to_string(),
            index_path: output.index_path.clone(),
            docs_path: output.docs_path.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}
