use super::EmbeddingProvider;
use crate::error::EmbeddingError;
use anyhow::{Context, Result};

/// Embed `texts` in contiguous batches of `batch_size`, preserving order.
///
/// Row `i` of the result is the embedding of `texts[i]` no matter where the
/// batch boundaries fall. A provider that returns the wrong number of rows
/// or rows of the wrong width fails the whole call, since either would
/// shift every later row off its document.
pub fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<Vec<f32>>> {
    anyhow::ensure!(batch_size > 0, "batch size must be greater than 0");

    let dimension = provider.dimension();
    let total_batches = texts.len().div_ceil(batch_size);
    let mut embeddings = Vec::with_capacity(texts.len());

    for (batch_idx, batch) in texts.chunks(batch_size).enumerate() {
        tracing::debug!(
            "Embedding batch {}/{} ({} texts)",
            batch_idx + 1,
            total_batches,
            batch.len()
        );

        let vectors = provider
            .embed_batch(batch.to_vec())
            .with_context(|| format!("Failed to embed batch {}/{}", batch_idx + 1, total_batches))?;

        if vectors.len() != batch.len() {
            return Err(EmbeddingError::BatchSizeMismatch {
                expected: batch.len(),
                actual: vectors.len(),
            }
            .into());
        }

        if let Some(bad) = vectors.iter().find(|v| v.len() != dimension) {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimension,
                actual: bad.len(),
            }
            .into());
        }

        embeddings.extend(vectors);
    }

    Ok(embeddings)
}
