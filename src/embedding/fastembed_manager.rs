use super::EmbeddingProvider;
use crate::config::EmbeddingConfig;
use crate::error::EmbeddingError;
use anyhow::Result;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;

/// Model names accepted in `embedding.model_name`
pub const SUPPORTED_MODELS: &[&str] = &[
    "all-MiniLM-L6-v2",
    "all-MiniLM-L12-v2",
    "BAAI/bge-small-en-v1.5",
    "BAAI/bge-base-en-v1.5",
];

/// Map a configured model name to the FastEmbed model and its output dimension
pub fn resolve_model(name: &str) -> Option<(EmbeddingModel, usize)> {
    match name {
        "all-MiniLM-L6-v2" | "sentence-transformers/all-MiniLM-L6-v2" => {
            Some((EmbeddingModel::AllMiniLML6V2, 384))
        }
        "all-MiniLM-L12-v2" | "sentence-transformers/all-MiniLM-L12-v2" => {
            Some((EmbeddingModel::AllMiniLML12V2, 384))
        }
        "BAAI/bge-small-en-v1.5" | "bge-small-en-v1.5" => {
            Some((EmbeddingModel::BGESmallENV15, 384))
        }
        "BAAI/bge-base-en-v1.5" | "bge-base-en-v1.5" => Some((EmbeddingModel::BGEBaseENV15, 768)),
        _ => None,
    }
}

/// FastEmbed-based embedding provider, all-MiniLM-L6-v2 by default
pub struct FastEmbedManager {
    // `TextEmbedding::embed` needs exclusive access to the ONNX session
    model: Mutex<TextEmbedding>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedManager {
    /// Create a new FastEmbedManager with the default model (all-MiniLM-L6-v2)
    pub fn new() -> Result<Self, EmbeddingError> {
        Self::from_config(&EmbeddingConfig::default())
    }

    /// Create a FastEmbedManager for the model, cache directory and download
    /// settings in `config`
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let (model, dimension) = resolve_model(&config.model_name)
            .ok_or_else(|| EmbeddingError::UnknownModel(config.model_name.clone()))?;

        tracing::info!("Loading embedding model {}...", config.model_name);

        let mut options = InitOptions::default();
        options.model_name = model;
        options.cache_dir = config.cache_dir.clone();
        options.show_download_progress = config.show_download_progress;

        let embedding_model = TextEmbedding::try_new(options)
            .map_err(|e| EmbeddingError::InitializationFailed(format!("{:#}", e)))?;

        Ok(Self {
            model: Mutex::new(embedding_model),
            model_name: config.model_name.clone(),
            dimension,
        })
    }
}

impl EmbeddingProvider for FastEmbedManager {
    fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        tracing::debug!("Generating embeddings for {} texts", texts.len());

        let mut model = self
            .model
            .lock()
            .map_err(|e| EmbeddingError::LockPoisoned(e.to_string()))?;

        // One call per caller batch; batching is decided by `embed_in_batches`
        let batch_size = Some(texts.len());
        let embeddings = model
            .embed(texts, batch_size)
            .map_err(|e| EmbeddingError::GenerationFailed(format!("{:#}", e)))?;

        Ok(embeddings)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
