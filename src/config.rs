/// Configuration system for docvec
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::error::{ConfigError, DocvecError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Where documents are read from
    #[serde(default)]
    pub input: InputConfig,

    /// Embedding model configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Where the index and document record are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,
}

/// Document input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory scanned for documents (not recursive)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Glob matched against file names
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Files larger than this (in bytes) are skipped
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

/// Embedding model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model name (e.g., "all-MiniLM-L6-v2", "BAAI/bge-small-en-v1.5")
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Batch size for embedding generation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Directory holding downloaded model files
    #[serde(default = "default_model_cache_dir")]
    pub cache_dir: PathBuf,

    /// Show a progress bar while the model downloads
    #[serde(default = "default_show_download_progress")]
    pub show_download_progress: bool,
}

/// Output artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Serialized vector index
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Serialized texts and metadatas, in index order
    #[serde(default = "default_docs_path")]
    pub docs_path: PathBuf,
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Default result limit
    #[serde(default = "default_result_limit")]
    pub limit: usize,

    /// Minimum inner-product score (-1.0 to 1.0) for a hit to be returned
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_pattern() -> String {
    "*.txt".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1_048_576 // 10 MB
}

fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}

fn default_batch_size() -> usize {
    32
}

fn default_model_cache_dir() -> PathBuf {
    crate::paths::PlatformPaths::default_model_cache_dir()
}

fn default_show_download_progress() -> bool {
    true
}

fn default_index_path() -> PathBuf {
    PathBuf::from("vector_index.index")
}

fn default_docs_path() -> PathBuf {
    PathBuf::from("vector_docs.json")
}

fn default_result_limit() -> usize {
    5
}

fn default_min_score() -> f32 {
    -1.0
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            pattern: default_pattern(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            batch_size: default_batch_size(),
            cache_dir: default_model_cache_dir(),
            show_download_progress: default_show_download_progress(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            docs_path: default_docs_path(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_result_limit(),
            min_score: default_min_score(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// Values are not validated here: environment and command-line
    /// overrides may still replace them. Call [`Config::validate`] once they
    /// have been applied.
    pub fn from_file(path: &Path) -> Result<Self, DocvecError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        Ok(config)
    }

    /// Load `./docvec.toml`, then the user-level config file, then defaults
    pub fn load_or_default() -> Result<Self, DocvecError> {
        let candidates = [
            crate::paths::PlatformPaths::local_config_path(),
            crate::paths::PlatformPaths::default_config_path(),
        ];

        for config_path in candidates {
            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return Self::from_file(&config_path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), DocvecError> {
        if self.input.pattern.trim().is_empty() {
            return Err(invalid("input.pattern", "must not be empty"));
        }

        if self.input.max_file_size == 0 {
            return Err(invalid("input.max_file_size", "must be greater than 0"));
        }

        if crate::embedding::resolve_model(&self.embedding.model_name).is_none() {
            return Err(invalid(
                "embedding.model_name",
                format!(
                    "unsupported model '{}', expected one of: {}",
                    self.embedding.model_name,
                    crate::embedding::SUPPORTED_MODELS.join(", ")
                ),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(invalid("embedding.batch_size", "must be greater than 0"));
        }

        if self.search.limit == 0 {
            return Err(invalid("search.limit", "must be greater than 0"));
        }

        if !(-1.0..=1.0).contains(&self.search.min_score) {
            return Err(invalid(
                "search.min_score",
                format!("must be between -1.0 and 1.0, got {}", self.search.min_score),
            ));
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("DOCVEC_DATA_DIR") {
            self.input.data_dir = PathBuf::from(dir);
        }

        if let Ok(path) = std::env::var("DOCVEC_INDEX_PATH") {
            self.output.index_path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("DOCVEC_DOCS_PATH") {
            self.output.docs_path = PathBuf::from(path);
        }

        if let Ok(model) = std::env::var("DOCVEC_MODEL") {
            self.embedding.model_name = model;
        }

        if let Ok(batch_size) = std::env::var("DOCVEC_BATCH_SIZE")
            && let Ok(size) = batch_size.parse()
        {
            self.embedding.batch_size = size;
        }

        if let Ok(min_score) = std::env::var("DOCVEC_MIN_SCORE")
            && let Ok(score) = min_score.parse()
        {
            self.search.min_score = score;
        }
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, DocvecError> {
        let mut config = Self::load_or_default()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> DocvecError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason: reason.into(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input.data_dir, PathBuf::from("data"));
        assert_eq!(config.input.pattern, "*.txt");
        assert_eq!(config.embedding.model_name, "all-MiniLM-L6-v2");
        assert_eq!(config.embedding.batch_size, 32);
        assert_eq!(config.output.index_path, PathBuf::from("vector_index.index"));
        assert_eq!(config.output.docs_path, PathBuf::from("vector_docs.json"));
        assert_eq!(config.search.limit, 5);
        assert_eq!(config.search.min_score, -1.0);
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_batch_size() {
        let mut config = Config::default();
        config.embedding.batch_size = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            DocvecError::Config(ConfigError::InvalidValue { ref key, .. }) if key == "embedding.batch_size"
        ));
    }

    #[test]
    fn test_validate_unknown_model() {
        let mut config = Config::default();
        config.embedding.model_name = "not-a-model".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_invalid_min_score() {
        let mut config = Config::default();
        config.search.min_score = 1.5;
        assert!(config.validate().is_err());

        config.search.min_score = -0.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_pattern() {
        let mut config = Config::default();
        config.input.pattern = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_limit() {
        let mut config = Config::default();
        config.search.limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        let mut config = Config::default();
        config.embedding.batch_size = 64;
        config.input.data_dir = PathBuf::from("corpus");
        config.search.min_score = 0.25;
        std::fs::write(path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = Config::from_file(path).unwrap();

        assert_eq!(loaded.embedding.batch_size, 64);
        assert_eq!(loaded.input.data_dir, PathBuf::from("corpus"));
        assert_eq!(loaded.search.min_score, 0.25);
    }

    #[test]
    fn test_from_file_defers_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docvec.toml");
        std::fs::write(&path, "[embedding]\nbatch_size = 0\n").unwrap();

        let mut config = Config::from_file(&path).unwrap();
        assert!(config.validate().is_err());

        config.embedding.batch_size = 8;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docvec.toml");
        std::fs::write(&path, "[embedding]\nbatch_size = 8\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.embedding.batch_size, 8);
        assert_eq!(config.embedding.model_name, "all-MiniLM-L6-v2");
        assert_eq!(config.input.pattern, "*.txt");
        assert_eq!(config.output.docs_path, PathBuf::from("vector_docs.json"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docvec.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let result = Config::from_file(&path);
        assert!(matches!(
            result.unwrap_err(),
            DocvecError::Config(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::from_file(Path::new("/nonexistent/docvec.toml"));
        assert!(matches!(
            result.unwrap_err(),
            DocvecError::Config(ConfigError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_toml_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("model_name"));
        assert!(toml_str.contains("index_path"));
    }

    #[test]
    fn test_apply_env_overrides() {
        // Safety: only this test touches DOCVEC_* variables
        unsafe {
            std::env::set_var("DOCVEC_DATA_DIR", "/srv/notes");
            std::env::set_var("DOCVEC_INDEX_PATH", "out/index.bin");
            std::env::set_var("DOCVEC_DOCS_PATH", "out/docs.json");
            std::env::set_var("DOCVEC_MODEL", "BAAI/bge-base-en-v1.5");
            std::env::set_var("DOCVEC_BATCH_SIZE", "64");
            std::env::set_var("DOCVEC_MIN_SCORE", "0.3");
        }

        let mut config = Config::default();
        config.apply_env_overrides();

        assert_eq!(config.input.data_dir, PathBuf::from("/srv/notes"));
        assert_eq!(config.output.index_path, PathBuf::from("out/index.bin"));
        assert_eq!(config.output.docs_path, PathBuf::from("out/docs.json"));
        assert_eq!(config.embedding.model_name, "BAAI/bge-base-en-v1.5");
        assert_eq!(config.embedding.batch_size, 64);
        assert_eq!(config.search.min_score, 0.3);

        // Safety: cleaning up the variables set above
        unsafe {
            std::env::remove_var("DOCVEC_DATA_DIR");
            std::env::remove_var("DOCVEC_INDEX_PATH");
            std::env::remove_var("DOCVEC_DOCS_PATH");
            std::env::remove_var("DOCVEC_MODEL");
            std::env::remove_var("DOCVEC_BATCH_SIZE");
            std::env::remove_var("DOCVEC_MIN_SCORE");
        }
    }

    #[test]
    fn test_model_cache_dir_uses_platform_paths() {
        let config = EmbeddingConfig::default();
        assert!(config.cache_dir.ends_with("docvec/models"));
    }
}
