/// Centralized error types for docvec using thiserror
///
/// Each pipeline stage has its own error enum; `DocvecError` wraps them for
/// callers that want a single type.
use thiserror::Error;

/// Main error type for docvec
#[derive(Error, Debug)]
pub enum DocvecError {
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("Loading error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while collecting documents from the input directory
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Directory not found: '{0}'. Create it and add .txt files.")]
    DirectoryNotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid file pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to read file '{file}': {reason}")]
    FileReadFailed { file: String, reason: String },

    #[error("No usable documents matching '{pattern}' found in '{dir}'. Add files and rerun.")]
    NoDocuments { dir: String, pattern: String },
}

/// Errors related to embedding generation
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Failed to initialize embedding model: {0}")]
    InitializationFailed(String),

    #[error("Failed to generate embeddings: {0}")]
    GenerationFailed(String),

    #[error("Unknown embedding model: {0}")]
    UnknownModel(String),

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Embedding batch returned {actual} vectors for {expected} texts")]
    BatchSizeMismatch { expected: usize, actual: usize },

    #[error("Model lock was poisoned: {0}")]
    LockPoisoned(String),
}

/// Errors related to the vector index and its companion document record
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index dimension must be greater than 0")]
    EmptyDimension,

    #[error("Not a docvec index file: {0}")]
    InvalidFormat(String),

    #[error("Unsupported index format version {0}")]
    UnsupportedVersion(u32),

    #[error("Index file is corrupted: {0}")]
    Corrupted(String),

    #[error("Index has {vectors} vectors but document record has {texts} texts and {metadatas} metadatas")]
    ArtifactMismatch {
        vectors: usize,
        texts: usize,
        metadatas: usize,
    },

    #[error("Failed to access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode '{path}': {reason}")]
    Encode { path: String, reason: String },

    #[error("Failed to decode '{path}': {reason}")]
    Decode { path: String, reason: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl LoaderError {
    /// True for the fatal input conditions a user can fix by adding files
    /// or pointing at the right directory
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LoaderError::DirectoryNotFound(_)
                | LoaderError::NotADirectory(_)
                | LoaderError::NoDocuments { .. }
        )
    }
}

impl DocvecError {
    /// Check if this is a user error (bad input or config) vs system error
    pub fn is_user_error(&self) -> bool {
        match self {
            DocvecError::Loader(e) => e.is_input_error(),
            DocvecError::Config(ConfigError::InvalidValue { .. })
            | DocvecError::Embedding(EmbeddingError::UnknownModel(_)) => true,
            _ => false,
        }
    }
}

/// Whether anything in an error chain is a user error, as opposed to a
/// model, disk or format failure
pub fn is_user_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(e) = cause.downcast_ref::<DocvecError>() {
            e.is_user_error()
        } else if let Some(e) = cause.downcast_ref::<LoaderError>() {
            e.is_input_error()
        } else if let Some(e) = cause.downcast_ref::<EmbeddingError>() {
            matches!(e, EmbeddingError::UnknownModel(_))
        } else {
            false
        }
    })
}
