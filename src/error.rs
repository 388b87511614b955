use crate::embedding::EmbeddingError;
use crate::generation::GenerationError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ragindex
#[derive(Error, Debug)]
pub enum RagError {
    /// No persisted index at the given location
    #[error("Index not found: {path}")]
    IndexNotFound { path: PathBuf },

    /// Persisted index exists but cannot be trusted
    #[error("Index at {path} is corrupt: {reason}")]
    IndexCorrupt { path: PathBuf, reason: String },

    /// Persisted index was written by an incompatible format version
    #[error("Index at {path} uses format version {found}, expected {expected}")]
    IndexVersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    /// Another writer holds the index lock
    #[error("Index at {path} is locked by another writer")]
    IndexLocked { path: PathBuf },

    /// Vector dimension does not match the index
    #[error("Invalid dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index was built with a different embedding model
    #[error("Index was built with embedding model '{index}', but provider is '{provider}'")]
    EmbeddingModelMismatch { index: String, provider: String },

    /// Caller supplied an unusable argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Embedding capability failed
    #[error("Embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Generation capability failed
    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// A source document could not be read
    #[error("Failed to load document {path}: {message}")]
    DocumentLoad { path: PathBuf, message: String },

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RagError {
    pub(crate) fn io(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::IndexCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for ragindex operations
pub type Result<T> = std::result::Result<T, RagError>;
