use std::path::PathBuf;
use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum TriageError {
    /// Input or model path does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Dataset columns do not match the expected issue schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Model fitting failed
    #[error("Training error: {0}")]
    Training(String),

    /// Model artifact is missing, truncated or incompatible
    #[error("Corrupt model artifact: {0}")]
    CorruptArtifact(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for TriageError {
    fn from(err: config::ConfigError) -> Self {
        TriageError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TriageError>;
