use thiserror::Error;

/// Top-level error type for the Memora system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for MemoraError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MemoraError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Language model error: {0}")]
    Llm(String),

    #[error("Assessment error: {0}")]
    Assessment(String),

    #[error("Activity error: {0}")]
    Activity(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for MemoraError {
    fn from(err: toml::de::Error) -> Self {
        MemoraError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for MemoraError {
    fn from(err: serde_json::Error) -> Self {
        MemoraError::Serialization(err.to_string())
    }
}

/// Convenience result alias used across Memora crates.
pub type Result<T> = std::result::Result<T, MemoraError>;
