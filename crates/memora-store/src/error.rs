//! Error types for the storage contracts.

use memora_core::MemoraError;
use uuid::Uuid;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("event not found: {0}")]
    EventNotFound(Uuid),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for MemoraError {
    fn from(err: StoreError) -> Self {
        MemoraError::Storage(err.to_string())
    }
}
