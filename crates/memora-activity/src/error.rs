//! Error types for the activity engine.

use memora_core::MemoraError;

/// Errors from the activity protocol. All of these are friendly: the
/// router turns them into plain responses rather than failing the turn.
#[derive(Debug, thiserror::Error)]
pub enum ActivityError {
    #[error("an activity is already in progress: {0}")]
    AlreadyActive(String),
    #[error("not in an activity")]
    NotInActivity,
    #[error("unrecognized activity: {0}")]
    UnrecognizedActivity(String),
}

impl From<ActivityError> for MemoraError {
    fn from(err: ActivityError) -> Self {
        MemoraError::Activity(err.to_string())
    }
}
