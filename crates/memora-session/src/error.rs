//! Error types for the session router.

use memora_assessment::AssessmentError;
use memora_core::MemoraError;
use memora_llm::LlmError;

/// Errors surfaced by [`SessionRouter::route`].
///
/// [`SessionRouter::route`]: crate::router::SessionRouter::route
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// No user id was supplied. Fails fast with no side effects.
    #[error("Please provide a user id so I know who I'm talking with.")]
    MissingUserId,
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    /// Grading failed for this turn; the assessment did not advance.
    #[error("assessment error: {0}")]
    Assessment(#[from] AssessmentError),
    /// The free-chat completion failed.
    #[error("chat completion failed: {0}")]
    Llm(#[from] LlmError),
    /// The model kept requesting tools past the configured round budget.
    #[error("the model exceeded {0} tool rounds without a final reply")]
    ToolRoundsExceeded(usize),
}

impl From<RouterError> for MemoraError {
    fn from(err: RouterError) -> Self {
        match err {
            RouterError::MissingUserId => MemoraError::Validation(err.to_string()),
            RouterError::EmptyMessage | RouterError::MessageTooLong(_) => {
                MemoraError::Validation(err.to_string())
            }
            RouterError::Assessment(inner) => inner.into(),
            RouterError::Llm(inner) => inner.into(),
            RouterError::ToolRoundsExceeded(_) => MemoraError::Llm(err.to_string()),
        }
    }
}
