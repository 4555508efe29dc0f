//! Error types for the assessment engine.

use memora_core::MemoraError;
use memora_llm::LlmError;

/// Errors from the assessment protocol.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    /// Continue was called with no in-progress assessment. Friendly, not
    /// fatal: the router turns this into a plain prompt.
    #[error("no active assessment")]
    NoActiveAssessment,
    /// The grading completion failed. The question index does not advance,
    /// so a retried message re-grades the same question.
    #[error("grading failed: {0}")]
    Grading(#[from] LlmError),
}

impl From<AssessmentError> for MemoraError {
    fn from(err: AssessmentError) -> Self {
        MemoraError::Assessment(err.to_string())
    }
}
