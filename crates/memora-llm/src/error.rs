//! Error types for the language model seam.

use memora_core::MemoraError;

/// Errors from a completion call.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("scripted model has no replies left")]
    ScriptExhausted,
}

impl From<LlmError> for MemoraError {
    fn from(err: LlmError) -> Self {
        MemoraError::Llm(err.to_string())
    }
}
