//! The response shape handed back to the transport layer.

use serde::Serialize;

use memora_assessment::{AssessmentTurn, QuestionBehavior, QuestionKind};

/// A routed response.
///
/// `question_type` and `behavior` carry presentation metadata when the
/// turn belongs to an assessment; plain conversational turns use the
/// defaults.
#[derive(Clone, Debug, Serialize)]
pub struct RouterResponse {
    pub message: String,
    pub question_type: QuestionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<QuestionBehavior>,
}

impl RouterResponse {
    /// A plain conversational response with no question metadata.
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            question_type: QuestionKind::default(),
            behavior: None,
        }
    }
}

impl From<AssessmentTurn> for RouterResponse {
    fn from(turn: AssessmentTurn) -> Self {
        Self {
            message: turn.message,
            question_type: turn.kind,
            behavior: turn.behavior,
        }
    }
}
