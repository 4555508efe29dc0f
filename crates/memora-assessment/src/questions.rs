//! The question bank and presentation-behavior metadata.

use serde::{Deserialize, Serialize};

/// Presentation category of an assessment question.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    /// Plain typed question, no special presentation.
    #[default]
    Standard,
    /// Simplified presentation for users who struggle with the full flow.
    SimpleAssessment,
    /// Words to memorize; the prompt is hidden after a delay.
    MemoryRecall,
    /// Must be answered by voice.
    VerbalOnly,
    /// Voice answer against a countdown timer.
    TimedVerbal,
}

/// How the client should present a question.
///
/// This is a fixed lookup per [`QuestionKind`], not computed at runtime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBehavior {
    pub requires_voice: bool,
    pub hide_after_delay: bool,
    pub hide_delay_seconds: u32,
    pub has_timer: bool,
    pub timer_duration_seconds: u32,
    pub requires_read_aloud: bool,
}

impl QuestionKind {
    /// The presentation behavior for this kind of question.
    pub fn behavior(&self) -> QuestionBehavior {
        match self {
            QuestionKind::Standard | QuestionKind::SimpleAssessment => QuestionBehavior::default(),
            QuestionKind::MemoryRecall => QuestionBehavior {
                hide_after_delay: true,
                hide_delay_seconds: 10,
                requires_read_aloud: true,
                ..QuestionBehavior::default()
            },
            QuestionKind::VerbalOnly => QuestionBehavior {
                requires_voice: true,
                ..QuestionBehavior::default()
            },
            QuestionKind::TimedVerbal => QuestionBehavior {
                requires_voice: true,
                has_timer: true,
                timer_duration_seconds: 30,
                ..QuestionBehavior::default()
            },
        }
    }
}

/// A single question in the assessment sequence.
#[derive(Clone, Copy, Debug)]
pub struct AssessmentQuestion {
    pub text: &'static str,
    pub kind: QuestionKind,
}

const QUESTIONS: &[AssessmentQuestion] = &[
    AssessmentQuestion {
        text: "What is today's date?",
        kind: QuestionKind::Standard,
    },
    AssessmentQuestion {
        text: "Please read these three words aloud and try to remember them: apple, table, penny.",
        kind: QuestionKind::MemoryRecall,
    },
    AssessmentQuestion {
        text: "What day of the week is it today?",
        kind: QuestionKind::SimpleAssessment,
    },
    AssessmentQuestion {
        text: "What were the three words I asked you to remember?",
        kind: QuestionKind::VerbalOnly,
    },
];

/// The fixed assessment question sequence.
pub fn question_bank() -> &'static [AssessmentQuestion] {
    QUESTIONS
}
