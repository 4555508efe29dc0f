//! Structured cognitive assessment protocol.
//!
//! A fixed sequence of questions is asked one at a time; each free-text
//! answer is graded by the language model and recorded with its response
//! time. Completing the final question produces an empathetic summary.

pub mod engine;
pub mod error;
pub mod questions;

pub use engine::{AssessmentEngine, AssessmentState, AssessmentTurn, QuestionResult};
pub use error::AssessmentError;
pub use questions::{question_bank, AssessmentQuestion, QuestionBehavior, QuestionKind};
