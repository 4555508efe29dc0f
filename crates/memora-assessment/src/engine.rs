//! Assessment state machine with LLM-assisted grading.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use memora_llm::{ChatMessage, LanguageModel};
use memora_store::SessionStore;

use crate::error::AssessmentError;
use crate::questions::{question_bank, QuestionBehavior, QuestionKind};

/// One graded answer. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub user_answer: String,
    pub correct: bool,
    pub response_time: Duration,
}

/// Per-user assessment progress.
///
/// Created fresh on every start; a new start overwrites whatever was there
/// before. A completed state is terminal and never resurrected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentState {
    pub current_question_index: usize,
    pub responses: Vec<QuestionResult>,
    pub completed: bool,
}

/// A response produced by the assessment protocol, tagged with the
/// presentation metadata of the question being asked.
#[derive(Clone, Debug)]
pub struct AssessmentTurn {
    pub message: String,
    pub kind: QuestionKind,
    pub behavior: Option<QuestionBehavior>,
}

/// Drives the question/answer protocol for all users.
pub struct AssessmentEngine {
    store: Arc<dyn SessionStore<AssessmentState>>,
    model: Arc<dyn LanguageModel>,
}

impl AssessmentEngine {
    pub fn new(store: Arc<dyn SessionStore<AssessmentState>>, model: Arc<dyn LanguageModel>) -> Self {
        Self { store, model }
    }

    /// Whether the user has an in-progress (started, not completed)
    /// assessment that should own their next message.
    pub fn has_active(&self, user_id: &str) -> bool {
        self.store
            .get(user_id)
            .map(|state| !state.completed)
            .unwrap_or(false)
    }

    /// Begin a fresh assessment, overwriting any previous state.
    ///
    /// Returns the first question.
    pub fn start(&self, user_id: &str) -> AssessmentTurn {
        let question = &question_bank()[0];
        self.store.upsert(user_id, AssessmentState::default());
        debug!(user_id, "Assessment started");
        AssessmentTurn {
            message: format!("Let's begin. First question: {}", question.text),
            kind: question.kind,
            behavior: Some(question.kind.behavior()),
        }
    }

    /// Grade the answer to the current question and advance.
    ///
    /// Grading happens before any state mutation: if the completion call
    /// fails, the index is unchanged and a retried message re-grades the
    /// same question.
    pub async fn continue_assessment(
        &self,
        user_id: &str,
        answer: &str,
    ) -> Result<AssessmentTurn, AssessmentError> {
        let mut state = self
            .store
            .get(user_id)
            .filter(|s| !s.completed)
            .ok_or(AssessmentError::NoActiveAssessment)?;

        let bank = question_bank();
        let question = bank
            .get(state.current_question_index)
            .ok_or(AssessmentError::NoActiveAssessment)?;

        let started = Instant::now();
        let correct = self.grade(question.text, answer).await?;
        let response_time = started.elapsed();

        state.responses.push(QuestionResult {
            question: question.text.to_string(),
            user_answer: answer.to_string(),
            correct,
            response_time,
        });
        state.current_question_index += 1;

        if state.current_question_index >= bank.len() {
            state.completed = true;
            let correct_count = state.responses.iter().filter(|r| r.correct).count();
            let total = state.responses.len();
            self.store.upsert(user_id, state);
            debug!(user_id, correct_count, total, "Assessment completed");

            let message = self.summarize(correct_count, total).await;
            return Ok(AssessmentTurn {
                message,
                kind: QuestionKind::Standard,
                behavior: None,
            });
        }

        let next = &bank[state.current_question_index];
        self.store.upsert(user_id, state);
        Ok(AssessmentTurn {
            message: format!("Thank you. Next question: {}", next.text),
            kind: next.kind,
            behavior: Some(next.kind.behavior()),
        })
    }

    /// Ask the model whether an answer is correct.
    async fn grade(&self, question: &str, answer: &str) -> Result<bool, AssessmentError> {
        let prompt = format!(
            "Evaluate if this response is correct for the question: '{}'. \
             The user answered: '{}'. Reply with 'correct' or 'incorrect'.",
            question, answer
        );
        let reply = self
            .model
            .complete(&[ChatMessage::user(prompt)], &[])
            .await?;

        let verdict = reply.content.to_lowercase();
        // "incorrect" contains "correct", so the negative check must run too.
        Ok(verdict.contains("correct") && !verdict.contains("incorrect"))
    }

    /// Generate the empathetic completion summary.
    ///
    /// Falls back to a plain counted summary if the completion call fails;
    /// the assessment is already persisted as completed at this point.
    async fn summarize(&self, correct_count: usize, total: usize) -> String {
        let prompt = format!(
            "A user just finished a short cognitive assessment and answered {} of {} \
             questions correctly. Write a brief, warm, empathetic summary of how they \
             did. Do not give a diagnosis.",
            correct_count, total
        );
        match self.model.complete(&[ChatMessage::user(prompt)], &[]).await {
            Ok(reply) if !reply.content.trim().is_empty() => reply.content,
            Ok(_) | Err(_) => {
                warn!("Summary generation failed, using fallback");
                format!(
                    "You've completed the assessment, answering {} of {} questions \
                     correctly. Thank you for taking the time today.",
                    correct_count, total
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memora_llm::{LlmError, ScriptedModel};
    use memora_store::MemorySessionStore;

    fn engine_with(model: Arc<ScriptedModel>) -> AssessmentEngine {
        let store: Arc<dyn SessionStore<AssessmentState>> = Arc::new(MemorySessionStore::new());
        AssessmentEngine::new(store, model)
    }

    fn engine_and_store(
        model: Arc<ScriptedModel>,
    ) -> (AssessmentEngine, Arc<MemorySessionStore<AssessmentState>>) {
        let store: Arc<MemorySessionStore<AssessmentState>> = Arc::new(MemorySessionStore::new());
        let engine = AssessmentEngine::new(store.clone(), model);
        (engine, store)
    }

    // ---- Start ----

    #[test]
    fn test_start_returns_first_question() {
        let engine = engine_with(Arc::new(ScriptedModel::new()));
        let turn = engine.start("user-1");
        assert!(turn.message.contains(question_bank()[0].text));
        assert_eq!(turn.kind, QuestionKind::Standard);
        assert!(turn.behavior.is_some());
    }

    #[test]
    fn test_start_leaves_index_zero() {
        let model = Arc::new(ScriptedModel::new());
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");
        let state = store.get("user-1").unwrap();
        assert_eq!(state.current_question_index, 0);
        assert!(!state.completed);
        assert!(state.responses.is_empty());
    }

    #[test]
    fn test_start_overwrites_previous_state() {
        let model = Arc::new(ScriptedModel::new());
        let (engine, store) = engine_and_store(model);
        store.upsert(
            "user-1",
            AssessmentState {
                current_question_index: 3,
                responses: vec![],
                completed: true,
            },
        );
        engine.start("user-1");
        let state = store.get("user-1").unwrap();
        assert_eq!(state.current_question_index, 0);
        assert!(!state.completed);
    }

    // ---- has_active ----

    #[test]
    fn test_has_active_no_state() {
        let engine = engine_with(Arc::new(ScriptedModel::new()));
        assert!(!engine.has_active("user-1"));
    }

    #[test]
    fn test_has_active_after_start() {
        let engine = engine_with(Arc::new(ScriptedModel::new()));
        engine.start("user-1");
        assert!(engine.has_active("user-1"));
    }

    #[test]
    fn test_has_active_false_when_completed() {
        let model = Arc::new(ScriptedModel::new());
        let (engine, store) = engine_and_store(model);
        store.upsert(
            "user-1",
            AssessmentState {
                current_question_index: 4,
                responses: vec![],
                completed: true,
            },
        );
        assert!(!engine.has_active("user-1"));
    }

    // ---- Continue: grading ----

    #[tokio::test]
    async fn test_continue_without_start_fails() {
        let engine = engine_with(Arc::new(ScriptedModel::new()));
        let result = engine.continue_assessment("user-1", "answer").await;
        assert!(matches!(result, Err(AssessmentError::NoActiveAssessment)));
    }

    #[tokio::test]
    async fn test_correct_answer_recorded() {
        let model = Arc::new(ScriptedModel::new());
        model.push_text("correct");
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");

        let turn = engine.continue_assessment("user-1", "June 12th").await.unwrap();
        assert!(turn.message.starts_with("Thank you. Next question:"));

        let state = store.get("user-1").unwrap();
        assert_eq!(state.current_question_index, 1);
        assert_eq!(state.responses.len(), 1);
        assert!(state.responses[0].correct);
        assert_eq!(state.responses[0].user_answer, "June 12th");
    }

    #[tokio::test]
    async fn test_incorrect_answer_recorded() {
        let model = Arc::new(ScriptedModel::new());
        model.push_text("incorrect, wrong day");
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");

        engine.continue_assessment("user-1", "March 1st").await.unwrap();
        let state = store.get("user-1").unwrap();
        assert!(!state.responses[0].correct);
    }

    #[tokio::test]
    async fn test_incorrect_substring_not_false_positive() {
        // "incorrect" contains "correct"; the verdict must still be false.
        let model = Arc::new(ScriptedModel::new());
        model.push_text("Incorrect.");
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");
        engine.continue_assessment("user-1", "whatever").await.unwrap();
        assert!(!store.get("user-1").unwrap().responses[0].correct);
    }

    #[tokio::test]
    async fn test_grading_failure_does_not_advance() {
        let model = Arc::new(ScriptedModel::new()); // empty script -> error
        let (engine, store) = engine_and_store(model.clone());
        engine.start("user-1");

        let result = engine.continue_assessment("user-1", "June 12th").await;
        assert!(matches!(result, Err(AssessmentError::Grading(_))));

        let state = store.get("user-1").unwrap();
        assert_eq!(state.current_question_index, 0);
        assert!(state.responses.is_empty());

        // A retried message re-grades the same question.
        model.push_text("correct");
        engine.continue_assessment("user-1", "June 12th").await.unwrap();
        assert_eq!(store.get("user-1").unwrap().current_question_index, 1);
    }

    #[tokio::test]
    async fn test_each_continue_advances_exactly_once() {
        let model = Arc::new(ScriptedModel::new());
        model.push_text("correct");
        model.push_text("correct");
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");

        engine.continue_assessment("user-1", "a").await.unwrap();
        assert_eq!(store.get("user-1").unwrap().current_question_index, 1);
        engine.continue_assessment("user-1", "b").await.unwrap();
        assert_eq!(store.get("user-1").unwrap().current_question_index, 2);
    }

    #[tokio::test]
    async fn test_grading_prompt_contains_question_and_answer() {
        let model = Arc::new(ScriptedModel::new());
        model.push_text("correct");
        let engine = engine_with(model.clone());
        engine.start("user-1");
        engine.continue_assessment("user-1", "June 12th").await.unwrap();

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        let prompt = &requests[0][0].content;
        assert!(prompt.contains(question_bank()[0].text));
        assert!(prompt.contains("June 12th"));
        assert!(prompt.contains("'correct' or 'incorrect'"));
    }

    // ---- Completion ----

    #[tokio::test]
    async fn test_full_run_completes_with_summary() {
        let model = Arc::new(ScriptedModel::new());
        model.push_text("correct");
        model.push_text("incorrect, wrong day");
        model.push_text("correct");
        model.push_text("correct");
        model.push_text("You did wonderfully today — three of four answers were right.");
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");

        let mut last = None;
        for answer in ["a", "b", "c", "d"] {
            last = Some(engine.continue_assessment("user-1", answer).await.unwrap());
        }

        let turn = last.unwrap();
        assert!(turn.message.contains("wonderfully"));
        assert!(turn.behavior.is_none());

        let state = store.get("user-1").unwrap();
        assert!(state.completed);
        assert_eq!(state.responses.len(), 4);
        assert_eq!(state.responses.iter().filter(|r| r.correct).count(), 3);
    }

    #[tokio::test]
    async fn test_summary_failure_uses_fallback() {
        let model = Arc::new(ScriptedModel::new());
        for _ in 0..4 {
            model.push_text("correct");
        }
        // No fifth reply: the summary completion fails.
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");

        let mut last = None;
        for answer in ["a", "b", "c", "d"] {
            last = Some(engine.continue_assessment("user-1", answer).await.unwrap());
        }

        let turn = last.unwrap();
        assert!(turn.message.contains("4 of 4"));
        assert!(store.get("user-1").unwrap().completed);
    }

    #[tokio::test]
    async fn test_continue_after_completion_fails() {
        let model = Arc::new(ScriptedModel::new());
        for _ in 0..5 {
            model.push_text("correct");
        }
        let engine = engine_with(model);
        engine.start("user-1");
        for answer in ["a", "b", "c", "d"] {
            engine.continue_assessment("user-1", answer).await.unwrap();
        }

        let result = engine.continue_assessment("user-1", "extra").await;
        assert!(matches!(result, Err(AssessmentError::NoActiveAssessment)));
    }

    #[tokio::test]
    async fn test_restart_after_completion_is_fresh() {
        let model = Arc::new(ScriptedModel::new());
        for _ in 0..5 {
            model.push_text("correct");
        }
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");
        for answer in ["a", "b", "c", "d"] {
            engine.continue_assessment("user-1", answer).await.unwrap();
        }

        engine.start("user-1");
        let state = store.get("user-1").unwrap();
        assert_eq!(state.current_question_index, 0);
        assert!(state.responses.is_empty());
        assert!(!state.completed);
    }

    // ---- Behavior tagging ----

    #[tokio::test]
    async fn test_turn_tagged_with_next_question_behavior() {
        let model = Arc::new(ScriptedModel::new());
        model.push_text("correct");
        let engine = engine_with(model);
        engine.start("user-1");

        // Question 1 is the memory-recall item.
        let turn = engine.continue_assessment("user-1", "June 12th").await.unwrap();
        assert_eq!(turn.kind, QuestionKind::MemoryRecall);
        let behavior = turn.behavior.unwrap();
        assert!(behavior.hide_after_delay);
        assert!(behavior.requires_read_aloud);
    }

    #[tokio::test]
    async fn test_response_time_recorded() {
        let model = Arc::new(ScriptedModel::new());
        model.push_text("correct");
        let (engine, store) = engine_and_store(model);
        engine.start("user-1");
        engine.continue_assessment("user-1", "a").await.unwrap();
        // Wall-clock elapsed; only sanity-check the field is populated.
        let state = store.get("user-1").unwrap();
        assert!(state.responses[0].response_time < Duration::from_secs(5));
    }
}
