//! Strict-precedence message routing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tracing::{debug, error, warn};

use memora_activity::{ActivityEngine, ActivityError, ActivityKind};
use memora_assessment::{AssessmentEngine, AssessmentError};
use memora_core::MemoraConfig;
use memora_llm::{ChatMessage, LanguageModel, ToolRegistry};
use memora_profile::FactExtractor;

use crate::error::RouterError;
use crate::triggers;
use crate::types::RouterResponse;

/// Top-level dispatcher for inbound messages.
///
/// Owns no conversational state of its own; it decides which engine owns a
/// message and delegates. The precedence order is a strict decision tree:
/// at most one of {assessment, activity, new assessment, free chat} fires
/// per message, and side effects happen only in the branch taken.
pub struct SessionRouter {
    assessments: AssessmentEngine,
    activities: ActivityEngine,
    extractor: Arc<FactExtractor>,
    model: Arc<dyn LanguageModel>,
    tools: ToolRegistry,
    /// Per-user turn locks so concurrent messages for one user cannot
    /// interleave read-then-write on session state.
    turn_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    max_message_length: usize,
    max_tool_rounds: usize,
    extraction_enabled: bool,
}

impl SessionRouter {
    pub fn new(
        assessments: AssessmentEngine,
        activities: ActivityEngine,
        extractor: Arc<FactExtractor>,
        model: Arc<dyn LanguageModel>,
        tools: ToolRegistry,
        config: &MemoraConfig,
    ) -> Self {
        Self {
            assessments,
            activities,
            extractor,
            model,
            tools,
            turn_locks: Mutex::new(HashMap::new()),
            max_message_length: config.chat.max_message_length,
            max_tool_rounds: config.chat.max_tool_rounds,
            extraction_enabled: config.extraction.enabled,
        }
    }

    /// Route one inbound message to exactly one interaction mode.
    pub async fn route(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<RouterResponse, RouterError> {
        // Validation happens before any side effect, including extraction.
        if user_id.trim().is_empty() {
            return Err(RouterError::MissingUserId);
        }
        if message.is_empty() {
            return Err(RouterError::EmptyMessage);
        }
        if message.len() > self.max_message_length {
            return Err(RouterError::MessageTooLong(self.max_message_length));
        }

        let turn_lock = self.turn_lock(user_id);
        let _turn = turn_lock.lock().await;

        if self.extraction_enabled {
            self.spawn_extraction(user_id, message);
        }

        if self.assessments.has_active(user_id) {
            debug!(user_id, "Routing to active assessment");
            return match self.assessments.continue_assessment(user_id, message).await {
                Ok(turn) => Ok(turn.into()),
                Err(AssessmentError::NoActiveAssessment) => Ok(RouterResponse::plain(
                    "There's no assessment in progress right now. Say 'memory check' \
                     whenever you'd like to start one.",
                )),
                Err(e) => Err(e.into()),
            };
        }

        if self.activities.has_active(user_id) {
            debug!(user_id, "Routing to active activity");
            return Ok(match self.activities.handle_input(user_id, message) {
                Ok(text) => RouterResponse::plain(text),
                Err(e) => RouterResponse::plain(friendly_activity_message(&e)),
            });
        }

        if triggers::is_assessment_trigger(message) {
            debug!(user_id, "Assessment trigger matched");
            return Ok(self.assessments.start(user_id).into());
        }

        self.free_chat(user_id, message).await
    }

    /// LLM free chat with the calendar tools, running the tool round-trip
    /// loop until the model produces final text.
    async fn free_chat(
        &self,
        user_id: &str,
        message: &str,
    ) -> Result<RouterResponse, RouterError> {
        let mut messages = vec![
            ChatMessage::system(format!(
                "You are Memora, a warm and patient companion supporting brain health. \
                 You are talking with user '{}'. You can read and manage their calendar \
                 with the provided tools. Keep replies short, kind, and concrete.",
                user_id
            )),
            ChatMessage::user(message),
        ];
        let definitions = self.tools.definitions();

        for _ in 0..self.max_tool_rounds {
            let reply = self.model.complete(&messages, &definitions).await?;

            if !reply.wants_tools() {
                // The model may decide the user asked for a mini-game;
                // intercept the trigger instead of echoing it.
                if let Some(kind) = triggers::activity_trigger(&reply.content) {
                    debug!(user_id, kind, "Activity trigger in model reply");
                    let text = match self.activities.start(user_id, kind) {
                        Ok(prompt) => prompt,
                        Err(e) => friendly_activity_message(&e),
                    };
                    return Ok(RouterResponse::plain(text));
                }
                return Ok(RouterResponse::plain(reply.content));
            }

            if !reply.content.is_empty() {
                messages.push(ChatMessage::assistant(reply.content.clone()));
            }
            for call in reply.tool_calls {
                let result = match self
                    .tools
                    .dispatch(&call.name, user_id, call.arguments.clone())
                    .await
                {
                    Ok(value) => value.to_string(),
                    Err(e) => {
                        warn!(user_id, tool = %call.name, error = %e, "Tool call failed");
                        json!({"error": e.to_string()}).to_string()
                    }
                };
                messages.push(ChatMessage::tool_result(call.id, call.name, result));
            }
        }

        Err(RouterError::ToolRoundsExceeded(self.max_tool_rounds))
    }

    /// Fire the extraction side channel with a supervised error boundary.
    ///
    /// Completion is not awaited; a panic or error inside the task is
    /// logged and can never affect the routed response.
    fn spawn_extraction(&self, user_id: &str, message: &str) {
        let extractor = Arc::clone(&self.extractor);
        let user_id = user_id.to_string();
        let message = message.to_string();
        let task = tokio::spawn(async move {
            extractor.extract_and_store(&user_id, &message).await;
        });
        tokio::spawn(async move {
            if let Err(e) = task.await {
                error!(error = %e, "Fact extraction task aborted");
            }
        });
    }

    fn turn_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        match self.turn_locks.lock() {
            Ok(mut locks) => locks
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone(),
            Err(e) => {
                error!("Turn lock registry poisoned: {}", e);
                Arc::new(tokio::sync::Mutex::new(()))
            }
        }
    }
}

/// Map activity protocol errors to friendly responses.
fn friendly_activity_message(err: &ActivityError) -> String {
    match err {
        ActivityError::AlreadyActive(name) => format!(
            "You're already in the middle of a {} activity. Say 'quit game' if you'd \
             like to stop it first.",
            name
        ),
        ActivityError::NotInActivity => {
            "You're not in an activity right now.".to_string()
        }
        ActivityError::UnrecognizedActivity(name) => format!(
            "I don't know an activity called '{}'. Available activities: {}.",
            name,
            ActivityKind::available().join(", ")
        ),
    }
}
