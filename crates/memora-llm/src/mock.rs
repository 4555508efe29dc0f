//! Offline model implementations for tests and standalone runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::LlmError;
use crate::provider::{ChatMessage, LanguageModel, ModelReply};
use crate::tool::ToolDefinition;

/// Model that replays a fixed script of replies in order.
///
/// Records every completion request so tests can assert on the prompts the
/// engines actually sent. Returns [`LlmError::ScriptExhausted`] once the
/// script runs out.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<ModelReply>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a model preloaded with the given replies.
    pub fn with_replies(replies: Vec<ModelReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Append a plain text reply to the script.
    pub fn push_text(&self, content: impl Into<String>) {
        self.push_reply(ModelReply::text(content));
    }

    /// Append a reply to the script.
    pub fn push_reply(&self, reply: ModelReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push_back(reply);
        }
    }

    /// All completion requests seen so far, in call order.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ModelReply, LlmError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        let mut replies = self
            .replies
            .lock()
            .map_err(|e| LlmError::Provider(format!("script lock poisoned: {}", e)))?;
        replies.pop_front().ok_or(LlmError::ScriptExhausted)
    }
}

/// Model that answers every completion with the same fixed text.
///
/// Used by the standalone binary when no real provider is wired in, so the
/// routed modes still work end to end without network access.
pub struct StubModel {
    reply: String,
}

impl StubModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Default for StubModel {
    fn default() -> Self {
        Self::new("I'm running without a language model right now, but I'm still here with you.")
    }
}

#[async_trait]
impl LanguageModel for StubModel {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ModelReply, LlmError> {
        Ok(ModelReply::text(self.reply.clone()))
    }
}
