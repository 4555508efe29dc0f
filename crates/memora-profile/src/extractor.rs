//! LLM-backed profile fact extraction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use memora_core::{MemoraError, UserProfile};
use memora_llm::{ChatMessage, LanguageModel};
use memora_store::UserRepository;

/// One-shot structured extraction with a best-effort profile merge.
pub struct FactExtractor {
    model: Arc<dyn LanguageModel>,
    users: Arc<dyn UserRepository>,
    /// Per-user locks so two concurrent extractions for the same user
    /// cannot interleave their read-merge-write cycles.
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl FactExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            model,
            users,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Extract facts from a message and merge them into the user's profile.
    ///
    /// Never fails: extraction errors, parse failures, and storage errors
    /// are logged and swallowed. No-op on empty or whitespace messages.
    pub async fn extract_and_store(&self, user_id: &str, message: &str) {
        if message.trim().is_empty() {
            return;
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        match self.try_extract(user_id, message).await {
            Ok(true) => debug!(user_id, "Profile facts stored"),
            Ok(false) => debug!(user_id, "No profile facts found"),
            Err(e) => warn!(user_id, error = %e, "Fact extraction failed"),
        }
    }

    async fn try_extract(&self, user_id: &str, message: &str) -> Result<bool, MemoraError> {
        let prompt = extraction_prompt(message);
        let reply = self
            .model
            .complete(&[ChatMessage::user(prompt)], &[])
            .await
            .map_err(MemoraError::from)?;

        let body = strip_code_fences(&reply.content);
        let parsed: Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(e) => {
                debug!(user_id, error = %e, "Extraction reply was not valid JSON");
                return Ok(false);
            }
        };
        let Some(object) = parsed.as_object() else {
            debug!(user_id, "Extraction reply was not a JSON object");
            return Ok(false);
        };

        let mut profile = self
            .users
            .get_by_id(user_id)
            .await?
            .unwrap_or_else(|| UserProfile::new(user_id));

        let mut wrote = false;
        for (key, value) in object {
            // Only recognized keys with non-empty string values count;
            // everything else in the object is ignored.
            if let Some(text) = value.as_str() {
                let text = text.trim();
                if !text.is_empty() && profile.set_field(key, text.to_string()) {
                    wrote = true;
                }
            }
        }

        if wrote {
            profile.last_interaction_at = Some(Utc::now());
            self.users.update(profile).await?;
        }
        Ok(wrote)
    }

    fn user_lock(&self, user_id: &str) -> Arc<tokio::sync::Mutex<()>> {
        match self.locks.lock() {
            Ok(mut locks) => locks
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone(),
            Err(e) => {
                warn!("Extraction lock registry poisoned: {}", e);
                Arc::new(tokio::sync::Mutex::new(()))
            }
        }
    }
}

/// Build the strict extraction prompt for a message.
fn extraction_prompt(message: &str) -> String {
    format!(
        "Extract personal facts about the user from this message. Respond with only a \
         JSON object whose keys are among: {}. Use string values. Only include a key if \
         the message explicitly states that fact; do not infer or guess. If no facts are \
         present, respond with {{}}.\n\nMessage: {}",
        UserProfile::field_names().join(", "),
        message
    )
}

/// Strip surrounding markdown code-fence markers from a model reply.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let inner = match inner.find('\n') {
        Some(idx) => &inner[idx + 1..],
        None => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
