//! Activity registry and dispatch.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;

use memora_store::SessionStore;

use crate::error::ActivityError;
use crate::recall::MemoryRecallActivity;

/// Quit commands recognized in any activity (case-insensitive exact match).
const QUIT_COMMANDS: [&str; 2] = ["quit game", "exit game"];

/// The activity kinds a user can start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivityKind {
    MemoryRecall,
}

impl ActivityKind {
    /// Parse a user- or model-supplied kind name.
    pub fn parse(name: &str) -> Option<Self> {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        match normalized.split_whitespace().collect::<Vec<_>>().join(" ").as_str() {
            "memory recall" | "memory recall activity" => Some(ActivityKind::MemoryRecall),
            _ => None,
        }
    }

    /// Display names of every available kind, for suggestions.
    pub fn available() -> &'static [&'static str] {
        &["memory recall"]
    }

    fn instantiate(&self) -> Activity {
        match self {
            ActivityKind::MemoryRecall => {
                Activity::MemoryRecall(MemoryRecallActivity::with_default_items())
            }
        }
    }
}

/// A live activity instance. One variant per mini-game; adding a game means
/// adding a variant and its match arms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Activity {
    MemoryRecall(MemoryRecallActivity),
}

impl Activity {
    pub fn name(&self) -> &'static str {
        match self {
            Activity::MemoryRecall(_) => "memory recall",
        }
    }

    pub fn initial_prompt(&self) -> String {
        match self {
            Activity::MemoryRecall(game) => game.initial_prompt(),
        }
    }

    pub fn next_prompt(&mut self, input: &str) -> String {
        match self {
            Activity::MemoryRecall(game) => game.next_prompt(input),
        }
    }

    pub fn is_complete(&self) -> bool {
        match self {
            Activity::MemoryRecall(game) => game.is_complete(),
        }
    }

    pub fn evaluate_answer(&self, answer: &str) -> bool {
        match self {
            Activity::MemoryRecall(game) => game.evaluate_answer(answer),
        }
    }

    pub fn completion_message(&self, answer: &str) -> String {
        match self {
            Activity::MemoryRecall(game) => game.completion_message(answer),
        }
    }
}

/// Owns the per-user activity registry and running scores.
pub struct ActivityEngine {
    registry: Arc<dyn SessionStore<Activity>>,
    scores: Mutex<HashMap<String, u32>>,
}

impl ActivityEngine {
    pub fn new(registry: Arc<dyn SessionStore<Activity>>) -> Self {
        Self {
            registry,
            scores: Mutex::new(HashMap::new()),
        }
    }

    /// Whether the user has a live activity that should own their next
    /// message.
    pub fn has_active(&self, user_id: &str) -> bool {
        self.registry.get(user_id).is_some()
    }

    /// The user's running score across completed activities.
    pub fn score(&self, user_id: &str) -> u32 {
        self.scores
            .lock()
            .ok()
            .and_then(|scores| scores.get(user_id).copied())
            .unwrap_or(0)
    }

    /// Start an activity for a user.
    ///
    /// Rejects if one is already live (never overwrites) or the kind is
    /// unrecognized. Returns the activity's opening prompt.
    pub fn start(&self, user_id: &str, kind_name: &str) -> Result<String, ActivityError> {
        if let Some(existing) = self.registry.get(user_id) {
            return Err(ActivityError::AlreadyActive(existing.name().to_string()));
        }
        let kind = ActivityKind::parse(kind_name)
            .ok_or_else(|| ActivityError::UnrecognizedActivity(kind_name.to_string()))?;

        let activity = kind.instantiate();
        let prompt = activity.initial_prompt();
        self.registry.upsert(user_id, activity);
        debug!(user_id, kind = kind_name, "Activity started");
        Ok(prompt)
    }

    /// Feed user input to the live activity.
    ///
    /// Quit commands always remove the activity. Completion is terminal:
    /// the final answer is evaluated, the score updated, and the entry
    /// removed regardless of correctness.
    pub fn handle_input(&self, user_id: &str, input: &str) -> Result<String, ActivityError> {
        let mut activity = self
            .registry
            .get(user_id)
            .ok_or(ActivityError::NotInActivity)?;

        let trimmed = input.trim();
        if QUIT_COMMANDS.iter().any(|cmd| trimmed.eq_ignore_ascii_case(cmd)) {
            self.registry.remove(user_id);
            debug!(user_id, "Activity quit");
            return Ok("No problem, we can play again whenever you like.".to_string());
        }

        let prompt = activity.next_prompt(input);

        if activity.is_complete() {
            let correct = activity.evaluate_answer(input);
            if correct {
                if let Ok(mut scores) = self.scores.lock() {
                    *scores.entry(user_id.to_string()).or_insert(0) += 1;
                }
            }
            let message = activity.completion_message(input);
            self.registry.remove(user_id);
            debug!(user_id, correct, "Activity completed");

            if prompt.is_empty() {
                return Ok(message);
            }
            return Ok(format!("{}\n{}", prompt, message));
        }

        self.registry.upsert(user_id, activity);
        Ok(prompt)
    }
}
