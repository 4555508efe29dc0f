//! The memory recall mini-game.
//!
//! Two stages: show a short word list and wait for an acknowledgement,
//! then accept exactly one recall attempt and score it.

use serde::{Deserialize, Serialize};

/// Acknowledgement token that moves the game from memorizing to recall.
const ACK_TOKEN: &str = "ready";

/// Default word list used when the caller does not supply one.
const DEFAULT_ITEMS: [&str; 3] = ["apple", "book", "cloud"];

/// Protocol stage. Only ever advances forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecallStage {
    AwaitingAcknowledgement,
    AwaitingRecall,
}

/// State of one memory recall round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecallActivity {
    items: Vec<String>,
    stage: RecallStage,
    complete: bool,
}

impl MemoryRecallActivity {
    /// Create a round over the given word list. The list is fixed for the
    /// lifetime of the round.
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            stage: RecallStage::AwaitingAcknowledgement,
            complete: false,
        }
    }

    /// Create a round over the default word list.
    pub fn with_default_items() -> Self {
        Self::new(DEFAULT_ITEMS.iter().map(|s| s.to_string()).collect())
    }

    pub fn stage(&self) -> RecallStage {
        self.stage
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// The prompt shown when the round starts.
    pub fn initial_prompt(&self) -> String {
        format!(
            "Let's exercise your memory. Please memorize these words: {}. \
             Say '{}' when you have them.",
            self.items.join(", "),
            ACK_TOKEN
        )
    }

    /// Advance the protocol with the user's input and return the next
    /// prompt. Returns an empty string once the round is complete; the
    /// engine appends the completion message.
    pub fn next_prompt(&mut self, input: &str) -> String {
        match self.stage {
            RecallStage::AwaitingAcknowledgement => {
                let trimmed = input.trim();
                let is_ack = trimmed.eq_ignore_ascii_case(ACK_TOKEN);
                // A reply that already names the first word is an early
                // recall attempt; skip straight to the recall stage.
                let is_early_recall = self
                    .items
                    .first()
                    .map(|item| contains_ignore_case(trimmed, item))
                    .unwrap_or(false);

                if is_ack || is_early_recall {
                    self.stage = RecallStage::AwaitingRecall;
                    "What were the words you just saw?".to_string()
                } else {
                    format!("Take your time. Say '{}' when you have memorized the words.", ACK_TOKEN)
                }
            }
            RecallStage::AwaitingRecall => {
                // Exactly one recall attempt per round.
                self.complete = true;
                String::new()
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether an answer names every memorized word. Case-insensitive
    /// substring match; order and extra words are ignored.
    pub fn evaluate_answer(&self, answer: &str) -> bool {
        self.items
            .iter()
            .all(|item| contains_ignore_case(answer, item))
    }

    /// The closing message for the given recall attempt.
    pub fn completion_message(&self, answer: &str) -> String {
        if self.evaluate_answer(answer) {
            format!(
                "Wonderful! You remembered all the words: {}.",
                self.items.join(", ")
            )
        } else {
            format!(
                "Good effort! The words were: {}. We can try another round whenever you like.",
                self.items.join(", ")
            )
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
