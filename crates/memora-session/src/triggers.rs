//! Fixed trigger phrase sets.
//!
//! Mode detection is deliberately keyword-based: a case-insensitive
//! substring check against a small fixed phrase set, not language
//! understanding.

/// Phrases in a user message that start a new assessment.
const ASSESSMENT_TRIGGERS: [&str; 4] = [
    "start dementia assessment",
    "start cognitive assessment",
    "start memory test",
    "memory check",
];

/// Phrases in a model reply that start an activity, with the activity kind
/// each one maps to.
const ACTIVITY_TRIGGERS: [(&str, &str); 2] = [
    ("start memory recall activity", "memory recall"),
    ("start memory recall game", "memory recall"),
];

/// Whether a user message asks to begin an assessment.
pub fn is_assessment_trigger(message: &str) -> bool {
    let lower = message.to_lowercase();
    ASSESSMENT_TRIGGERS
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// The activity kind a model reply asks to start, if any.
pub fn activity_trigger(reply: &str) -> Option<&'static str> {
    let lower = reply.to_lowercase();
    ACTIVITY_TRIGGERS
        .iter()
        .find(|(phrase, _)| lower.contains(phrase))
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ---- Assessment triggers ----

    #[test]
    fn test_exact_trigger_phrases() {
        assert!(is_assessment_trigger("start dementia assessment"));
        assert!(is_assessment_trigger("memory check"));
    }

    #[test]
    fn test_trigger_case_insensitive() {
        assert!(is_assessment_trigger("Start Dementia Assessment"));
        assert!(is_assessment_trigger("MEMORY CHECK"));
    }

    #[test]
    fn test_trigger_as_substring() {
        assert!(is_assessment_trigger(
            "could we do a memory check this morning?"
        ));
    }

    #[test]
    fn test_non_trigger_messages() {
        assert!(!is_assessment_trigger("how are you today"));
        assert!(!is_assessment_trigger("check my memory usage"));
        assert!(!is_assessment_trigger(""));
    }

    // ---- Activity triggers ----

    #[test]
    fn test_activity_trigger_in_reply() {
        let reply = "Of course! Let's start memory recall activity now.";
        assert_eq!(activity_trigger(reply), Some("memory recall"));
    }

    #[test]
    fn test_activity_trigger_case_insensitive() {
        assert_eq!(
            activity_trigger("START MEMORY RECALL GAME"),
            Some("memory recall")
        );
    }

    #[test]
    fn test_no_activity_trigger() {
        assert!(activity_trigger("Here is your schedule for today.").is_none());
        assert!(activity_trigger("").is_none());
    }
}
