//! Fuzzy matching of natural-language references to stored calendar events.
//!
//! Users refer to events loosely ("my doctor appt", "the thing with Rosa"),
//! so update and delete operations resolve their target by ranking every
//! candidate with a blended string-similarity score. Stateless: every call
//! recomputes scores from the candidate list it is given.

pub mod resolver;
pub mod similarity;

pub use resolver::{
    find_best, find_best_with_threshold, rank, MatchOutcome, ScoredMatch, CONFIRM_THRESHOLD,
};
pub use similarity::similarity;
