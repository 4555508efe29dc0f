//! Best-effort fact extraction side channel.
//!
//! Every routed message is also mined for durable facts about the user
//! (name, age, location, and so on) with a strict JSON extraction prompt.
//! The pipeline is fully decoupled from the response path: every failure
//! here is logged and swallowed, never surfaced to the user.

pub mod extractor;

pub use extractor::FactExtractor;
