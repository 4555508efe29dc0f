//! Pluggable two-stage cognitive activities (mini-games).
//!
//! Each activity kind is a variant of the [`Activity`] enum with its own
//! protocol state; a new kind is a new variant plus its handler arms, not a
//! subclass. The [`ActivityEngine`] owns the per-user registry and running
//! scores.

pub mod engine;
pub mod error;
pub mod recall;

pub use engine::{Activity, ActivityEngine, ActivityKind};
pub use error::ActivityError;
pub use recall::{MemoryRecallActivity, RecallStage};
