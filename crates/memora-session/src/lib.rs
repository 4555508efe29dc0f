//! The conversation session router.
//!
//! Every inbound `(user_id, message)` pair is routed to exactly one mode:
//! an in-progress assessment, a live activity, a newly triggered
//! assessment, or LLM free chat with calendar tools. A best-effort fact
//! extraction task runs alongside whichever mode fires.

pub mod error;
pub mod router;
pub mod triggers;
pub mod types;

pub use error::RouterError;
pub use router::SessionRouter;
pub use types::RouterResponse;
