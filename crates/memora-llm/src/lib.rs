//! The language model collaborator seam.
//!
//! Memora treats the LLM as an opaque completion function behind the
//! [`LanguageModel`] trait. Declared tools are passed alongside the
//! conversation; a reply either carries final text or tool calls for the
//! caller to execute and feed back.

pub mod error;
pub mod mock;
pub mod provider;
pub mod tool;

pub use error::LlmError;
pub use mock::{ScriptedModel, StubModel};
pub use provider::{ChatMessage, LanguageModel, ModelReply, Role, ToolCall};
pub use tool::{ToolDefinition, ToolError, ToolHandler, ToolRegistry};
