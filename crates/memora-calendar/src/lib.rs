//! Calendar capabilities exposed to the language model.
//!
//! Each operation is a [`ToolHandler`] registered by name; the model calls
//! them mid-completion to read and write the user's calendar. The "smart"
//! update and delete operations resolve fuzzy natural-language references
//! through the match crate before acting.
//!
//! [`ToolHandler`]: memora_llm::ToolHandler

pub mod tools;

pub use tools::{calendar_registry, CreateEventTool, FindBestMatchingEventTool, GetEventsTool,
    SearchEventsTool, SmartDeleteEventTool, SmartUpdateEventTool};
