//! Tool capability table for model completions.
//!
//! Tools are declared to the model as JSON-schema definitions and
//! dispatched by name through the [`ToolRegistry`]. Handlers receive the
//! acting user's id so every capability stays scoped to that user's data.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Declared shape of a callable tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema for the arguments object.
    pub parameters: Value,
}

/// Errors from tool dispatch and execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("tool execution failed: {0}")]
    Execution(String),
}

/// A callable capability exposed to the model.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// The definition declared to the model.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool on behalf of a user.
    async fn call(&self, user_id: &str, args: Value) -> Result<Value, ToolError>;
}

/// Name-keyed registry of tool handlers.
#[derive(Default)]
pub struct ToolRegistry {
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its declared name.
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        self.handlers.insert(handler.definition().name, handler);
    }

    /// Definitions of all registered tools, sorted by name for stable output.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> =
            self.handlers.values().map(|h| h.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Dispatch a tool call by name.
    pub async fn dispatch(
        &self,
        name: &str,
        user_id: &str,
        args: Value,
    ) -> Result<Value, ToolError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tracing::debug!(tool = name, "Dispatching tool call");
        handler.call(user_id, args).await
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }
}
