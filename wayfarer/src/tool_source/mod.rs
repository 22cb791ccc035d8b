//! Tool source abstraction: list tools and call a tool.
//!
//! The tool executor depends on `ToolSource` instead of a concrete registry;
//! implementations are `AggregateToolSource` (registry of [`Tool`](crate::tools::Tool)s,
//! e.g. the travel lookups from [`TravelToolsSource`](crate::tools::TravelToolsSource))
//! and `MockToolSource` (tests).

mod context;
mod mock;

pub use context::ToolCallContext;
pub use mock::{MockToolSource, RecordedCall};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Tool specification: name, description, JSON Schema for the arguments.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    pub name: String,
    /// Human-readable description.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

/// Result of a single tool call.
///
/// **Interaction**: Returned by `ToolSource::call_tool()`; the tool executor wraps
/// `text` into a `Search Results:` message.
#[derive(Debug, Clone)]
pub struct ToolCallContent {
    pub text: String,
}

/// Errors from listing or calling tools.
///
/// **Interaction**: Returned by `ToolSource::call_tool()`; the tool executor turns them
/// into an `Error executing tool: ...` message instead of failing the run.
#[derive(Debug, Error)]
pub enum ToolSourceError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("invalid arguments: {0}")]
    InvalidInput(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Tool source: list tools and call a tool.
///
/// **Interaction**: Used by the tool executor node (`call_tool_with_context`).
#[async_trait]
pub trait ToolSource: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError>;

    /// Call a tool by name with JSON arguments.
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError>;

    /// Call a tool with per-step context (current node, request).
    /// Default implementation ignores `ctx` and calls `call_tool(name, arguments)`.
    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let _ = ctx;
        self.call_tool(name, arguments).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of each ToolSourceError variant contains expected keywords.
    #[test]
    fn tool_source_error_display_all_variants() {
        let s = ToolSourceError::NotFound("x".into()).to_string();
        assert!(s.to_lowercase().contains("not found"), "{}", s);
        let s = ToolSourceError::InvalidInput("bad".into()).to_string();
        assert!(s.to_lowercase().contains("invalid"), "{}", s);
        let s = ToolSourceError::Transport("net".into()).to_string();
        assert!(s.to_lowercase().contains("transport"), "{}", s);
    }
}
