use async_trait::async_trait;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};

/// A single lookup the tool executor can call.
///
/// Each tool has a unique name, a specification (description and JSON schema),
/// and implements the call logic. Tools are registered with `ToolRegistry` and
/// called through `AggregateToolSource`.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use serde_json::Value;
/// use wayfarer::tools::Tool;
/// use wayfarer::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
///
/// struct VisaTool;
///
/// #[async_trait]
/// impl Tool for VisaTool {
///     fn name(&self) -> &str {
///         "visa_rules"
///     }
///
///     fn spec(&self) -> ToolSpec {
///         ToolSpec {
///             name: "visa_rules".to_string(),
///             description: Some("Entry requirements for a country".to_string()),
///             input_schema: serde_json::json!({}),
///         }
///     }
///
///     async fn call(
///         &self,
///         _args: Value,
///         _ctx: Option<&ToolCallContext>,
///     ) -> Result<ToolCallContent, ToolSourceError> {
///         Ok(ToolCallContent {
///             text: "No visa needed for stays under 90 days.".to_string(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name; the tool executor selects lookups by this name.
    fn name(&self) -> &str;

    /// Name, description and JSON schema for arguments.
    fn spec(&self) -> ToolSpec;

    /// Executes the tool with the given arguments and optional per-step context.
    ///
    /// Returns `InvalidInput` for missing arguments and `Transport` for provider failures.
    /// An empty result set is not an error; tools answer with a "No ... found" sentence.
    async fn call(
        &self,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError>;
}
