use async_trait::async_trait;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};
use crate::tools::{ToolRegistry, ToolRegistryLocked};

/// `ToolSource` over a registry of [`Tool`]s.
///
/// # Interaction
///
/// - **TravelToolsSource**: builds one of these holding the seven travel lookups
/// - **ToolExecutor**: calls `call_tool_with_context` with the current node and request
pub struct AggregateToolSource {
    registry: ToolRegistryLocked,
}

impl AggregateToolSource {
    pub fn from_registry(registry: ToolRegistry) -> Self {
        Self {
            registry: ToolRegistryLocked::from_registry(registry),
        }
    }
}

#[async_trait]
impl ToolSource for AggregateToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.registry.list().await)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.registry.call(name, arguments, None).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.registry.call(name, arguments, ctx).await
    }
}
