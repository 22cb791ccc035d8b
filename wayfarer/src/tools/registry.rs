use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::tool_source::{ToolCallContent, ToolCallContext, ToolSourceError, ToolSpec};
use crate::tools::r#trait::Tool;

/// Registry of tools keyed by name.
///
/// # Examples
///
/// ```
/// use wayfarer::tools::ToolRegistry;
///
/// let registry = ToolRegistry::new();
/// assert_eq!(registry.list().len(), 0);
/// ```
///
/// # Interaction
///
/// - **ToolRegistryLocked**: wraps this with `Arc<RwLock<_>>` for shared async access
/// - **AggregateToolSource**: delegates `list_tools()` and `call_tool()` here
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Registers a tool; a tool with the same name is replaced.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Specs of all registered tools, sorted by name.
    pub fn list(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self.tools.values().map(|tool| tool.spec()).collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Calls a tool by name.
    ///
    /// # Errors
    ///
    /// `ToolSourceError::NotFound` when `name` is not registered; otherwise whatever the tool returns.
    pub async fn call(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolSourceError::NotFound(name.to_string()))?;
        tool.call(args, ctx).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `ToolRegistry` behind an async `RwLock`; clones share the same registry.
#[derive(Clone)]
pub struct ToolRegistryLocked {
    inner: Arc<RwLock<ToolRegistry>>,
}

impl ToolRegistryLocked {
    pub fn from_registry(registry: ToolRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    pub async fn list(&self) -> Vec<ToolSpec> {
        let inner = self.inner.read().await;
        inner.list()
    }

    pub async fn call(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let inner = self.inner.read().await;
        inner.call(name, args, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct EchoTool(&'static str);

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            self.0
        }

        fn spec(&self) -> ToolSpec {
            ToolSpec {
                name: self.0.to_string(),
                description: None,
                input_schema: json!({}),
            }
        }

        async fn call(
            &self,
            args: serde_json::Value,
            _ctx: Option<&ToolCallContext>,
        ) -> Result<ToolCallContent, ToolSourceError> {
            Ok(ToolCallContent {
                text: format!("{}:{}", self.0, args),
            })
        }
    }

    #[tokio::test]
    async fn register_list_and_call() {
        let mut reg = ToolRegistry::new();
        reg.register(Box::new(EchoTool("b")));
        reg.register(Box::new(EchoTool("a")));
        let names: Vec<String> = reg.list().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["a", "b"]);
        let out = reg.call("a", json!(1), None).await.unwrap();
        assert_eq!(out.text, "a:1");
    }

    /// **Scenario**: Calling an unregistered name yields NotFound.
    #[tokio::test]
    async fn call_unknown_returns_not_found() {
        let reg = ToolRegistry::new();
        let err = reg.call("nope", json!({}), None).await.unwrap_err();
        assert!(matches!(err, ToolSourceError::NotFound(ref n) if n == "nope"));
    }

    #[tokio::test]
    async fn locked_registry_shares_between_clones() {
        let mut reg = ToolRegistry::new();
        reg.register(Box::new(EchoTool("x")));
        let locked = ToolRegistryLocked::from_registry(reg);
        let clone = locked.clone();
        assert_eq!(clone.list().await.len(), 1);
        assert_eq!(locked.call("x", json!("y"), None).await.unwrap().text, "x:\"y\"");
    }
}
