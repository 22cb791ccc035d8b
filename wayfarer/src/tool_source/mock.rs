//! Mock tool source: fixed tool list and result, records every call.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::graph::NodeId;

use super::{ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};

/// One recorded call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub name: String,
    pub arguments: Value,
    pub had_context: bool,
    /// Node named in the call context as the requester.
    pub requester: Option<NodeId>,
}

/// Mock ToolSource for tests: returns `call_result` for any tool name, or a fixed error.
pub struct MockToolSource {
    tools: Vec<ToolSpec>,
    call_result: Result<String, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockToolSource {
    pub fn new(tools: Vec<ToolSpec>, call_result: impl Into<String>) -> Self {
        Self {
            tools,
            call_result: Ok(call_result.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Source with no listed tools that answers every call with `text`.
    pub fn returning(text: impl Into<String>) -> Self {
        Self::new(Vec::new(), text)
    }

    /// Every call fails with `ToolSourceError::Transport(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            tools: Vec::new(),
            call_result: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Names of the tools called, in order.
    pub fn called_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.name).collect()
    }

    fn record(&self, name: &str, arguments: &Value, ctx: Option<&ToolCallContext>) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                name: name.to_string(),
                arguments: arguments.clone(),
                had_context: ctx.is_some(),
                requester: ctx.and_then(|c| c.current_node),
            });
        }
    }

    fn result(&self) -> Result<ToolCallContent, ToolSourceError> {
        match &self.call_result {
            Ok(text) => Ok(ToolCallContent { text: text.clone() }),
            Err(message) => Err(ToolSourceError::Transport(message.clone())),
        }
    }
}

#[async_trait]
impl ToolSource for MockToolSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        Ok(self.tools.clone())
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.record(name, &arguments, None);
        self.result()
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.record(name, &arguments, ctx);
        self.result()
    }
}
