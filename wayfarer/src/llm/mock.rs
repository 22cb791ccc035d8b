//! Mock LLM for tests and offline runs.
//!
//! Returns a fixed reply, a scripted sequence of replies, or a fixed error, and records
//! every message list it receives so tests can assert on prompts and windows.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::llm::{ContentPart, LlmClient, LlmResponse, ResponseContent};
use crate::message::Message;

enum Script {
    Replies(Vec<ResponseContent>),
    Fail(String),
}

/// Mock LLM: scripted replies.
///
/// In sequence mode each call returns the next reply; after the last one, the last reply
/// repeats. Failing mode returns `AgentError::Llm` on every call.
///
/// **Interaction**: Implements `LlmClient`; pass it to `PlanningGraph::new` or to
/// `PlanningGraph::with_node_llm` to script a single node.
pub struct MockLlm {
    script: Script,
    cursor: AtomicUsize,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    /// Always replies with `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self::from_script(Script::Replies(vec![ResponseContent::Text(content.into())]))
    }

    /// Replies with each entry in turn, then repeats the last one.
    pub fn sequence<I, T>(replies: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let replies: Vec<ResponseContent> = replies
            .into_iter()
            .map(|r| ResponseContent::Text(r.into()))
            .collect();
        Self::from_script(Script::Replies(replies))
    }

    /// Always replies with a multi-part body.
    pub fn with_parts(parts: Vec<ContentPart>) -> Self {
        Self::from_script(Script::Replies(vec![ResponseContent::Parts(parts)]))
    }

    /// Every call fails with `AgentError::Llm(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::from_script(Script::Fail(message.into()))
    }

    fn from_script(script: Script) -> Self {
        Self {
            script,
            cursor: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of invoke() calls so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Message lists received, oldest call first.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Message list of the most recent call.
    pub fn last_call(&self) -> Option<Vec<Message>> {
        self.calls.lock().ok().and_then(|c| c.last().cloned())
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        match &self.script {
            Script::Fail(message) => Err(AgentError::Llm(message.clone())),
            Script::Replies(replies) => {
                let n = self.cursor.fetch_add(1, Ordering::SeqCst);
                let content = replies
                    .get(n)
                    .or_else(|| replies.last())
                    .cloned()
                    .unwrap_or_else(|| ResponseContent::Text(String::new()));
                Ok(LlmResponse {
                    content,
                    usage: None,
                })
            }
        }
    }
}
