//! LLM client abstraction for the planning agents.
//!
//! Every agent node depends on a callable that turns a message list into a reply; this
//! module defines the trait, the reply shape, and the implementations:
//! `ChatOpenAI` (OpenAI-compatible chat completions), `GeminiClient` (Gemini
//! `generateContent`), and `MockLlm` (scripted, for tests).
//!
//! Replies are either one flat string or a list of parts (some providers return
//! multi-part content). [`LlmResponse::text`] flattens both into plain text.

mod gemini;
mod mock;
mod openai;

pub use gemini::GeminiClient;
pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::AgentError;
use crate::message::Message;

/// Token usage for one LLM call (prompt + completion).
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    /// Tokens in the prompt (input).
    pub prompt_tokens: u32,
    /// Tokens in the completion (output).
    pub completion_tokens: u32,
    /// Total tokens (prompt + completion).
    pub total_tokens: u32,
}

/// One part of a multi-part reply: plain string, or an object that may carry `text`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text(String),
    Structured(Map<String, Value>),
}

impl ContentPart {
    /// Text carried by the part; `None` for non-text parts (images, function calls...).
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentPart::Text(s) => Some(s),
            ContentPart::Structured(obj) => obj.get("text").and_then(Value::as_str),
        }
    }
}

/// Reply body: flat text or ordered parts.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ResponseContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// Response from an LLM completion.
///
/// **Interaction**: Returned by `LlmClient::invoke()`; agent nodes read `text()` and
/// append it to the conversation.
#[derive(Clone, Debug, PartialEq)]
pub struct LlmResponse {
    pub content: ResponseContent,
    /// Token usage for this call, when the provider reports it.
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    pub fn text_reply(content: impl Into<String>) -> Self {
        Self {
            content: ResponseContent::Text(content.into()),
            usage: None,
        }
    }

    pub fn parts(parts: Vec<ContentPart>) -> Self {
        Self {
            content: ResponseContent::Parts(parts),
            usage: None,
        }
    }

    /// Plain text of the reply: the flat string, or all textual parts concatenated in
    /// order. Empty when nothing textual is present.
    pub fn text(&self) -> String {
        match &self.content {
            ResponseContent::Text(s) => s.clone(),
            ResponseContent::Parts(parts) => parts.iter().filter_map(ContentPart::as_text).collect(),
        }
    }
}

/// LLM client: given messages, returns the assistant reply.
///
/// Implementations: `MockLlm` (scripted), `ChatOpenAI`, `GeminiClient`.
///
/// **Interaction**: Used by every agent node except the tool executor. A failed call is
/// fatal to the run; implementations report it as `AgentError::Llm`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Invoke one turn: read messages (system first), return the reply.
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// **Scenario**: Flat text is returned as is.
    #[test]
    fn text_of_flat_reply() {
        assert_eq!(LlmResponse::text_reply("hello").text(), "hello");
    }

    /// **Scenario**: Parts concatenate in order; strings and objects with `text` count,
    /// other parts are skipped.
    #[test]
    fn text_of_parts_joins_textual_parts_only() {
        let parts: Vec<ContentPart> = serde_json::from_value(json!([
            "Kyoto ",
            {"type": "text", "text": "in "},
            {"type": "image", "url": "x.png"},
            {"text": "spring"}
        ]))
        .unwrap();
        assert_eq!(LlmResponse::parts(parts).text(), "Kyoto in spring");
    }

    #[test]
    fn text_of_non_textual_parts_is_empty() {
        let parts = vec![ContentPart::Structured(
            json!({"inline_data": "..."}).as_object().cloned().unwrap(),
        )];
        assert_eq!(LlmResponse::parts(parts).text(), "");
        assert_eq!(LlmResponse::parts(vec![]).text(), "");
    }
}
