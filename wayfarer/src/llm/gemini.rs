//! Gemini `generateContent` client implementing `LlmClient`.
//!
//! Plain `reqwest` JSON calls to `{base}/v1beta/models/{model}:generateContent`.
//! Gemini replies with a list of parts; they are kept as [`ContentPart`]s so the agents
//! flatten them the same way as any other multi-part reply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::AgentError;
use crate::llm::{ContentPart, LlmClient, LlmResponse, LlmUsage};
use crate::message::Message;

pub const GEMINI_DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Sampling settings sent as `generationConfig`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

/// Gemini client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: GEMINI_DEFAULT_BASE_URL.to_string(),
            model: GEMINI_DEFAULT_MODEL.to_string(),
            generation: GenerationConfig {
                temperature: 0.7,
                max_output_tokens: 4096,
                top_p: 0.8,
            },
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API root (tests point this at a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation.temperature = temperature;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// System messages become `systemInstruction`; the rest map to user/model turns.
    fn build_request(&self, messages: &[Message]) -> GenerateRequest {
        let system: Vec<TextPart> = messages
            .iter()
            .filter_map(|m| match m {
                Message::System(s) => Some(TextPart { text: s.clone() }),
                _ => None,
            })
            .collect();
        let contents = messages
            .iter()
            .filter_map(|m| match m {
                Message::System(_) => None,
                Message::User(s) => Some(Content {
                    role: Some("user"),
                    parts: vec![TextPart { text: s.clone() }],
                }),
                Message::Assistant(s) => Some(Content {
                    role: Some("model"),
                    parts: vec![TextPart { text: s.clone() }],
                }),
            })
            .collect();
        GenerateRequest {
            system_instruction: (!system.is_empty()).then_some(Content {
                role: None,
                parts: system,
            }),
            contents,
            generation_config: self.generation.clone(),
        }
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let body = self.build_request(messages);
        let url = self.endpoint();
        debug!(url = %url, model = %self.model, message_count = messages.len(), "Gemini generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AgentError::Llm(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AgentError::Llm(format!(
                "Gemini API error {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Llm(format!("Gemini response decode failed: {}", e)))?;
        trace!(candidates = parsed.candidates.len(), "Gemini response");

        // A blocked prompt comes back with no candidates; that is an empty reply.
        let Some(candidate) = parsed.candidates.into_iter().next() else {
            debug!(model = %self.model, "Gemini returned no candidates; treating as empty reply");
            return Ok(LlmResponse::parts(Vec::new()));
        };
        let parts = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .map(ContentPart::Structured)
            .collect();

        let usage = parsed.usage_metadata.map(|u| LlmUsage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });
        Ok(LlmResponse {
            usage,
            ..LlmResponse::parts(parts)
        })
    }
}
