//! Per-node output record stored in `PlanningState::agent_outputs`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Run status of a node's output. A node that returns has always completed; whether
/// its object was recovered from a bad reply is tracked by [`AgentOutput::recovered`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStatus {
    Completed,
}

/// What one node produced on its latest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    /// Raw text of the reply.
    pub response: String,
    /// Parsed object for structured nodes, or the reply text as a JSON string.
    pub output: Value,
    pub timestamp: DateTime<Utc>,
    pub status: OutputStatus,
    /// Structured parsing failed and `output` is a synthesized default object.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub recovered: bool,
    /// Lookup result recorded by the tool executor on behalf of this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_results: Option<String>,
}

impl AgentOutput {
    /// Completed output whose `output` is the reply text itself.
    pub fn text(response: impl Into<String>) -> Self {
        let response = response.into();
        let output = Value::String(response.clone());
        Self::completed(response, output)
    }

    pub fn completed(response: impl Into<String>, output: Value) -> Self {
        Self {
            response: response.into(),
            output,
            timestamp: Utc::now(),
            status: OutputStatus::Completed,
            recovered: false,
            search_results: None,
        }
    }

    /// Completed output whose `output` is a default object standing in for an
    /// unparseable reply.
    pub fn recovered(response: impl Into<String>, output: Value) -> Self {
        Self {
            recovered: true,
            ..Self::completed(response, output)
        }
    }
}
