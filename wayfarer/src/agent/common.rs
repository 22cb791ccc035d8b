//! Shared model-call plumbing for the agent nodes.

use std::sync::Arc;

use serde_json::Value;

use crate::error::AgentError;
use crate::graph::NodeId;
use crate::llm::LlmClient;
use crate::message::Message;
use crate::prompts::render;
use crate::state::PlanningState;

/// Placeholder for request fields the user left out.
pub(crate) const NOT_SPECIFIED: &str = "Not specified";

/// A node's model binding: client, instruction template, and trailing message window.
#[derive(Clone)]
pub struct AgentModel {
    llm: Arc<dyn LlmClient>,
    instructions: String,
    window: usize,
}

impl AgentModel {
    pub fn new(llm: Arc<dyn LlmClient>, instructions: impl Into<String>, window: usize) -> Self {
        Self {
            llm,
            instructions: instructions.into(),
            window,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// System instruction rendered from the request (and outputs so far, when referenced).
    pub fn system_instruction(&self, state: &PlanningState) -> String {
        render(&self.instructions, &prompt_vars(state, &self.instructions))
    }

    /// Message list for one call: instruction, then the trailing window of the conversation.
    pub fn build_messages(&self, state: &PlanningState) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.window + 1);
        messages.push(Message::system(self.system_instruction(state)));
        messages.extend(state.recent_messages(self.window).iter().cloned());
        messages
    }

    /// Sends `messages` and returns the plain text of the reply.
    pub async fn reply(&self, node: NodeId, messages: &[Message]) -> Result<String, AgentError> {
        let response = self.llm.invoke(messages).await?;
        let text = response.text();
        tracing::debug!(node_id = %node, sent = messages.len(), reply_chars = text.len(), "model reply");
        Ok(text)
    }
}

/// Values for the prompt placeholders.
pub(crate) fn prompt_vars(state: &PlanningState, template: &str) -> Vec<(&'static str, String)> {
    let r = state.request();
    let or_unspecified = |v: Option<&String>| {
        v.filter(|s| !s.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    };
    let interests = if r.interests.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        r.interests_joined()
    };
    let mut vars = vec![
        ("destination", r.destination.clone()),
        ("origin", or_unspecified(r.origin.as_ref())),
        ("duration", r.duration_days.to_string()),
        ("duration_label", r.duration_label()),
        ("budget", r.budget.clone()),
        ("interests", interests),
        ("group_size", r.group_size.to_string()),
        ("travel_dates", or_unspecified(r.travel_dates.as_ref())),
    ];
    if template.contains("{agent_outputs}") {
        vars.push(("agent_outputs", outputs_digest(state)));
    }
    vars
}

/// Specialist outputs so far as pretty JSON; the coordinator's own entry is left out.
fn outputs_digest(state: &PlanningState) -> String {
    let digest: serde_json::Map<String, Value> = state
        .agent_outputs()
        .iter()
        .filter(|(id, _)| **id != NodeId::Coordinator)
        .filter_map(|(id, out)| {
            serde_json::to_value(out)
                .ok()
                .map(|v| (id.as_str().to_string(), v))
        })
        .collect();
    serde_json::to_string_pretty(&Value::Object(digest)).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;
    use crate::state::{AgentOutput, TripRequest};

    fn state() -> PlanningState {
        PlanningState::new(
            TripRequest::new("Kyoto")
                .with_duration_days(3)
                .with_interests(["food", "temples"]),
        )
    }

    #[test]
    fn prompt_vars_fill_missing_fields_with_placeholder() {
        let vars = prompt_vars(&state(), "");
        let get = |k: &str| vars.iter().find(|(n, _)| *n == k).map(|(_, v)| v.clone());
        assert_eq!(get("origin").as_deref(), Some(NOT_SPECIFIED));
        assert_eq!(get("travel_dates").as_deref(), Some(NOT_SPECIFIED));
        assert_eq!(get("interests").as_deref(), Some("food, temples"));
        assert_eq!(get("duration").as_deref(), Some("3"));
        assert!(get("agent_outputs").is_none());
    }

    /// **Scenario**: The outputs digest lists specialists and omits the coordinator.
    #[test]
    fn agent_outputs_digest_skips_coordinator() {
        let mut s = state();
        s.record_output(NodeId::Coordinator, AgentOutput::text("travel_advisor"));
        s.record_output(NodeId::LocalExpert, AgentOutput::text("Try Nishiki market"));
        let vars = prompt_vars(&s, "{agent_outputs}");
        let digest = &vars.last().unwrap().1;
        assert!(digest.contains("local_expert"));
        assert!(digest.contains("Nishiki"));
        assert!(!digest.contains("\"coordinator\""));
    }

    /// **Scenario**: The message list is the instruction plus at most `window` trailing messages.
    #[test]
    fn build_messages_applies_window() {
        let mut s = state();
        for i in 0..4 {
            s.push_message(Message::assistant(format!("m{}", i)));
        }
        let model = AgentModel::new(Arc::new(MockLlm::new("x")), "Plan {destination}.", 2);
        let msgs = model.build_messages(&s);
        assert_eq!(msgs.len(), 3);
        assert_eq!(msgs[0], Message::system("Plan Kyoto."));
        assert_eq!(msgs[1].content(), "m2");
        assert_eq!(msgs[2].content(), "m3");
    }
}
