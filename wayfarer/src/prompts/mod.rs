//! Agent system instructions: embedded YAML defaults, directory overrides, placeholder rendering.
//!
//! Default text lives in `wayfarer/prompts/agents.yaml` and is embedded at compile time.
//! A directory (argument, or `PROMPTS_DIR`) may carry its own `agents.yaml`; keys it sets
//! replace the defaults, keys it omits keep them. See [`load`], [`load_or_default`].

mod load;

pub use load::{default_from_embedded, load, load_or_default, PromptsLoadError};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::graph::NodeId;

/// Prompt file shape; every key is optional so partial overrides work.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentPromptsFile {
    pub coordinator: Option<String>,
    pub coordinator_kickoff: Option<String>,
    pub travel_advisor: Option<String>,
    pub weather_analyst: Option<String>,
    pub budget_optimizer: Option<String>,
    pub local_expert: Option<String>,
    pub transport_mobility: Option<String>,
    pub itinerary_planner: Option<String>,
}

/// Resolved instruction templates, one per model-backed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPrompts {
    pub coordinator: String,
    /// User message the coordinator sends when the conversation is empty.
    pub coordinator_kickoff: String,
    pub travel_advisor: String,
    pub weather_analyst: String,
    pub budget_optimizer: String,
    pub local_expert: String,
    pub transport_mobility: String,
    pub itinerary_planner: String,
}

impl AgentPrompts {
    /// Template for `node`; `None` for the tool executor, which has no model.
    pub fn for_node(&self, node: NodeId) -> Option<&str> {
        let s = match node {
            NodeId::Coordinator => &self.coordinator,
            NodeId::TravelAdvisor => &self.travel_advisor,
            NodeId::WeatherAnalyst => &self.weather_analyst,
            NodeId::BudgetOptimizer => &self.budget_optimizer,
            NodeId::LocalExpert => &self.local_expert,
            NodeId::TransportMobility => &self.transport_mobility,
            NodeId::ItineraryPlanner => &self.itinerary_planner,
            NodeId::ToolExecutor => return None,
        };
        Some(s.as_str())
    }

    /// Overlays the keys present in `file`.
    pub fn merged(mut self, file: AgentPromptsFile) -> Self {
        let overlay = |slot: &mut String, v: Option<String>| {
            if let Some(v) = v {
                *slot = v;
            }
        };
        overlay(&mut self.coordinator, file.coordinator);
        overlay(&mut self.coordinator_kickoff, file.coordinator_kickoff);
        overlay(&mut self.travel_advisor, file.travel_advisor);
        overlay(&mut self.weather_analyst, file.weather_analyst);
        overlay(&mut self.budget_optimizer, file.budget_optimizer);
        overlay(&mut self.local_expert, file.local_expert);
        overlay(&mut self.transport_mobility, file.transport_mobility);
        overlay(&mut self.itinerary_planner, file.itinerary_planner);
        self
    }
}

impl Default for AgentPrompts {
    fn default() -> Self {
        default_from_embedded()
    }
}

static PLACEHOLDER: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"\{([a-z_]+)\}"));

/// Replaces `{key}` for each key in `vars`; unknown braces (JSON schemas) stay as written.
/// Substituted values are not scanned again.
pub fn render(template: &str, vars: &[(&str, String)]) -> String {
    let Ok(re) = PLACEHOLDER.as_ref() else {
        return template.to_string();
    };
    re.replace_all(template, |caps: &Captures| {
        let key = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}
