//! Transport & mobility: how to get there and get around, as structured output.

use serde_json::{json, Map, Value};

use crate::error::AgentError;
use crate::graph::{specialist_route, Next, NodeId};
use crate::message::Message;
use crate::state::{maps_search_url, AgentOutput, PlanningState};

use super::structured::{excerpt, parse_object};
use super::AgentModel;

const EXCERPT_CHARS: usize = 500;

pub struct TransportMobility {
    model: AgentModel,
}

impl TransportMobility {
    pub fn new(model: AgentModel) -> Self {
        Self { model }
    }

    pub async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        let destination = state.request().destination.as_str();
        let messages = self.model.build_messages(state);
        let reply = self.model.reply(NodeId::TransportMobility, &messages).await?;

        let output = match parse_object(&reply) {
            Some((obj, level)) => {
                tracing::debug!(?level, "transport reply parsed");
                AgentOutput::completed(reply.clone(), with_map_link(obj, destination))
            }
            None => {
                tracing::debug!("transport reply not JSON; using default plan");
                AgentOutput::recovered(reply.clone(), fallback_plan(destination, &reply))
            }
        };

        let mut next_state = state.clone();
        next_state.record_output(NodeId::TransportMobility, output);
        next_state.push_message(Message::assistant(reply));
        next_state.set_current_node(NodeId::TransportMobility);
        let next = specialist_route(&next_state);
        Ok((next_state, next))
    }
}

/// Sets `map_link` from `map_query`, or from the destination when the query is missing.
pub fn with_map_link(mut obj: Map<String, Value>, destination: &str) -> Value {
    let query = obj
        .get("map_query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .unwrap_or(destination)
        .to_string();
    obj.insert("map_link".into(), Value::String(maps_search_url(&query)));
    Value::Object(obj)
}

fn fallback_plan(destination: &str, raw: &str) -> Value {
    json!({
        "summary": excerpt(raw, EXCERPT_CHARS),
        "getting_there": "",
        "local_options": [],
        "tips": [],
        "map_query": destination,
        "map_link": maps_search_url(destination),
    })
}
