//! Itinerary planner: final structured synthesis; sets `final_plan`.

use serde_json::{json, Value};

use crate::error::AgentError;
use crate::graph::{specialist_route, Next, NodeId};
use crate::message::Message;
use crate::state::{AgentOutput, PlanningState, TripRequest};

use super::structured::{excerpt, parse_object};
use super::AgentModel;

/// Stands in for an empty reply.
pub const INTERRUPTION_NOTICE: &str =
    "The AI agent encountered a brief interruption. Please regenerate.";
const OVERVIEW_CHARS: usize = 500;
const OVERVIEW_PLACEHOLDER: &str = "Curating your bespoke travel experience.";
const CONCIERGE_NOTE: &str = "A bespoke plan is being finalized.";
const DEFAULT_SUSTAINABILITY_SCORE: u32 = 85;

pub struct ItineraryPlanner {
    model: AgentModel,
}

impl ItineraryPlanner {
    pub fn new(model: AgentModel) -> Self {
        Self { model }
    }

    pub async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        let messages = self.model.build_messages(state);
        let reply = self.model.reply(NodeId::ItineraryPlanner, &messages).await?;

        let (response, output) = if reply.trim().is_empty() {
            tracing::warn!("empty itinerary reply; storing default plan");
            let notice = INTERRUPTION_NOTICE.to_string();
            let plan = fallback_itinerary(state.request(), &notice);
            (notice.clone(), AgentOutput::recovered(notice, plan))
        } else {
            match parse_object(&reply) {
                Some((obj, level)) => {
                    tracing::debug!(?level, "itinerary reply parsed");
                    (reply.clone(), AgentOutput::completed(reply, Value::Object(obj)))
                }
                None => {
                    tracing::warn!("itinerary reply not JSON; storing default plan");
                    let plan = fallback_itinerary(state.request(), &reply);
                    (reply.clone(), AgentOutput::recovered(reply, plan))
                }
            }
        };

        let mut next_state = state.clone();
        next_state.set_final_plan(output.output.clone());
        next_state.record_output(NodeId::ItineraryPlanner, output);
        next_state.push_message(Message::assistant(response));
        next_state.set_current_node(NodeId::ItineraryPlanner);
        let next = specialist_route(&next_state);
        Ok((next_state, next))
    }
}

/// Default itinerary: titled after the destination, overview from the raw reply, no days.
pub fn fallback_itinerary(request: &TripRequest, raw: &str) -> Value {
    let overview = if raw.is_empty() {
        OVERVIEW_PLACEHOLDER.to_string()
    } else {
        excerpt(raw, OVERVIEW_CHARS)
    };
    json!({
        "trip_title": format!("Journey to {}", request.destination),
        "overview": overview,
        "sustainability_score": DEFAULT_SUSTAINABILITY_SCORE,
        "price_range": request.budget,
        "concierge_note": CONCIERGE_NOTE,
        "days": [],
    })
}
