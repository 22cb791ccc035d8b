//! Routing functions: map the latest state to the next node or the end.
//!
//! Pure functions over `PlanningState`; nodes call them after updating state and return
//! the result as their `Next`. Matching is case-insensitive substring search on the text
//! of the latest message.

use crate::state::PlanningState;

use super::{Next, NodeId};

/// Marker a specialist writes to request a lookup: `NEED_SEARCH: <query>`.
pub const SEARCH_MARKER: &str = "NEED_SEARCH:";

/// Coordinator keyword that routes to the tool executor.
const SEARCH_KEYWORD: &str = "search";
/// Coordinator keyword asking to finish.
const FINAL_KEYWORD: &str = "final_plan";

/// Next node after the coordinator.
///
/// Order: specialist names in [`NodeId::ROUTING_PRIORITY`], then `search`, then
/// `final_plan`, else the travel advisor. `final_plan` ends the run only once the
/// itinerary planner has an entry; before that it forces the itinerary planner.
pub fn coordinator_route(state: &PlanningState) -> Next {
    let Some(last) = state.last_message() else {
        return Next::Node(NodeId::TravelAdvisor);
    };
    let text = last.content().to_lowercase();

    if let Some(id) = NodeId::ROUTING_PRIORITY
        .into_iter()
        .find(|id| text.contains(id.as_str()))
    {
        return Next::Node(id);
    }
    if text.contains(SEARCH_KEYWORD) {
        return Next::Node(NodeId::ToolExecutor);
    }
    if text.contains(FINAL_KEYWORD) {
        if state.has_output(NodeId::ItineraryPlanner) {
            return Next::End;
        }
        tracing::debug!("final_plan requested before itinerary exists; forcing itinerary_planner");
        return Next::Node(NodeId::ItineraryPlanner);
    }
    Next::Node(NodeId::TravelAdvisor)
}

/// Next node after a specialist: the tool executor when it asked for a lookup, else the coordinator.
pub fn specialist_route(state: &PlanningState) -> Next {
    if has_search_request(state.last_message_text()) {
        Next::Node(NodeId::ToolExecutor)
    } else {
        Next::Node(NodeId::Coordinator)
    }
}

/// The tool executor always hands control back to the coordinator.
pub fn tool_executor_route(_state: &PlanningState) -> Next {
    Next::Node(NodeId::Coordinator)
}

pub fn has_search_request(text: &str) -> bool {
    text.contains(SEARCH_MARKER)
}

/// Query after the first marker, trimmed. `None` when the marker is absent.
pub fn extract_search_query(text: &str) -> Option<&str> {
    text.split_once(SEARCH_MARKER).map(|(_, rest)| rest.trim())
}
