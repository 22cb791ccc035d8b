//! Tool executor: runs the lookup a specialist asked for with `NEED_SEARCH:`.
//!
//! Never fails the run. A lookup error becomes an `Error executing tool: ...` message.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::error::AgentError;
use crate::graph::{extract_search_query, tool_executor_route, Next, NodeId};
use crate::message::Message;
use crate::state::PlanningState;
use crate::tool_source::{ToolCallContext, ToolSource};
use crate::tools::LookupKind;

/// Prefix of the message carrying a lookup result.
pub const SEARCH_RESULTS_PREFIX: &str = "Search Results:\n\n";
/// Prefix of the message carrying a lookup error.
pub const TOOL_ERROR_PREFIX: &str = "Error executing tool: ";

pub struct ToolExecutor {
    tools: Arc<dyn ToolSource>,
}

impl ToolExecutor {
    pub fn new(tools: Arc<dyn ToolSource>) -> Self {
        Self { tools }
    }

    pub async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        let next_state = self.dispatch(state).await;
        let next = tool_executor_route(&next_state);
        Ok((next_state, next))
    }

    /// Runs the requested lookup and appends its result; without a request the state is
    /// returned unchanged.
    pub async fn dispatch(&self, state: &PlanningState) -> PlanningState {
        let Some(query) = extract_search_query(state.last_message_text()) else {
            tracing::debug!("no search request in latest message");
            return state.clone();
        };
        let requester = state.current_node();
        let kind = select_lookup(query, requester);
        let args = lookup_args(state, query);
        let ctx = ToolCallContext::new(requester, state.shared_request());
        tracing::debug!(
            tool = kind.tool_name(),
            query,
            requester = ?requester,
            "dispatching lookup"
        );

        let mut next_state = state.clone();
        match self
            .tools
            .call_tool_with_context(kind.tool_name(), args, Some(&ctx))
            .await
        {
            Ok(content) => {
                next_state.push_message(Message::assistant(format!(
                    "{}{}",
                    SEARCH_RESULTS_PREFIX, content.text
                )));
                if let Some(node) = requester {
                    if !next_state.attach_search_results(node, content.text) {
                        tracing::debug!(node_id = %node, "requester has no output entry; results not attached");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(tool = kind.tool_name(), error = %e, "lookup failed");
                next_state.push_message(Message::assistant(format!("{}{}", TOOL_ERROR_PREFIX, e)));
            }
        }
        next_state.set_current_node(NodeId::ToolExecutor);
        next_state
    }
}

/// Picks exactly one lookup from the query keywords and the requesting node.
pub fn select_lookup(query: &str, requester: Option<NodeId>) -> LookupKind {
    let q = query.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| q.contains(w));

    if has(&["weather"]) || requester == Some(NodeId::WeatherAnalyst) {
        LookupKind::WeatherInfo
    } else if has(&["hotel", "stay"]) {
        LookupKind::Hotels
    } else if has(&["restaurant", "food"]) {
        LookupKind::Restaurants
    } else if has(&["attraction", "activity"]) {
        LookupKind::Attractions
    } else if has(&["budget", "cost"]) || requester == Some(NodeId::BudgetOptimizer) {
        LookupKind::BudgetInfo
    } else if has(&["tip", "culture"]) || requester == Some(NodeId::LocalExpert) {
        LookupKind::LocalTips
    } else {
        LookupKind::DestinationInfo
    }
}

fn lookup_args(state: &PlanningState, query: &str) -> Value {
    let r = state.request();
    let mut args = json!({
        "query": query,
        "destination": r.destination,
        "budget": r.budget,
        "duration": r.duration_label(),
    });
    if let (Some(dates), Some(obj)) = (&r.travel_dates, args.as_object_mut()) {
        obj.insert("dates".into(), Value::String(dates.clone()));
    }
    args
}
