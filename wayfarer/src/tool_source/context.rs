//! Context passed into tool calls for the current step.

use std::sync::Arc;

use crate::graph::NodeId;
use crate::state::TripRequest;

/// Per-step context available to tools during execution.
///
/// Built by the tool executor from the state it is dispatching for. Lookups read the
/// request from here when their arguments leave a field out (e.g. the weather lookup uses
/// the trip destination for the structured source even when the query is free text).
#[derive(Debug, Clone)]
pub struct ToolCallContext {
    /// Node that asked for the lookup.
    pub current_node: Option<NodeId>,
    pub request: Arc<TripRequest>,
}

impl ToolCallContext {
    pub fn new(current_node: Option<NodeId>, request: Arc<TripRequest>) -> Self {
        Self {
            current_node,
            request,
        }
    }
}
