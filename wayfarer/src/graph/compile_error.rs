//! Graph compilation error.
//!
//! Returned by `PlanningGraph::compile` when the configuration cannot drive a run.

use thiserror::Error;

use super::NodeId;

/// Error when compiling the planning graph.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A recursion limit of zero would stop before the coordinator ever runs.
    #[error("recursion limit must be at least 1")]
    ZeroRecursionLimit,

    /// A node was configured with an empty message window.
    #[error("message window for {0} must be at least 1")]
    ZeroMessageWindow(NodeId),

    /// A model or window override targets a node that never calls the model.
    #[error("node does not use a language model: {0}")]
    NodeWithoutModel(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Display of NodeWithoutModel names the node.
    #[test]
    fn compilation_error_display_node_without_model() {
        let s = CompilationError::NodeWithoutModel(NodeId::ToolExecutor).to_string();
        assert!(s.contains("tool_executor"), "{}", s);
    }

    #[test]
    fn compilation_error_display_zero_window_names_node() {
        let s = CompilationError::ZeroMessageWindow(NodeId::ItineraryPlanner).to_string();
        assert!(s.contains("itinerary_planner"), "{}", s);
    }

    #[test]
    fn compilation_error_display_zero_recursion_limit() {
        let s = CompilationError::ZeroRecursionLimit.to_string();
        assert!(s.contains("recursion limit"), "{}", s);
    }
}
