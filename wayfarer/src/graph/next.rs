//! Next-step result from a graph node: jump to a node, or end.
//!
//! The graph runner uses this to decide the next node or to stop.

use super::NodeId;

/// Next step after running a node.
///
/// - **Node(id)**: run the given node next.
/// - **End**: stop; return current state as final result.
///
/// **Interaction**: Returned by `Node::run` (computed by the routers in `graph::router`);
/// consumed by `CompiledPlanningGraph::stream`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "node")]
pub enum Next {
    /// Run the node with the given id next.
    Node(NodeId),
    /// Stop and return the current state.
    End,
}

impl Next {
    pub fn is_end(&self) -> bool {
        matches!(self, Next::End)
    }
}

impl std::fmt::Display for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Next::Node(id) => write!(f, "{}", id),
            Next::End => f.write_str("end"),
        }
    }
}
