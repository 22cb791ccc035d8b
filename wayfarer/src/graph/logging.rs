//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start/stop, node execution and routing.

use crate::error::AgentError;

use super::{Next, NodeId};

/// Log node execution start.
pub fn log_node_start(step: usize, node_id: NodeId) {
    tracing::debug!(step, node_id = %node_id, "Starting node execution");
}

/// Log node execution completion with the routing decision.
pub fn log_node_complete(step: usize, node_id: NodeId, next: &Next, messages: usize) {
    tracing::debug!(step, node_id = %node_id, next = %next, messages, "Node execution complete");
}

/// Log graph execution start.
pub fn log_graph_start(destination: &str, recursion_limit: usize) {
    tracing::info!(destination, recursion_limit, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps, "Graph execution complete");
}

/// Log a forced stop at the recursion limit.
pub fn log_recursion_limit(steps: usize, pending: NodeId) {
    tracing::warn!(steps, pending = %pending, "Recursion limit reached; returning partial state");
}

/// Log graph execution error.
pub fn log_graph_error(step: usize, node_id: NodeId, error: &AgentError) {
    tracing::error!(step, node_id = %node_id, %error, "Graph execution error");
}
