//! Planning graph: node ids, routing, the builder and the executor.
//!
//! `PlanningGraph` configures models, windows and lookups, then `compile`s into a
//! `CompiledPlanningGraph`, which runs nodes from the coordinator, routing after each one
//! with the functions in [`router`], until a node returns `Next::End` or the recursion
//! limit is hit.

mod compile_error;
mod compiled;
mod config;
mod logging;
mod next;
mod node;
mod node_id;
mod planning_graph;
pub mod router;

pub use compile_error::CompilationError;
pub use compiled::{CompiledPlanningGraph, GraphStep, RunOutcome, Termination};
pub use config::{GraphConfig, DEFAULT_RECURSION_LIMIT};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_recursion_limit,
};
pub use next::Next;
pub use node::Node;
pub use node_id::NodeId;
pub use planning_graph::PlanningGraph;
pub use router::{
    coordinator_route, extract_search_query, has_search_request, specialist_route,
    tool_executor_route, SEARCH_MARKER,
};
