//! Graph node trait: one step in the planning graph.
//!
//! Receives an immutable view of the state, returns a new state and `Next`.
//! The caller's state is never touched, so a node cannot retroactively change a snapshot
//! the executor already handed out.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::state::PlanningState;

use super::{Next, NodeId};

/// One step in the graph: state in, (state out, next step).
///
/// **Interaction**: Implemented by `AgentNode`; driven by `CompiledPlanningGraph`.
#[async_trait]
pub trait Node: Send + Sync {
    /// Node id. Unique within a graph.
    fn id(&self) -> NodeId;

    /// One step: read `state`, return the updated copy and where to go next.
    async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError>;
}
