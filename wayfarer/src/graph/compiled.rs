//! Compiled planning graph: runs nodes from the coordinator until `End` or the recursion limit.
//!
//! Built by `PlanningGraph::compile`. One run is a sequence of node executions; each
//! execution is surfaced as a [`GraphStep`] by [`CompiledPlanningGraph::stream`].
//! `invoke` and `run` drain that stream.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use serde::Serialize;
use tracing::{Instrument, Span};
use uuid::Uuid;

use crate::agent::AgentNode;
use crate::error::AgentError;
use crate::state::PlanningState;

use super::config::GraphConfig;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_recursion_limit,
};
use super::{Next, Node, NodeId};

/// One node execution within a run.
#[derive(Debug, Clone)]
pub struct GraphStep {
    /// 1-based count of node executions so far.
    pub step: usize,
    pub node: NodeId,
    /// Route chosen by the node.
    pub next: Next,
    /// State right after the node ran.
    pub state: PlanningState,
    /// The recursion limit stopped the run after this step.
    pub capped: bool,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The coordinator ended the run.
    Completed,
    /// The node execution cap was reached; the state is partial.
    RecursionLimit,
}

/// Result of a drained run.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub state: PlanningState,
    pub steps: usize,
    /// Nodes in execution order.
    pub path: Vec<NodeId>,
    pub termination: Termination,
}

struct Inner {
    nodes: BTreeMap<NodeId, AgentNode>,
    config: GraphConfig,
}

/// Executable planning graph. Clones share nodes and configuration.
#[derive(Clone)]
pub struct CompiledPlanningGraph {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CompiledPlanningGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledPlanningGraph")
            .field("nodes", &self.inner.nodes.keys().collect::<Vec<_>>())
            .field("config", &self.inner.config)
            .finish()
    }
}

/// Stream position: state so far and the node to run next (`None` once finished).
struct Cursor {
    graph: Arc<Inner>,
    state: PlanningState,
    pending: Option<NodeId>,
    step: usize,
    span: Span,
}

impl CompiledPlanningGraph {
    pub(crate) fn new(nodes: BTreeMap<NodeId, AgentNode>, config: GraphConfig) -> Self {
        Self {
            inner: Arc::new(Inner { nodes, config }),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.inner.config
    }

    /// Lazily runs the graph, yielding one item per node execution.
    ///
    /// The stream ends after the step whose route is `End`, after the step that reaches
    /// the recursion limit (`capped`), or after the first error. Dropping it cancels the
    /// node in flight.
    pub fn stream(&self, initial: PlanningState) -> BoxStream<'static, Result<GraphStep, AgentError>> {
        let span = tracing::info_span!(
            "planning_run",
            run_id = %Uuid::new_v4(),
            destination = %initial.request().destination
        );
        span.in_scope(|| {
            log_graph_start(&initial.request().destination, self.inner.config.recursion_limit)
        });

        let cursor = Cursor {
            graph: Arc::clone(&self.inner),
            state: initial,
            pending: Some(NodeId::Coordinator),
            step: 0,
            span,
        };
        stream::unfold(cursor, |mut c| async move {
            let node_id = c.pending.take()?;
            let span = c.span.clone();
            let item = advance(&mut c, node_id).instrument(span).await;
            Some((item, c))
        })
        .boxed()
    }

    /// Runs to completion and returns the final state.
    ///
    /// # Errors
    ///
    /// The first node error (e.g. `AgentError::Llm`). Hitting the recursion limit is not an error.
    pub async fn invoke(&self, initial: PlanningState) -> Result<PlanningState, AgentError> {
        Ok(self.run(initial).await?.state)
    }

    /// Runs to completion and reports the path taken and why the run stopped.
    pub async fn run(&self, initial: PlanningState) -> Result<RunOutcome, AgentError> {
        let mut steps = self.stream(initial.clone());
        let mut outcome = RunOutcome {
            state: initial,
            steps: 0,
            path: Vec::new(),
            termination: Termination::Completed,
        };
        while let Some(step) = steps.next().await {
            let step = step?;
            outcome.steps = step.step;
            outcome.path.push(step.node);
            if step.capped {
                outcome.termination = Termination::RecursionLimit;
            }
            outcome.state = step.state;
        }
        Ok(outcome)
    }
}

/// Executes `node_id` against the cursor state and moves the cursor.
async fn advance(c: &mut Cursor, node_id: NodeId) -> Result<GraphStep, AgentError> {
    let step = c.step + 1;
    let graph = Arc::clone(&c.graph);
    let Some(node) = graph.nodes.get(&node_id) else {
        let err = AgentError::ExecutionFailed(format!("node not in graph: {}", node_id));
        log_graph_error(step, node_id, &err);
        return Err(err);
    };

    log_node_start(step, node_id);
    let (state, next) = match Node::run(node, &c.state).await {
        Ok(out) => out,
        Err(e) => {
            log_graph_error(step, node_id, &e);
            return Err(e);
        }
    };
    log_node_complete(step, node_id, &next, state.messages().len());

    let limit = graph.config.recursion_limit;
    let capped = match next {
        Next::Node(target) if step >= limit => {
            log_recursion_limit(step, target);
            true
        }
        Next::Node(target) => {
            c.pending = Some(target);
            false
        }
        Next::End => {
            log_graph_complete(step);
            false
        }
    };
    c.step = step;
    c.state = state.clone();
    Ok(GraphStep {
        step,
        node: node_id,
        next,
        state,
        capped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PlanningGraph;
    use crate::llm::MockLlm;
    use crate::state::TripRequest;
    use crate::tool_source::MockToolSource;

    fn initial() -> PlanningState {
        PlanningState::new(TripRequest::new("Kyoto").with_duration_days(3))
    }

    /// **Scenario**: A coordinator that keeps naming the advisor is stopped by the limit.
    #[tokio::test]
    async fn stream_stops_at_recursion_limit() {
        let graph = PlanningGraph::new(Arc::new(MockLlm::new("travel_advisor")))
            .with_tool_source(Arc::new(MockToolSource::returning("r")))
            .with_recursion_limit(3)
            .compile()
            .unwrap();
        let steps: Vec<_> = graph.stream(initial()).collect().await;
        assert_eq!(steps.len(), 3);
        let last = steps.last().unwrap().as_ref().unwrap();
        assert!(last.capped);
        assert_eq!(last.step, 3);
        let nodes: Vec<NodeId> = steps.iter().map(|s| s.as_ref().unwrap().node).collect();
        assert_eq!(
            nodes,
            vec![NodeId::Coordinator, NodeId::TravelAdvisor, NodeId::Coordinator]
        );
    }

    /// **Scenario**: An LLM failure ends the stream with that error.
    #[tokio::test]
    async fn stream_yields_error_then_ends() {
        let graph = PlanningGraph::new(Arc::new(MockLlm::failing("boom")))
            .with_tool_source(Arc::new(MockToolSource::returning("r")))
            .compile()
            .unwrap();
        let steps: Vec<_> = graph.stream(initial()).collect().await;
        assert_eq!(steps.len(), 1);
        assert!(matches!(steps[0], Err(AgentError::Llm(_))));
        let err = graph.invoke(initial()).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn run_reports_recursion_limit_termination() {
        let graph = PlanningGraph::new(Arc::new(MockLlm::new("weather_analyst")))
            .with_tool_source(Arc::new(MockToolSource::returning("r")))
            .with_recursion_limit(4)
            .compile()
            .unwrap();
        let out = graph.run(initial()).await.unwrap();
        assert_eq!(out.steps, 4);
        assert_eq!(out.termination, Termination::RecursionLimit);
        assert_eq!(out.state.iteration_count(), 2);
        assert!(out.state.final_plan().is_none());
    }
}
