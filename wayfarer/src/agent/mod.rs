//! The planning agents: one closed set of nodes behind [`AgentNode`].
//!
//! Every model-backed node follows the same step: render its instruction from the request,
//! send it with a trailing window of the conversation, record the reply under its own
//! `agent_outputs` entry, append the reply to `messages`, and route. Structured nodes
//! (weather, transport, itinerary) parse the reply leniently and never fail on bad JSON.
//! The tool executor calls a lookup instead of a model.

mod common;
mod coordinator;
mod itinerary;
mod specialist;
mod structured;
mod tool_executor;
mod transport;
mod weather;

pub use common::AgentModel;
pub use coordinator::Coordinator;
pub use itinerary::{fallback_itinerary, ItineraryPlanner, INTERRUPTION_NOTICE};
pub use specialist::Specialist;
pub use structured::{parse_object, JsonRecovery};
pub use tool_executor::{select_lookup, ToolExecutor, SEARCH_RESULTS_PREFIX, TOOL_ERROR_PREFIX};
pub use transport::{with_map_link, TransportMobility};
pub use weather::{report_from_current, WeatherAnalyst};

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node, NodeId};
use crate::state::PlanningState;

/// One node of the planning graph.
pub enum AgentNode {
    Coordinator(Coordinator),
    /// Travel advisor, budget optimizer, or local expert.
    Specialist(Specialist),
    WeatherAnalyst(WeatherAnalyst),
    TransportMobility(TransportMobility),
    ItineraryPlanner(ItineraryPlanner),
    ToolExecutor(ToolExecutor),
}

impl AgentNode {
    pub fn id(&self) -> NodeId {
        match self {
            AgentNode::Coordinator(_) => NodeId::Coordinator,
            AgentNode::Specialist(s) => s.id(),
            AgentNode::WeatherAnalyst(_) => NodeId::WeatherAnalyst,
            AgentNode::TransportMobility(_) => NodeId::TransportMobility,
            AgentNode::ItineraryPlanner(_) => NodeId::ItineraryPlanner,
            AgentNode::ToolExecutor(_) => NodeId::ToolExecutor,
        }
    }

    /// Runs one step: new state from a read-only view of the old one, plus the route.
    pub async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        match self {
            AgentNode::Coordinator(n) => n.run(state).await,
            AgentNode::Specialist(n) => n.run(state).await,
            AgentNode::WeatherAnalyst(n) => n.run(state).await,
            AgentNode::TransportMobility(n) => n.run(state).await,
            AgentNode::ItineraryPlanner(n) => n.run(state).await,
            AgentNode::ToolExecutor(n) => n.run(state).await,
        }
    }
}

#[async_trait]
impl Node for AgentNode {
    fn id(&self) -> NodeId {
        AgentNode::id(self)
    }

    async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        AgentNode::run(self, state).await
    }
}
