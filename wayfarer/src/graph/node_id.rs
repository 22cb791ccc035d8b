//! Closed set of node ids in the planning graph.
//!
//! Node ids double as `agent_outputs` keys and as the names the coordinator writes in its
//! reply to pick the next node; `as_str` is the wire/name form.

use std::fmt;
use std::str::FromStr;

/// Identifier of a node in the planning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    Coordinator,
    TravelAdvisor,
    WeatherAnalyst,
    BudgetOptimizer,
    LocalExpert,
    TransportMobility,
    ItineraryPlanner,
    ToolExecutor,
}

impl NodeId {
    /// Every node, in declaration order.
    pub const ALL: [NodeId; 8] = [
        NodeId::Coordinator,
        NodeId::TravelAdvisor,
        NodeId::WeatherAnalyst,
        NodeId::BudgetOptimizer,
        NodeId::LocalExpert,
        NodeId::TransportMobility,
        NodeId::ItineraryPlanner,
        NodeId::ToolExecutor,
    ];

    /// Specialists the coordinator may name, in routing priority order.
    ///
    /// When a reply mentions several names, the earliest entry here wins regardless of
    /// where the names appear in the text.
    pub const ROUTING_PRIORITY: [NodeId; 6] = [
        NodeId::TravelAdvisor,
        NodeId::WeatherAnalyst,
        NodeId::BudgetOptimizer,
        NodeId::LocalExpert,
        NodeId::TransportMobility,
        NodeId::ItineraryPlanner,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeId::Coordinator => "coordinator",
            NodeId::TravelAdvisor => "travel_advisor",
            NodeId::WeatherAnalyst => "weather_analyst",
            NodeId::BudgetOptimizer => "budget_optimizer",
            NodeId::LocalExpert => "local_expert",
            NodeId::TransportMobility => "transport_mobility",
            NodeId::ItineraryPlanner => "itinerary_planner",
            NodeId::ToolExecutor => "tool_executor",
        }
    }

    /// Human-readable label for progress output.
    pub fn label(&self) -> &'static str {
        match self {
            NodeId::Coordinator => "Coordinator",
            NodeId::TravelAdvisor => "Travel Advisor",
            NodeId::WeatherAnalyst => "Weather Analyst",
            NodeId::BudgetOptimizer => "Budget Optimizer",
            NodeId::LocalExpert => "Local Expert",
            NodeId::TransportMobility => "Transport & Mobility",
            NodeId::ItineraryPlanner => "Itinerary Planner",
            NodeId::ToolExecutor => "Tool Executor",
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        NodeId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown node id: {}", s))
    }
}
