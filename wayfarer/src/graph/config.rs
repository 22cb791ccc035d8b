//! Run configuration shared read-only by every run of a compiled graph.

use std::collections::BTreeMap;

use crate::tools::SearchSettings;

use super::NodeId;

/// Default cap on node executions per run.
pub const DEFAULT_RECURSION_LIMIT: usize = 50;

/// Recursion limit, per-node message windows, and web lookup settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphConfig {
    /// Maximum node executions per run (not coordinator iterations).
    pub recursion_limit: usize,
    /// Trailing messages each model-backed node sends with its instruction.
    pub windows: BTreeMap<NodeId, usize>,
    pub search: SearchSettings,
}

impl Default for GraphConfig {
    fn default() -> Self {
        let windows = [
            (NodeId::Coordinator, 3),
            (NodeId::TravelAdvisor, 2),
            (NodeId::WeatherAnalyst, 2),
            (NodeId::BudgetOptimizer, 2),
            (NodeId::LocalExpert, 2),
            (NodeId::TransportMobility, 2),
            (NodeId::ItineraryPlanner, 5),
        ]
        .into_iter()
        .collect();
        Self {
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            windows,
            search: SearchSettings::default(),
        }
    }
}

impl GraphConfig {
    /// Window for `node`; 0 for the tool executor.
    pub fn window(&self, node: NodeId) -> usize {
        self.windows.get(&node).copied().unwrap_or(0)
    }
}
