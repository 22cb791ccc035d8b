//! Planning graph builder: model bindings, lookups, prompts and limits, then `compile`.
//!
//! The node set and routing table are fixed; what varies per deployment is which model
//! each node talks to, how much conversation it sees, and where lookups go. `compile`
//! validates the configuration and builds every node once; the result is cheap to clone
//! and safe to share across concurrent runs.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::agent::{
    AgentModel, AgentNode, Coordinator, ItineraryPlanner, Specialist, ToolExecutor,
    TransportMobility, WeatherAnalyst,
};
use crate::llm::LlmClient;
use crate::prompts::AgentPrompts;
use crate::tool_source::ToolSource;
use crate::tools::{DuckDuckGoSearch, TravelToolsSource, WeatherSource};

use super::compile_error::CompilationError;
use super::compiled::CompiledPlanningGraph;
use super::config::GraphConfig;
use super::NodeId;

/// Builder for [`CompiledPlanningGraph`].
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wayfarer::{MockLlm, MockToolSource, NodeId, PlanningGraph};
///
/// let graph = PlanningGraph::new(Arc::new(MockLlm::new("travel_advisor")))
///     .with_node_llm(NodeId::ItineraryPlanner, Arc::new(MockLlm::new("{\"days\": []}")))
///     .with_tool_source(Arc::new(MockToolSource::returning("sunny")))
///     .with_recursion_limit(20)
///     .compile()
///     .unwrap();
/// assert_eq!(graph.config().recursion_limit, 20);
/// ```
///
/// **Interaction**: Produces `CompiledPlanningGraph`; the CLI builds one per process.
pub struct PlanningGraph {
    llm: Arc<dyn LlmClient>,
    node_llms: BTreeMap<NodeId, Arc<dyn LlmClient>>,
    window_overrides: BTreeMap<NodeId, usize>,
    tool_source: Option<Arc<dyn ToolSource>>,
    weather: Option<Arc<dyn WeatherSource>>,
    prompts: AgentPrompts,
    config: GraphConfig,
}

impl PlanningGraph {
    /// Graph where every model-backed node uses `llm`.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            node_llms: BTreeMap::new(),
            window_overrides: BTreeMap::new(),
            tool_source: None,
            weather: None,
            prompts: AgentPrompts::default(),
            config: GraphConfig::default(),
        }
    }

    /// Model for one node, replacing the default client for that node only.
    pub fn with_node_llm(mut self, node: NodeId, llm: Arc<dyn LlmClient>) -> Self {
        self.node_llms.insert(node, llm);
        self
    }

    pub fn with_message_window(mut self, node: NodeId, window: usize) -> Self {
        self.window_overrides.insert(node, window);
        self
    }

    /// Lookups for the tool executor. Defaults to the travel tools over DuckDuckGo.
    pub fn with_tool_source(mut self, tools: Arc<dyn ToolSource>) -> Self {
        self.tool_source = Some(tools);
        self
    }

    /// Structured weather for the weather analyst (and the default weather lookup).
    pub fn with_weather_source(mut self, weather: Arc<dyn WeatherSource>) -> Self {
        self.weather = Some(weather);
        self
    }

    pub fn with_prompts(mut self, prompts: AgentPrompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Replaces the whole configuration; later window and limit overrides still apply.
    pub fn with_config(mut self, config: GraphConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.config.recursion_limit = limit;
        self
    }

    /// Validates the configuration and builds every node.
    ///
    /// # Errors
    ///
    /// - `ZeroRecursionLimit` when the limit is 0
    /// - `ZeroMessageWindow` when a model-backed node would see no conversation
    /// - `NodeWithoutModel` when a model or window override targets the tool executor
    pub fn compile(self) -> Result<CompiledPlanningGraph, CompilationError> {
        let PlanningGraph {
            llm,
            node_llms,
            window_overrides,
            tool_source,
            weather,
            prompts,
            mut config,
        } = self;

        if config.recursion_limit == 0 {
            return Err(CompilationError::ZeroRecursionLimit);
        }
        if let Some(&node) = node_llms
            .keys()
            .chain(window_overrides.keys())
            .find(|id| **id == NodeId::ToolExecutor)
        {
            return Err(CompilationError::NodeWithoutModel(node));
        }
        config.windows.extend(window_overrides);
        config.windows.remove(&NodeId::ToolExecutor);
        for id in NodeId::ALL {
            if id != NodeId::ToolExecutor && config.window(id) == 0 {
                return Err(CompilationError::ZeroMessageWindow(id));
            }
        }

        let tools: Arc<dyn ToolSource> = match tool_source {
            Some(t) => t,
            None => Arc::new(TravelToolsSource::new(
                Arc::new(DuckDuckGoSearch::new()),
                weather.clone(),
                config.search.clone(),
            )),
        };

        let model = |id: NodeId| {
            let client = node_llms.get(&id).cloned().unwrap_or_else(|| Arc::clone(&llm));
            let template = prompts.for_node(id).unwrap_or_default();
            AgentModel::new(client, template, config.window(id))
        };

        let mut nodes = BTreeMap::new();
        for id in NodeId::ALL {
            let node = match id {
                NodeId::Coordinator => AgentNode::Coordinator(Coordinator::new(
                    model(id),
                    prompts.coordinator_kickoff.clone(),
                )),
                NodeId::TravelAdvisor | NodeId::BudgetOptimizer | NodeId::LocalExpert => {
                    AgentNode::Specialist(Specialist::new(id, model(id)))
                }
                NodeId::WeatherAnalyst => {
                    AgentNode::WeatherAnalyst(WeatherAnalyst::new(model(id), weather.clone()))
                }
                NodeId::TransportMobility => {
                    AgentNode::TransportMobility(TransportMobility::new(model(id)))
                }
                NodeId::ItineraryPlanner => {
                    AgentNode::ItineraryPlanner(ItineraryPlanner::new(model(id)))
                }
                NodeId::ToolExecutor => AgentNode::ToolExecutor(ToolExecutor::new(Arc::clone(&tools))),
            };
            nodes.insert(id, node);
        }

        tracing::debug!(
            recursion_limit = config.recursion_limit,
            overridden_models = node_llms.len(),
            "planning graph compiled"
        );
        Ok(CompiledPlanningGraph::new(nodes, config))
    }
}
