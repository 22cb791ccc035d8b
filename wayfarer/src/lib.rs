//! # Wayfarer
//!
//! Multi-agent travel planning on a small, fixed state graph. A coordinator, five
//! specialists, an itinerary planner and a tool executor take turns on one shared
//! [`PlanningState`]; after every step a router reads the latest message and picks the
//! next node, until the coordinator ends the run or the recursion limit stops it.
//!
//! ## Design principles
//!
//! - **State in, state out**: every node gets `&PlanningState` and returns a new state plus
//!   a typed [`Next`]. Snapshots already handed out never change.
//! - **Closed node set**: nodes are identified by [`NodeId`]; [`AgentNode`] is a closed enum
//!   with one `run`.
//! - **Lenient structured output**: weather, transport and itinerary replies are parsed
//!   strictly, then by balanced-brace extraction, then replaced by a default object.
//!   Bad JSON never fails a run.
//! - **Recoverable lookups**: lookup errors become conversation messages; only a failed
//!   model call is fatal ([`AgentError::Llm`]).
//!
//! ## Main modules
//!
//! - [`graph`]: [`PlanningGraph`] (builder), [`CompiledPlanningGraph`] (`stream`, `invoke`,
//!   `run`), [`NodeId`], [`Next`], routing in [`graph::router`].
//! - [`agent`]: the node implementations behind [`AgentNode`].
//! - [`state`]: [`PlanningState`], [`TripRequest`], [`AgentOutput`], typed [`Itinerary`] view.
//! - [`llm`]: [`LlmClient`] with [`ChatOpenAI`], [`GeminiClient`] and [`MockLlm`].
//! - [`tools`] / [`tool_source`]: the seven travel lookups over [`WebSearch`] and
//!   [`WeatherSource`], exposed through [`ToolSource`].
//! - [`prompts`]: embedded YAML instruction templates with directory overrides.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wayfarer::{ChatOpenAI, PlanningGraph, PlanningState, TripRequest};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let graph = PlanningGraph::new(Arc::new(ChatOpenAI::new("gpt-4o-mini"))).compile()?;
//! let request = TripRequest::new("Kyoto")
//!     .with_duration_days(3)
//!     .with_interests(["food"]);
//! let outcome = graph.run(PlanningState::new(request)).await?;
//! println!("{:?}", outcome.state.final_plan());
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod prompts;
pub mod state;
pub mod tool_source;
pub mod tools;

pub use agent::{AgentModel, AgentNode, JsonRecovery};
pub use error::AgentError;
pub use graph::{
    CompilationError, CompiledPlanningGraph, GraphConfig, GraphStep, Next, Node, NodeId,
    PlanningGraph, RunOutcome, Termination,
};
pub use llm::{ChatOpenAI, ContentPart, GeminiClient, LlmClient, LlmResponse, LlmUsage, MockLlm};
pub use message::Message;
pub use prompts::{AgentPrompts, PromptsLoadError};
pub use state::{
    maps_search_url, Activity, AgentOutput, Itinerary, ItineraryDay, OutputStatus,
    PlanningState, TripRequest,
};
pub use tool_source::{MockToolSource, ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec};
pub use tools::{
    CurrentWeather, DuckDuckGoSearch, LookupKind, OpenWeatherClient, SafeSearch, SearchResult,
    SearchSettings, TravelToolsSource, WeatherSource, WebSearch,
};
