//! Builds a planning graph from [`Settings`] and command-line options, and drives one run.
//!
//! `main` owns argument parsing and output; everything here is testable without a
//! process environment.

use std::sync::Arc;

use futures::StreamExt;
use thiserror::Error;
use wayfarer::tools::SafeSearch;
use wayfarer::{
    AgentError, ChatOpenAI, CompilationError, CompiledPlanningGraph, GeminiClient, GraphConfig,
    GraphStep, LlmClient, OpenWeatherClient, PlanningGraph, PlanningState, RunOutcome,
    Termination, TripRequest,
};

use config::{LlmProvider, Settings, SettingsError};

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Errors that stop the CLI before or during a run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config: {0}")]
    Config(#[from] config::LoadError),
    #[error("{0}")]
    Settings(#[from] SettingsError),
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("graph: {0}")]
    Compile(#[from] CompilationError),
    #[error("planning failed: {0}")]
    Agent(#[from] AgentError),
    #[error("output: {0}")]
    Output(#[from] std::io::Error),
}

/// Trip parameters and run overrides as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub destination: String,
    pub origin: Option<String>,
    pub days: Option<u32>,
    pub budget: Option<String>,
    pub interests: Vec<String>,
    pub group_size: Option<u32>,
    pub dates: Option<String>,
    pub recursion_limit: Option<usize>,
}

impl RunOptions {
    /// The request for this run. Interests may be comma separated within one value.
    pub fn trip_request(&self) -> Result<TripRequest, RunError> {
        let destination = self.destination.trim();
        if destination.is_empty() {
            return Err(RunError::InvalidOption("destination is empty".into()));
        }
        let mut request = TripRequest::new(destination);
        if let Some(origin) = non_blank(self.origin.as_deref()) {
            request = request.with_origin(origin);
        }
        if let Some(days) = self.days {
            if days == 0 {
                return Err(RunError::InvalidOption("--days must be at least 1".into()));
            }
            request = request.with_duration_days(days);
        }
        if let Some(budget) = non_blank(self.budget.as_deref()) {
            request = request.with_budget(budget);
        }
        if let Some(size) = self.group_size {
            if size == 0 {
                return Err(RunError::InvalidOption("--group-size must be at least 1".into()));
            }
            request = request.with_group_size(size);
        }
        if let Some(dates) = non_blank(self.dates.as_deref()) {
            request = request.with_travel_dates(dates);
        }
        let interests: Vec<String> = self
            .interests
            .iter()
            .flat_map(|v| v.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Ok(request.with_interests(interests))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Model client for the configured provider.
pub fn build_llm(settings: &Settings) -> Result<Arc<dyn LlmClient>, RunError> {
    settings.validate()?;
    let llm: Arc<dyn LlmClient> = match settings.provider {
        LlmProvider::OpenAi => {
            let model = settings.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL);
            let mut client = ChatOpenAI::with_endpoint(
                settings.openai_api_key.as_deref(),
                settings.openai_base_url.as_deref(),
                model,
            );
            if let Some(t) = settings.temperature {
                client = client.with_temperature(t);
            }
            Arc::new(client)
        }
        LlmProvider::Gemini => {
            let key = settings
                .gemini_api_key
                .clone()
                .ok_or(SettingsError::MissingApiKey(
                    config::settings::ENV_GEMINI_API_KEY,
                    LlmProvider::Gemini,
                ))?;
            let mut client = GeminiClient::new(key);
            if let Some(model) = settings.model.as_deref() {
                client = client.with_model(model);
            }
            if let Some(t) = settings.temperature {
                client = client.with_temperature(t);
            }
            Arc::new(client)
        }
    };
    Ok(llm)
}

/// Run configuration: defaults, then settings, then the command-line limit.
pub fn graph_config(settings: &Settings, opts: &RunOptions) -> Result<GraphConfig, RunError> {
    let mut config = GraphConfig::default();
    if let Some(limit) = opts.recursion_limit.or(settings.recursion_limit) {
        config.recursion_limit = limit;
    }
    if let Some(max) = settings.search_max_results {
        config.search.max_results = max;
    }
    if let Some(region) = non_blank(settings.search_region.as_deref()) {
        config.search.region = region.to_string();
    }
    if let Some(level) = settings.search_safesearch.as_deref() {
        config.search.safe_search = level.parse::<SafeSearch>().map_err(RunError::InvalidOption)?;
    }
    Ok(config)
}

/// Compiles the graph with the configured model, weather source and prompts.
pub fn build_graph(settings: &Settings, opts: &RunOptions) -> Result<CompiledPlanningGraph, RunError> {
    let llm = build_llm(settings)?;
    let mut weather = OpenWeatherClient::new(settings.openweather_api_key.clone());
    if let Some(base) = settings.openweather_base_url.as_deref() {
        weather = weather.with_base_url(base);
    }
    let prompts = wayfarer::prompts::load_or_default(settings.prompts_dir.as_deref());
    let graph = PlanningGraph::new(llm)
        .with_weather_source(Arc::new(weather))
        .with_prompts(prompts)
        .with_config(graph_config(settings, opts)?)
        .compile()?;
    Ok(graph)
}

/// Streams one run, calling `on_step` after every node, and collects the outcome.
pub async fn plan(
    graph: &CompiledPlanningGraph,
    request: TripRequest,
    mut on_step: impl FnMut(&GraphStep),
) -> Result<RunOutcome, RunError> {
    let initial = PlanningState::new(request);
    let mut stream = graph.stream(initial.clone());
    let mut outcome = RunOutcome {
        state: initial,
        steps: 0,
        path: Vec::new(),
        termination: Termination::Completed,
    };
    while let Some(step) = stream.next().await {
        let step = step?;
        on_step(&step);
        outcome.steps = step.step;
        outcome.path.push(step.node);
        if step.capped {
            outcome.termination = Termination::RecursionLimit;
        }
        outcome.state = step.state;
    }
    Ok(outcome)
}
