//! The seven travel lookups, exposed as [`Tool`]s.
//!
//! Each lookup turns its arguments into a web query with a fixed template, runs it through
//! [`WebSearch`], and formats the top results as text. The weather lookup asks the
//! structured [`WeatherSource`] first.
//!
//! Arguments (all strings): `query` (free text from `NEED_SEARCH:`), `destination`,
//! `dates`, `budget`, `duration`, `cuisine`. The query subject is `query` when present,
//! else `destination`, else the trip destination from the call context.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::tool_source::{
    ToolCallContent, ToolCallContext, ToolSource, ToolSourceError, ToolSpec,
};
use crate::tools::search::{SearchResult, SearchSettings, WebSearch};
use crate::tools::weather::WeatherSource;
use crate::tools::{AggregateToolSource, Tool, ToolRegistry};

pub const TOOL_DESTINATION_INFO: &str = "search_destination_info";
pub const TOOL_WEATHER_INFO: &str = "search_weather_info";
pub const TOOL_HOTELS: &str = "search_hotels";
pub const TOOL_RESTAURANTS: &str = "search_restaurants";
pub const TOOL_ATTRACTIONS: &str = "search_attractions";
pub const TOOL_LOCAL_TIPS: &str = "search_local_tips";
pub const TOOL_BUDGET_INFO: &str = "search_budget_info";

const DEFAULT_HOTEL_BUDGET: &str = "mid-range";
const DEFAULT_DURATION: &str = "7 days";

/// Which travel lookup to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    DestinationInfo,
    WeatherInfo,
    Hotels,
    Restaurants,
    Attractions,
    LocalTips,
    BudgetInfo,
}

impl LookupKind {
    pub const ALL: [LookupKind; 7] = [
        LookupKind::DestinationInfo,
        LookupKind::WeatherInfo,
        LookupKind::Hotels,
        LookupKind::Restaurants,
        LookupKind::Attractions,
        LookupKind::LocalTips,
        LookupKind::BudgetInfo,
    ];

    pub fn tool_name(&self) -> &'static str {
        match self {
            LookupKind::DestinationInfo => TOOL_DESTINATION_INFO,
            LookupKind::WeatherInfo => TOOL_WEATHER_INFO,
            LookupKind::Hotels => TOOL_HOTELS,
            LookupKind::Restaurants => TOOL_RESTAURANTS,
            LookupKind::Attractions => TOOL_ATTRACTIONS,
            LookupKind::LocalTips => TOOL_LOCAL_TIPS,
            LookupKind::BudgetInfo => TOOL_BUDGET_INFO,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            LookupKind::DestinationInfo => {
                "Search for general information about a travel destination including attractions and guides."
            }
            LookupKind::WeatherInfo => {
                "Current weather for a destination, falling back to forecast and climate search results."
            }
            LookupKind::Hotels => "Search for hotel information and pricing in a destination.",
            LookupKind::Restaurants => "Search for restaurants and dining options in a destination.",
            LookupKind::Attractions => "Search for top attractions and things to do in a destination.",
            LookupKind::LocalTips => {
                "Search for local tips, culture, and insider information about a destination."
            }
            LookupKind::BudgetInfo => {
                "Search for travel budget information and estimated expenses for a destination."
            }
        }
    }

    /// Results requested from the provider; `None` uses the configured default.
    fn fetch_limit(&self) -> Option<usize> {
        match self {
            LookupKind::DestinationInfo | LookupKind::WeatherInfo => None,
            LookupKind::Hotels | LookupKind::Restaurants | LookupKind::Attractions => Some(6),
            LookupKind::LocalTips | LookupKind::BudgetInfo => Some(5),
        }
    }

    /// Results shown in the formatted text.
    fn shown(&self) -> usize {
        match self {
            LookupKind::DestinationInfo | LookupKind::Attractions => 5,
            LookupKind::Hotels | LookupKind::Restaurants => 4,
            LookupKind::WeatherInfo | LookupKind::LocalTips | LookupKind::BudgetInfo => 3,
        }
    }
}

/// Arguments after defaults from the call context are applied.
struct LookupArgs {
    subject: String,
    dates: String,
    budget: String,
    duration: String,
    cuisine: String,
    place: String,
}

fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

impl LookupArgs {
    fn from_value(args: &Value, ctx: Option<&ToolCallContext>) -> Result<Self, ToolSourceError> {
        let request = ctx.map(|c| c.request.as_ref());
        let place = str_arg(args, "destination")
            .map(str::to_string)
            .or_else(|| request.map(|r| r.destination.clone()))
            .unwrap_or_default();
        let subject = str_arg(args, "query")
            .map(str::to_string)
            .unwrap_or_else(|| place.clone());
        if subject.is_empty() {
            return Err(ToolSourceError::InvalidInput(
                "missing 'query' or 'destination'".to_string(),
            ));
        }
        Ok(Self {
            subject,
            dates: str_arg(args, "dates")
                .map(str::to_string)
                .or_else(|| request.and_then(|r| r.travel_dates.clone()))
                .unwrap_or_default(),
            budget: str_arg(args, "budget")
                .map(str::to_string)
                .or_else(|| request.map(|r| r.budget.clone()))
                .unwrap_or_else(|| DEFAULT_HOTEL_BUDGET.to_string()),
            duration: str_arg(args, "duration")
                .map(str::to_string)
                .or_else(|| request.map(|r| r.duration_label()))
                .unwrap_or_else(|| DEFAULT_DURATION.to_string()),
            cuisine: str_arg(args, "cuisine").unwrap_or_default().to_string(),
            place,
        })
    }
}

/// Collapses runs of whitespace left by empty template slots.
fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Web query for `kind`.
fn build_query(kind: LookupKind, a: &LookupArgs) -> String {
    let s = &a.subject;
    match kind {
        LookupKind::DestinationInfo => {
            let lower = s.to_lowercase();
            if lower.contains("travel") || lower.contains("attraction") {
                s.clone()
            } else {
                format!("{} travel destination guide attractions", s)
            }
        }
        LookupKind::WeatherInfo => squash(&format!("{} weather forecast {} travel climate", s, a.dates)),
        LookupKind::Hotels => format!("{} hotels {} best places to stay accommodation", s, a.budget),
        LookupKind::Restaurants => squash(&format!(
            "{} best restaurants {} local food dining where to eat",
            s, a.cuisine
        )),
        LookupKind::Attractions => format!("{} top attractions must see places things to do", s),
        LookupKind::LocalTips => {
            format!("{} local tips insider guide cultural etiquette what to know", s)
        }
        LookupKind::BudgetInfo => format!("{} travel budget for {} estimated expenses", s, a.duration),
    }
}

/// Formats results for `kind`; an empty list becomes the fixed "no results" sentence.
fn format_results(kind: LookupKind, a: &LookupArgs, results: &[SearchResult]) -> String {
    let s = &a.subject;
    if results.is_empty() {
        return match kind {
            LookupKind::DestinationInfo => {
                format!("No search results found for the destination: {}", s)
            }
            LookupKind::WeatherInfo => format!("No weather results found for: {}", s),
            LookupKind::Hotels => format!("No hotel information found for {}", s),
            LookupKind::Restaurants => format!("No restaurant information found for {}", s),
            LookupKind::Attractions => format!("No attraction information found for {}", s),
            LookupKind::LocalTips => format!("No local tips found for {}", s),
            LookupKind::BudgetInfo => format!("No budget info found for {}", s),
        };
    }

    let shown = results.iter().take(kind.shown());
    let mut lines: Vec<String> = Vec::new();
    match kind {
        LookupKind::DestinationInfo => {
            for (i, r) in shown.enumerate() {
                lines.push(format!(
                    "{}. {}\n   {}\n   Source: {}\n",
                    i + 1,
                    r.title,
                    r.body,
                    r.url
                ));
            }
        }
        LookupKind::WeatherInfo => {
            lines.push(format!("Weather information for {}:", s));
            for (i, r) in shown.enumerate() {
                lines.push(format!("{}. {}\n   {}\n", i + 1, r.title, r.body));
            }
        }
        LookupKind::Hotels | LookupKind::Restaurants | LookupKind::Attractions => {
            let (header, cut) = match kind {
                LookupKind::Hotels => (format!("Hotel options in {} ({} budget):", s, a.budget), 180),
                LookupKind::Restaurants => (format!("Restaurant recommendations in {}:", s), 180),
                _ => (format!("Top attractions in {}:", s), 200),
            };
            lines.push(header);
            for (i, r) in shown.enumerate() {
                lines.push(format!(
                    "{}. {}\n   {}...\n",
                    i + 1,
                    r.title,
                    truncate_chars(&r.body, cut)
                ));
            }
        }
        LookupKind::LocalTips => {
            lines.push(format!("Local tips for {}:", s));
            for r in shown {
                lines.push(format!("• {}\n  {}...\n", r.title, truncate_chars(&r.body, 200)));
            }
        }
        LookupKind::BudgetInfo => {
            lines.push(format!("Budget information for {}:", s));
            for r in shown {
                lines.push(format!("• {}\n  {}\n", r.title, r.body));
            }
        }
    }
    lines.join("\n")
}

/// One travel lookup.
pub struct TravelLookupTool {
    kind: LookupKind,
    search: Arc<dyn WebSearch>,
    weather: Option<Arc<dyn WeatherSource>>,
    settings: SearchSettings,
}

impl TravelLookupTool {
    pub fn new(
        kind: LookupKind,
        search: Arc<dyn WebSearch>,
        weather: Option<Arc<dyn WeatherSource>>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            kind,
            search,
            weather,
            settings,
        }
    }

    pub fn kind(&self) -> LookupKind {
        self.kind
    }

    /// Structured weather summary for the trip place; `None` on unavailability or error.
    async fn structured_weather(&self, place: &str) -> Option<String> {
        let source = self.weather.as_ref()?;
        match source.fetch_current_weather(place).await {
            Ok(Some(w)) => Some(w.summary()),
            Ok(None) => None,
            Err(e) => {
                debug!(place, error = %e, "structured weather failed; using web search");
                None
            }
        }
    }
}

#[async_trait]
impl Tool for TravelLookupTool {
    fn name(&self) -> &str {
        self.kind.tool_name()
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.kind.tool_name().to_string(),
            description: Some(self.kind.description().to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Free-text search subject"},
                    "destination": {"type": "string", "description": "Trip destination"},
                    "dates": {"type": "string"},
                    "budget": {"type": "string"},
                    "duration": {"type": "string"},
                    "cuisine": {"type": "string"}
                }
            }),
        }
    }

    async fn call(
        &self,
        args: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        let a = LookupArgs::from_value(&args, ctx)?;

        // Current conditions say nothing about a dated trip; those go to the forecast search.
        if self.kind == LookupKind::WeatherInfo && a.dates.is_empty() {
            if let Some(text) = self.structured_weather(&a.place).await {
                return Ok(ToolCallContent { text });
            }
        }

        let query = build_query(self.kind, &a);
        let settings = match self.kind.fetch_limit() {
            Some(n) => self.settings.with_max_results(n),
            None => self.settings.clone(),
        };
        debug!(
            tool = self.kind.tool_name(),
            query = %query,
            requester = ?ctx.and_then(|c| c.current_node),
            "travel lookup"
        );
        let results = self.search.search(&query, &settings).await?;
        Ok(ToolCallContent {
            text: format_results(self.kind, &a, &results),
        })
    }
}

/// Registers all seven lookups into `registry`.
pub fn register_travel_tools(
    registry: &mut ToolRegistry,
    search: Arc<dyn WebSearch>,
    weather: Option<Arc<dyn WeatherSource>>,
    settings: &SearchSettings,
) {
    for kind in LookupKind::ALL {
        registry.register(Box::new(TravelLookupTool::new(
            kind,
            Arc::clone(&search),
            weather.clone(),
            settings.clone(),
        )));
    }
}

/// Tool source holding the seven travel lookups.
pub struct TravelToolsSource {
    inner: AggregateToolSource,
}

impl TravelToolsSource {
    pub fn new(
        search: Arc<dyn WebSearch>,
        weather: Option<Arc<dyn WeatherSource>>,
        settings: SearchSettings,
    ) -> Self {
        let mut registry = ToolRegistry::new();
        register_travel_tools(&mut registry, search, weather, &settings);
        Self {
            inner: AggregateToolSource::from_registry(registry),
        }
    }
}

#[async_trait]
impl ToolSource for TravelToolsSource {
    async fn list_tools(&self) -> Result<Vec<ToolSpec>, ToolSourceError> {
        self.inner.list_tools().await
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.inner.call_tool(name, arguments).await
    }

    async fn call_tool_with_context(
        &self,
        name: &str,
        arguments: Value,
        ctx: Option<&ToolCallContext>,
    ) -> Result<ToolCallContent, ToolSourceError> {
        self.inner.call_tool_with_context(name, arguments, ctx).await
    }
}
