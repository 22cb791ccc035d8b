//! Tools the tool executor can call: the `Tool` trait, registries, and the travel lookups.
//!
//! Lookups reach the outside world through two capabilities, [`WebSearch`] and
//! [`WeatherSource`], so tests can swap in fakes.

mod aggregate_source;
mod registry;
mod r#trait;

pub mod search;
pub mod travel;
pub mod weather;

pub use aggregate_source::AggregateToolSource;
pub use r#trait::Tool;
pub use registry::{ToolRegistry, ToolRegistryLocked};
pub use search::{DuckDuckGoSearch, SafeSearch, SearchResult, SearchSettings, WebSearch};
pub use travel::{
    register_travel_tools, LookupKind, TravelLookupTool, TravelToolsSource, TOOL_ATTRACTIONS,
    TOOL_BUDGET_INFO, TOOL_DESTINATION_INFO, TOOL_HOTELS, TOOL_LOCAL_TIPS, TOOL_RESTAURANTS,
    TOOL_WEATHER_INFO,
};
pub use weather::{CurrentWeather, OpenWeatherClient, WeatherSource};
