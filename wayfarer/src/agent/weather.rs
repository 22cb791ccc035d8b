//! Weather analyst: structured weather source first for undated trips, model reply second.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::error::AgentError;
use crate::graph::{specialist_route, Next, NodeId};
use crate::message::Message;
use crate::state::{AgentOutput, PlanningState};
use crate::tools::{CurrentWeather, WeatherSource};

use super::common::NOT_SPECIFIED;
use super::structured::{excerpt, parse_object};
use super::AgentModel;

const EXCERPT_CHARS: usize = 500;

pub struct WeatherAnalyst {
    model: AgentModel,
    weather: Option<Arc<dyn WeatherSource>>,
}

impl WeatherAnalyst {
    pub fn new(model: AgentModel, weather: Option<Arc<dyn WeatherSource>>) -> Self {
        Self { model, weather }
    }

    /// Current conditions for the destination. Source errors count as "unavailable".
    async fn structured(&self, destination: &str) -> Option<CurrentWeather> {
        let source = self.weather.as_ref()?;
        match source.fetch_current_weather(destination).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(destination, error = %e, "weather source failed; asking the model");
                None
            }
        }
    }

    pub async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        let request = state.request();
        let dates = request
            .travel_dates
            .clone()
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());

        let dated = request
            .travel_dates
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty());
        let current = if dated {
            tracing::debug!(dates = %dates, "dated trip; skipping current conditions");
            None
        } else {
            self.structured(&request.destination).await
        };

        let (response, output) = match current {
            Some(current) => {
                tracing::debug!(destination = %request.destination, "weather from structured source");
                let report = report_from_current(&request.destination, &dates, &current);
                let text = report.to_string();
                (text.clone(), AgentOutput::completed(text, report))
            }
            None => {
                let messages = self.model.build_messages(state);
                let reply = self.model.reply(NodeId::WeatherAnalyst, &messages).await?;
                let output = match parse_object(&reply) {
                    Some((obj, level)) => {
                        tracing::debug!(?level, "weather reply parsed");
                        AgentOutput::completed(reply.clone(), Value::Object(obj))
                    }
                    None => {
                        tracing::debug!("weather reply not JSON; using default report");
                        let fallback = fallback_report(&request.destination, &dates, &reply);
                        AgentOutput::recovered(reply.clone(), fallback)
                    }
                };
                (reply, output)
            }
        };

        let mut next_state = state.clone();
        next_state.record_output(NodeId::WeatherAnalyst, output);
        next_state.push_message(Message::assistant(response));
        next_state.set_current_node(NodeId::WeatherAnalyst);
        let next = specialist_route(&next_state);
        Ok((next_state, next))
    }
}

/// Weather report in the analyst's schema, built from current conditions.
pub fn report_from_current(destination: &str, dates: &str, w: &CurrentWeather) -> Value {
    let condition = w.condition.to_lowercase();
    let mut packing = vec!["Comfortable walking shoes"];
    if w.temperature_low_c < 12.0 {
        packing.push("Warm layers for cool mornings and evenings");
    }
    if w.temperature_high_c > 25.0 {
        packing.push("Light breathable clothing and sun protection");
    }
    if condition.contains("rain") || condition.contains("drizzle") || condition.contains("storm") {
        packing.push("Umbrella or rain jacket");
    }
    let best_times = if w.temperature_high_c > 28.0 {
        vec!["Early morning", "Late afternoon"]
    } else {
        vec!["Late morning", "Afternoon"]
    };
    let activity_suggestions = if condition.contains("rain") || condition.contains("storm") {
        vec!["Museums and indoor markets", "Covered arcades and cafes"]
    } else {
        vec!["Walking tours", "Parks and outdoor sights"]
    };

    json!({
        "destination": destination,
        "travel_dates": dates,
        "temperature_c": {
            "expected_low": w.temperature_low_c,
            "expected_high": w.temperature_high_c,
            "typical_range": format!("{:.0}-{:.0}°C", w.temperature_low_c, w.temperature_high_c),
            "notes": format!(
                "Currently {:.1}°C, feels like {:.1}°C.",
                w.current_temp_c, w.feels_like_c
            ),
        },
        "conditions_summary": format!(
            "{}, humidity {}%, wind {:.1} m/s",
            w.condition, w.humidity_pct, w.wind_speed_mps
        ),
        "best_times": best_times,
        "activity_suggestions": activity_suggestions,
        "packing": packing,
    })
}

/// Default report when the reply held no object; `conditions_summary` keeps the raw text.
fn fallback_report(destination: &str, dates: &str, raw: &str) -> Value {
    let mut temperature = Map::new();
    temperature.insert("expected_low".into(), Value::Null);
    temperature.insert("expected_high".into(), Value::Null);
    temperature.insert("typical_range".into(), Value::String(String::new()));
    temperature.insert("notes".into(), Value::String(String::new()));
    json!({
        "destination": destination,
        "travel_dates": dates,
        "temperature_c": temperature,
        "conditions_summary": excerpt(raw, EXCERPT_CHARS),
        "best_times": [],
        "activity_suggestions": [],
        "packing": [],
    })
}
