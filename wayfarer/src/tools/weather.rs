//! Structured weather: the `WeatherSource` capability and its OpenWeather implementation.
//!
//! Three outcomes: `Ok(Some(_))` with current conditions, `Ok(None)` when the source has
//! nothing for the place (no API key, unknown city), `Err` on transport failure. Callers
//! treat both `None` and `Err` as "fall back to something else".

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tool_source::ToolSourceError;

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Current conditions at one place, metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Place name as resolved by the provider.
    pub location: String,
    pub temperature_low_c: f64,
    pub temperature_high_c: f64,
    pub current_temp_c: f64,
    pub feels_like_c: f64,
    pub condition: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl CurrentWeather {
    /// Multi-line summary used as a lookup result.
    pub fn summary(&self) -> String {
        format!(
            "Current Weather in {}:\nTemperature: {:.1}°C (Feels like {:.1}°C)\nConditions: {}\nHumidity: {}%\nWind Speed: {:.1} m/s",
            self.location,
            self.current_temp_c,
            self.feels_like_c,
            self.condition,
            self.humidity_pct,
            self.wind_speed_mps
        )
    }
}

/// Structured weather capability.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_current_weather(
        &self,
        place: &str,
    ) -> Result<Option<CurrentWeather>, ToolSourceError>;
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    #[serde(default)]
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    #[serde(default)]
    wind: OwmWind,
    #[serde(default)]
    sys: OwmSys,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwmCondition {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwmWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwmSys {
    country: Option<String>,
}

/// OpenWeather current-weather client (`/weather?q=..&units=metric`).
pub struct OpenWeatherClient {
    http: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenWeatherClient {
    /// Client with an optional key; without a key every lookup is `Ok(None)`.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: OPENWEATHER_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current_weather(
        &self,
        place: &str,
    ) -> Result<Option<CurrentWeather>, ToolSourceError> {
        let Some(key) = self.api_key.as_deref() else {
            debug!("OpenWeather key not configured; skipping structured lookup");
            return Ok(None);
        };
        let place = place.trim();
        if place.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/weather", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", place), ("appid", key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("weather request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(place, "OpenWeather has no such place");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ToolSourceError::Transport(format!(
                "weather API returned HTTP {}",
                status
            )));
        }

        let body: OwmResponse = response
            .json()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("weather decode failed: {}", e)))?;

        let location = if body.name.is_empty() {
            place.to_string()
        } else {
            body.name
        };
        let condition = body
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .unwrap_or_default();
        Ok(Some(CurrentWeather {
            location,
            temperature_low_c: body.main.temp_min,
            temperature_high_c: body.main.temp_max,
            current_temp_c: body.main.temp,
            feels_like_c: body.main.feels_like,
            condition,
            humidity_pct: body.main.humidity,
            wind_speed_mps: body.wind.speed,
            country_code: body.sys.country,
        }))
    }
}
