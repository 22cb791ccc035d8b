//! Typed view of the Wayfarer environment variables.
//!
//! Read after [`load_and_apply`](crate::load_and_apply) so `.env` and XDG values are
//! visible. Absent or blank variables are `None`; malformed numbers are errors.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const ENV_PROVIDER: &str = "WAYFARER_LLM_PROVIDER";
pub const ENV_MODEL: &str = "WAYFARER_MODEL";
pub const ENV_TEMPERATURE: &str = "WAYFARER_TEMPERATURE";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_OPENWEATHER_BASE_URL: &str = "OPENWEATHER_BASE_URL";
pub const ENV_RECURSION_LIMIT: &str = "WAYFARER_RECURSION_LIMIT";
pub const ENV_SEARCH_MAX_RESULTS: &str = "WAYFARER_SEARCH_MAX_RESULTS";
pub const ENV_SEARCH_REGION: &str = "WAYFARER_SEARCH_REGION";
pub const ENV_SEARCH_SAFESEARCH: &str = "WAYFARER_SEARCH_SAFESEARCH";
pub const ENV_PROMPTS_DIR: &str = "PROMPTS_DIR";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid {key}={value}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{0} is not set; the {1} provider needs it")]
    MissingApiKey(&'static str, LlmProvider),
}

/// Language-generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Gemini,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" | "google" => Ok(Self::Gemini),
            other => Err(format!("unknown provider '{}' (use openai or gemini)", other)),
        }
    }
}

/// Which credentials are configured. Web search needs none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ApiStatus {
    pub openai: bool,
    pub gemini: bool,
    pub openweather: bool,
    pub web_search: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub provider: LlmProvider,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: Option<String>,
    pub recursion_limit: Option<usize>,
    pub search_max_results: Option<usize>,
    pub search_region: Option<String>,
    /// `strict`, `moderate` or `off`.
    pub search_safesearch: Option<String>,
    pub prompts_dir: Option<PathBuf>,
}

impl Settings {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads through `lookup` (the env, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get(ENV_PROVIDER) {
            Some(v) => v.parse().map_err(|reason| SettingsError::InvalidValue {
                key: ENV_PROVIDER,
                value: v.clone(),
                reason,
            })?,
            None => LlmProvider::default(),
        };
        let search_safesearch = get(ENV_SEARCH_SAFESEARCH);
        if let Some(v) = &search_safesearch {
            if !matches!(v.to_lowercase().as_str(), "strict" | "on" | "moderate" | "off") {
                return Err(SettingsError::InvalidValue {
                    key: ENV_SEARCH_SAFESEARCH,
                    value: v.clone(),
                    reason: "use strict, moderate, or off".into(),
                });
            }
        }

        Ok(Self {
            provider,
            model: get(ENV_MODEL),
            temperature: parse_opt(ENV_TEMPERATURE, get(ENV_TEMPERATURE))?,
            openai_api_key: get(ENV_OPENAI_API_KEY),
            openai_base_url: get(ENV_OPENAI_BASE_URL),
            gemini_api_key: get(ENV_GEMINI_API_KEY),
            openweather_api_key: get(ENV_OPENWEATHER_API_KEY),
            openweather_base_url: get(ENV_OPENWEATHER_BASE_URL),
            recursion_limit: parse_opt(ENV_RECURSION_LIMIT, get(ENV_RECURSION_LIMIT))?,
            search_max_results: parse_opt(ENV_SEARCH_MAX_RESULTS, get(ENV_SEARCH_MAX_RESULTS))?,
            search_region: get(ENV_SEARCH_REGION),
            search_safesearch,
            prompts_dir: get(ENV_PROMPTS_DIR).map(PathBuf::from),
        })
    }

    pub fn api_status(&self) -> ApiStatus {
        ApiStatus {
            openai: self.openai_api_key.is_some(),
            gemini: self.gemini_api_key.is_some(),
            openweather: self.openweather_api_key.is_some(),
            web_search: true,
        }
    }

    /// Errors when the selected provider has no key. OpenAI-compatible servers behind
    /// `OPENAI_BASE_URL` may run without one.
    pub fn validate(&self) -> Result<(), SettingsError> {
        match self.provider {
            LlmProvider::OpenAi if self.openai_api_key.is_none() && self.openai_base_url.is_none() => {
                Err(SettingsError::MissingApiKey(ENV_OPENAI_API_KEY, self.provider))
            }
            LlmProvider::Gemini if self.gemini_api_key.is_none() => {
                Err(SettingsError::MissingApiKey(ENV_GEMINI_API_KEY, self.provider))
            }
            _ => Ok(()),
        }
    }
}

fn parse_opt<T>(key: &'static str, value: Option<String>) -> Result<Option<T>, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| SettingsError::InvalidValue {
                key,
                value: v.clone(),
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn empty_env_gives_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.provider, LlmProvider::OpenAi);
    }

    #[test]
    fn reads_typed_values() {
        let s = settings(&[
            (ENV_PROVIDER, "Gemini"),
            (ENV_TEMPERATURE, "0.4"),
            (ENV_RECURSION_LIMIT, "30"),
            (ENV_SEARCH_MAX_RESULTS, "8"),
            (ENV_SEARCH_SAFESEARCH, "off"),
            (ENV_PROMPTS_DIR, "/etc/wayfarer/prompts"),
            (ENV_OPENWEATHER_API_KEY, "  "),
        ])
        .unwrap();
        assert_eq!(s.provider, LlmProvider::Gemini);
        assert_eq!(s.temperature, Some(0.4));
        assert_eq!(s.recursion_limit, Some(30));
        assert_eq!(s.search_max_results, Some(8));
        assert_eq!(s.prompts_dir, Some(PathBuf::from("/etc/wayfarer/prompts")));
        assert!(s.openweather_api_key.is_none());
    }

    #[test]
    fn malformed_number_is_an_error() {
        let err = settings(&[(ENV_RECURSION_LIMIT, "many")]).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidValue { key: ENV_RECURSION_LIMIT, .. }));
        assert!(settings(&[(ENV_PROVIDER, "claude")]).is_err());
        assert!(settings(&[(ENV_SEARCH_SAFESEARCH, "loose")]).is_err());
    }

    /// **Scenario**: api_status reflects which keys are present.
    #[test]
    fn api_status_reports_credentials() {
        let s = settings(&[(ENV_OPENAI_API_KEY, "sk"), (ENV_OPENWEATHER_API_KEY, "ow")]).unwrap();
        let st = s.api_status();
        assert!(st.openai && st.openweather && st.web_search);
        assert!(!st.gemini);
    }

    #[test]
    fn validate_requires_provider_key() {
        assert_eq!(
            settings(&[]).unwrap().validate(),
            Err(SettingsError::MissingApiKey(ENV_OPENAI_API_KEY, LlmProvider::OpenAi))
        );
        assert!(settings(&[(ENV_OPENAI_BASE_URL, "http://localhost:11434/v1")])
            .unwrap()
            .validate()
            .is_ok());
        assert!(settings(&[(ENV_PROVIDER, "gemini"), (ENV_OPENAI_API_KEY, "sk")])
            .unwrap()
            .validate()
            .is_err());
        assert!(settings(&[(ENV_PROVIDER, "gemini"), (ENV_GEMINI_API_KEY, "g")])
            .unwrap()
            .validate()
            .is_ok());
    }
}
