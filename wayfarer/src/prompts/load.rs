//! Load agent prompts from a directory holding `agents.yaml`.

use std::path::{Path, PathBuf};

use super::{AgentPrompts, AgentPromptsFile};

/// Embedded default YAML (canonical source: `wayfarer/prompts/agents.yaml`).
const EMBED_AGENTS: &str = include_str!("../../prompts/agents.yaml");

const AGENTS_FILE: &str = "agents.yaml";

/// Default directory name when `PROMPTS_DIR` is not set.
const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Error when loading prompts from a directory (missing dir, invalid YAML).
#[derive(Debug, thiserror::Error)]
pub enum PromptsLoadError {
    #[error("prompts directory not found or not readable: {0}")]
    DirNotFound(String),
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
}

/// `dir` if `Some`, else `PROMPTS_DIR` env, else `./prompts`.
fn prompts_dir(dir: Option<&Path>) -> PathBuf {
    dir.map(PathBuf::from).unwrap_or_else(|| {
        std::env::var("PROMPTS_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PROMPTS_DIR))
    })
}

fn read_yaml_file(dir: &Path, name: &str) -> Result<Option<AgentPromptsFile>, PromptsLoadError> {
    let path = dir.join(name);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(PromptsLoadError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    let file = serde_yaml::from_str(&content).map_err(|e| PromptsLoadError::ParseYaml {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(Some(file))
}

/// Loads prompts from a directory, overlaying its `agents.yaml` on the embedded defaults.
///
/// A missing `agents.yaml` keeps every default. Errors when the directory is missing or
/// the file does not parse.
pub fn load(dir: Option<&Path>) -> Result<AgentPrompts, PromptsLoadError> {
    let base = prompts_dir(dir);
    if !base.is_dir() {
        return Err(PromptsLoadError::DirNotFound(base.display().to_string()));
    }
    let defaults = default_from_embedded();
    Ok(match read_yaml_file(&base, AGENTS_FILE)? {
        Some(file) => defaults.merged(file),
        None => defaults,
    })
}

/// Default prompts parsed from the embedded YAML.
pub fn default_from_embedded() -> AgentPrompts {
    let file: AgentPromptsFile = serde_yaml::from_str(EMBED_AGENTS).unwrap_or_default();
    AgentPrompts {
        coordinator: file.coordinator.unwrap_or_default(),
        coordinator_kickoff: file.coordinator_kickoff.unwrap_or_default(),
        travel_advisor: file.travel_advisor.unwrap_or_default(),
        weather_analyst: file.weather_analyst.unwrap_or_default(),
        budget_optimizer: file.budget_optimizer.unwrap_or_default(),
        local_expert: file.local_expert.unwrap_or_default(),
        transport_mobility: file.transport_mobility.unwrap_or_default(),
        itinerary_planner: file.itinerary_planner.unwrap_or_default(),
    }
}

/// Loads from `dir` when possible; otherwise the embedded defaults.
pub fn load_or_default(dir: Option<&Path>) -> AgentPrompts {
    match load(dir) {
        Ok(p) => p,
        Err(e) => {
            tracing::debug!(error = %e, "using embedded prompts");
            default_from_embedded()
        }
    }
}
