//! Read a project `.env` file into a key-value map (applied to the env in lib).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// `.env` in `override_dir` if given, else in the current directory; `None` when absent.
fn dotenv_path(override_dir: Option<&Path>) -> Option<PathBuf> {
    let dir = override_dir
        .map(Path::to_path_buf)
        .or_else(|| std::env::current_dir().ok())?;
    let path = dir.join(".env");
    path.is_file().then_some(path)
}

/// Parses `.env` with the `dotenv` crate without touching the process environment.
/// Missing file returns an empty map.
pub fn load_env_map(override_dir: Option<&Path>) -> Result<HashMap<String, String>, dotenv::Error> {
    let Some(path) = dotenv_path(override_dir) else {
        return Ok(HashMap::new());
    };
    dotenv::from_path_iter(&path)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> HashMap<String, String> {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), content).unwrap();
        load_env_map(Some(dir.path())).unwrap()
    }

    #[test]
    fn parses_keys_comments_and_quotes() {
        let m = parse("# keys\nOPENAI_API_KEY=sk-test\nWAYFARER_MODEL=\"gpt-4o-mini\"\n\nWAYFARER_SEARCH_REGION='uk-en'\n");
        assert_eq!(m.get("OPENAI_API_KEY").map(String::as_str), Some("sk-test"));
        assert_eq!(m.get("WAYFARER_MODEL").map(String::as_str), Some("gpt-4o-mini"));
        assert_eq!(m.get("WAYFARER_SEARCH_REGION").map(String::as_str), Some("uk-en"));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn missing_file_returns_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_map(Some(dir.path())).unwrap().is_empty());
    }

    /// **Scenario**: Reading the file does not set anything in the process env.
    #[test]
    fn does_not_touch_process_env() {
        std::env::remove_var("WAYFARER_DOTENV_PROBE");
        let m = parse("WAYFARER_DOTENV_PROBE=1\n");
        assert_eq!(m.get("WAYFARER_DOTENV_PROBE").map(String::as_str), Some("1"));
        assert!(std::env::var("WAYFARER_DOTENV_PROBE").is_err());
    }
}
