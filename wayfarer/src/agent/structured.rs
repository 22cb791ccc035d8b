//! Lenient JSON extraction from model replies.
//!
//! Three levels: the whole reply (after stripping a Markdown fence) parses as an object;
//! otherwise the first balanced `{...}` span that parses as an object; otherwise nothing,
//! and the caller builds a default object. Brace counting skips braces inside string
//! literals.

use serde_json::{Map, Value};

/// How a structured reply was recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRecovery {
    /// The reply was a JSON object.
    Strict,
    /// An object was cut out of surrounding text.
    Extracted,
}

/// Parses the reply as a JSON object, falling back to balanced-brace extraction.
pub fn parse_object(text: &str) -> Option<(Map<String, Value>, JsonRecovery)> {
    let body = strip_fence(text.trim());
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        return Some((obj, JsonRecovery::Strict));
    }
    balanced_spans(text)
        .into_iter()
        .find_map(|span| match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(obj)) => Some((obj, JsonRecovery::Extracted)),
            _ => None,
        })
}

/// Contents of a ```` ```json ```` fence, or the input unchanged.
fn strip_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_end()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}

/// Top-level `{...}` spans in order of appearance.
fn balanced_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    spans
}

/// First `max` characters of `text`.
pub(crate) fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
