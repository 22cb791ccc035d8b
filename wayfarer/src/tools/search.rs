//! Web lookup: the `WebSearch` capability and its DuckDuckGo HTML implementation.
//!
//! No API key is needed; results are scraped from the HTML endpoint. An empty result
//! list is a valid answer, only transport failures are errors.

use std::str::FromStr;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::tool_source::ToolSourceError;

pub const DUCKDUCKGO_BASE_URL: &str = "https://html.duckduckgo.com";
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Safe-search level passed to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafeSearch {
    Strict,
    #[default]
    Moderate,
    Off,
}

impl SafeSearch {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafeSearch::Strict => "strict",
            SafeSearch::Moderate => "moderate",
            SafeSearch::Off => "off",
        }
    }

    /// DuckDuckGo `kp` parameter.
    fn ddg_param(&self) -> &'static str {
        match self {
            SafeSearch::Strict => "1",
            SafeSearch::Moderate => "-1",
            SafeSearch::Off => "-2",
        }
    }
}

impl FromStr for SafeSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" | "on" => Ok(Self::Strict),
            "moderate" => Ok(Self::Moderate),
            "off" => Ok(Self::Off),
            _ => Err(format!(
                "unknown safesearch: {} (use strict, moderate, or off)",
                s
            )),
        }
    }
}

/// Result count, region and safe-search level for web lookups.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SearchSettings {
    pub max_results: usize,
    /// Region code, e.g. "us-en".
    pub region: String,
    pub safe_search: SafeSearch,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            region: "us-en".to_string(),
            safe_search: SafeSearch::Moderate,
        }
    }
}

impl SearchSettings {
    /// Same settings with a different result count.
    pub fn with_max_results(&self, max_results: usize) -> Self {
        Self {
            max_results,
            ..self.clone()
        }
    }
}

/// One web result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub body: String,
    pub url: String,
}

/// Web lookup capability used by the travel tools.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Ordered results for `query`; empty when nothing matched.
    async fn search(
        &self,
        query: &str,
        settings: &SearchSettings,
    ) -> Result<Vec<SearchResult>, ToolSourceError>;
}

struct Patterns {
    title: Regex,
    snippet: Regex,
    href: Regex,
    tag: Regex,
    space: Regex,
}

static PATTERNS: Lazy<Result<Patterns, regex::Error>> = Lazy::new(|| {
    Ok(Patterns {
        title: Regex::new(r#"(?s)<a([^>]*class="result__a"[^>]*)>(.*?)</a>"#)?,
        snippet: Regex::new(r#"(?s)class="result__snippet"[^>]*>(.*?)</(?:a|div|td)>"#)?,
        href: Regex::new(r#"href="([^"]*)""#)?,
        tag: Regex::new(r"<[^>]+>")?,
        space: Regex::new(r"\s+")?,
    })
});

fn patterns() -> Result<&'static Patterns, ToolSourceError> {
    PATTERNS
        .as_ref()
        .map_err(|e| ToolSourceError::Transport(format!("search parser unavailable: {}", e)))
}

/// DuckDuckGo HTML search.
pub struct DuckDuckGoSearch {
    http: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_default(),
            base_url: DUCKDUCKGO_BASE_URL.to_string(),
        }
    }

    /// Override the endpoint root (tests point this at a local mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(
        &self,
        query: &str,
        settings: &SearchSettings,
    ) -> Result<Vec<SearchResult>, ToolSourceError> {
        let url = format!("{}/html/", self.base_url);
        debug!(query, region = %settings.region, safe_search = settings.safe_search.as_str(), "DuckDuckGo search");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("kl", settings.region.as_str()),
                ("kp", settings.safe_search.ddg_param()),
            ])
            .send()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolSourceError::Transport(format!(
                "search returned HTTP {}",
                status
            )));
        }
        let html = response
            .text()
            .await
            .map_err(|e| ToolSourceError::Transport(format!("search body read failed: {}", e)))?;

        let results = parse_results(&html, settings.max_results)?;
        debug!(count = results.len(), "DuckDuckGo results parsed");
        Ok(results)
    }
}

/// Extracts results from the HTML page. Each title anchor pairs with the first snippet
/// that follows it before the next title.
pub(crate) fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchResult>, ToolSourceError> {
    let p = patterns()?;
    let titles: Vec<_> = p.title.captures_iter(html).collect();
    let mut results = Vec::new();

    for (i, cap) in titles.iter().enumerate() {
        if results.len() >= max_results {
            break;
        }
        let (Some(whole), Some(attrs), Some(inner)) = (cap.get(0), cap.get(1), cap.get(2)) else {
            continue;
        };
        let title = clean_text(p, inner.as_str());
        if title.is_empty() {
            continue;
        }
        let href = p
            .href
            .captures(attrs.as_str())
            .and_then(|c| c.get(1))
            .map(|m| resolve_href(&html_escape::decode_html_entities(m.as_str())))
            .unwrap_or_default();

        let block_end = titles
            .get(i + 1)
            .and_then(|c| c.get(0))
            .map(|m| m.start())
            .unwrap_or(html.len());
        let body = p
            .snippet
            .captures(&html[whole.end()..block_end])
            .and_then(|c| c.get(1))
            .map(|m| clean_text(p, m.as_str()))
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            body,
            url: href,
        });
    }
    Ok(results)
}

fn clean_text(p: &Patterns, fragment: &str) -> String {
    let no_tags = p.tag.replace_all(fragment, "");
    let decoded = html_escape::decode_html_entities(&no_tags);
    p.space.replace_all(decoded.trim(), " ").into_owned()
}

/// DuckDuckGo wraps targets as `//duckduckgo.com/l/?uddg=<encoded>`; unwrap to the target.
fn resolve_href(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };
    url::Url::parse(&absolute)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "uddg")
                .map(|(_, v)| v.into_owned())
        })
        .unwrap_or(absolute)
}
