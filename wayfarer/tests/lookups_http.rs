//! HTTP clients against local `wiremock` servers: DuckDuckGo search, OpenWeather,
//! Gemini and OpenAI-compatible chat, plus the travel lookups on top of them.


use std::sync::Arc;

use serde_json::json;
use wayfarer::tools::{TOOL_HOTELS, TOOL_WEATHER_INFO};
use wayfarer::{
    AgentError, ChatOpenAI, DuckDuckGoSearch, GeminiClient, LlmClient, Message,
    OpenWeatherClient, SearchSettings, ToolCallContext, ToolSource, ToolSourceError,
    TravelToolsSource, TripRequest, WeatherSource, WebSearch,
};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RESULTS_PAGE: &str = r#"
<div class="result">
  <a rel="nofollow" class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fryokan">Kyoto <b>Ryokan</b> Guide</a>
  <a class="result__snippet" href="x">Traditional inns near Gion &amp; Higashiyama.</a>
</div>
<div class="result">
  <a rel="nofollow" class="result__a" href="https://example.com/hostels">Kyoto Hostels</a>
  <a class="result__snippet" href="y">Dorm beds from 3000 yen.</a>
</div>
"#;

fn ddg(server: &MockServer) -> DuckDuckGoSearch {
    DuckDuckGoSearch::new().with_base_url(server.uri())
}

// --- DuckDuckGo ---

/// **Scenario**: Query, region and safe-search level are sent; results are parsed.
#[tokio::test]
async fn duckduckgo_sends_settings_and_parses_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "Kyoto ryokan"))
        .and(query_param("kl", "jp-jp"))
        .and(query_param("kp", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let settings = SearchSettings {
        region: "jp-jp".into(),
        safe_search: wayfarer::SafeSearch::Strict,
        ..SearchSettings::default()
    };
    let results = ddg(&server).search("Kyoto ryokan", &settings).await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Kyoto Ryokan Guide");
    assert_eq!(results[0].url, "https://example.com/ryokan");
    assert_eq!(results[0].body, "Traditional inns near Gion & Higashiyama.");
}

#[tokio::test]
async fn duckduckgo_http_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = ddg(&server)
        .search("Kyoto", &SearchSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ToolSourceError::Transport(ref m) if m.contains("503")));
}

// --- OpenWeather ---

fn owm_body() -> serde_json::Value {
    json!({
        "name": "Kyoto",
        "main": {"temp": 16.2, "feels_like": 15.0, "temp_min": 12.0, "temp_max": 19.5, "humidity": 71},
        "weather": [{"description": "light rain"}],
        "wind": {"speed": 3.6},
        "sys": {"country": "JP"}
    })
}

/// **Scenario**: Current conditions are read in metric units with the configured key.
#[tokio::test]
async fn openweather_reads_current_conditions() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Kyoto"))
        .and(query_param("appid", "owm-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(owm_body()))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(Some("owm-key".into())).with_base_url(server.uri());
    let w = client.fetch_current_weather("Kyoto").await.unwrap().unwrap();

    assert_eq!(w.location, "Kyoto");
    assert_eq!(w.temperature_low_c, 12.0);
    assert_eq!(w.temperature_high_c, 19.5);
    assert_eq!(w.condition, "light rain");
    assert_eq!(w.humidity_pct, 71);
    assert_eq!(w.country_code.as_deref(), Some("JP"));
}

/// **Scenario**: An unknown city is "no data", not an error; other failures are errors.
#[tokio::test]
async fn openweather_not_found_is_none_and_server_error_is_err() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"cod": "404"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Kyoto"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(Some("k".into())).with_base_url(server.uri());
    assert!(client.fetch_current_weather("Atlantis").await.unwrap().is_none());
    assert!(client.fetch_current_weather("Kyoto").await.is_err());
}

// --- Travel lookups over both clients ---

fn trip_ctx() -> ToolCallContext {
    ToolCallContext::new(
        None,
        Arc::new(TripRequest::new("Kyoto").with_budget("budget")),
    )
}

/// **Scenario**: The weather lookup uses OpenWeather when it knows the place.
#[tokio::test]
async fn weather_lookup_prefers_openweather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(owm_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let weather = OpenWeatherClient::new(Some("k".into())).with_base_url(server.uri());
    let tools = TravelToolsSource::new(
        Arc::new(ddg(&server)),
        Some(Arc::new(weather)),
        SearchSettings::default(),
    );
    let out = tools
        .call_tool_with_context(TOOL_WEATHER_INFO, json!({"query": "Kyoto weather"}), Some(&trip_ctx()))
        .await
        .unwrap();
    assert!(out.text.starts_with("Current Weather in Kyoto:"), "{}", out.text);
}

/// **Scenario**: Without OpenWeather data the weather lookup falls back to web search.
#[tokio::test]
async fn weather_lookup_falls_back_to_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let weather = OpenWeatherClient::new(Some("k".into())).with_base_url(server.uri());
    let tools = TravelToolsSource::new(
        Arc::new(ddg(&server)),
        Some(Arc::new(weather)),
        SearchSettings::default(),
    );
    let out = tools
        .call_tool_with_context(TOOL_WEATHER_INFO, json!({}), Some(&trip_ctx()))
        .await
        .unwrap();
    assert!(out.text.starts_with("Weather information for Kyoto:"), "{}", out.text);
    assert!(out.text.contains("1. Kyoto Ryokan Guide"));
}

/// **Scenario**: A trip with travel dates searches the forecast for those dates and never
/// asks OpenWeather for today's conditions.
#[tokio::test]
async fn dated_weather_lookup_skips_openweather() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(owm_body()))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "Kyoto weather forecast August 10-14 travel climate"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let weather = OpenWeatherClient::new(Some("k".into())).with_base_url(server.uri());
    let tools = TravelToolsSource::new(
        Arc::new(ddg(&server)),
        Some(Arc::new(weather)),
        SearchSettings::default(),
    );
    let ctx = ToolCallContext::new(
        None,
        Arc::new(TripRequest::new("Kyoto").with_travel_dates("August 10-14")),
    );
    let out = tools
        .call_tool_with_context(TOOL_WEATHER_INFO, json!({}), Some(&ctx))
        .await
        .unwrap();
    assert!(out.text.starts_with("Weather information for Kyoto:"), "{}", out.text);
}

#[tokio::test]
async fn hotel_lookup_uses_budget_tier_from_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "Kyoto hotels budget best places to stay accommodation"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let tools = TravelToolsSource::new(Arc::new(ddg(&server)), None, SearchSettings::default());
    let out = tools
        .call_tool_with_context(TOOL_HOTELS, json!({}), Some(&trip_ctx()))
        .await
        .unwrap();
    assert!(out.text.starts_with("Hotel options in Kyoto (budget budget):"), "{}", out.text);
    assert!(out.text.contains("2. Kyoto Hostels\n   Dorm beds from 3000 yen...."));
}

// --- Gemini ---

/// **Scenario**: The key goes in the header, the system prompt in systemInstruction, and
/// text parts are concatenated.
#[tokio::test]
async fn gemini_generate_content_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "g-key"))
        .and(body_partial_json(json!({
            "systemInstruction": {"parts": [{"text": "You are the coordinator."}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [
                {"text": "travel_"}, {"text": "advisor"}
            ]}}],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 2, "totalTokenCount": 14}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("g-key").with_base_url(server.uri());
    let reply = client
        .invoke(&[Message::system("You are the coordinator."), Message::user("Plan Kyoto.")])
        .await
        .unwrap();
    assert_eq!(reply.text(), "travel_advisor");
    assert_eq!(reply.usage.unwrap().total_tokens, 14);
}

/// **Scenario**: A blocked prompt with no candidates is an empty reply, not an error.
#[tokio::test]
async fn gemini_without_candidates_is_empty_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("g-key").with_base_url(server.uri());
    let reply = client.invoke(&[Message::user("Plan Kyoto.")]).await.unwrap();
    assert_eq!(reply.text(), "");
    assert!(reply.usage.is_none());
}

#[tokio::test]
async fn gemini_error_status_is_llm_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
        .mount(&server)
        .await;

    let client = GeminiClient::new("g-key").with_base_url(server.uri());
    let err = client.invoke(&[Message::user("hi")]).await.unwrap_err();
    assert!(matches!(err, AgentError::Llm(ref m) if m.contains("429") && m.contains("quota")));
}

// --- OpenAI-compatible ---

#[tokio::test]
async fn openai_compatible_endpoint_returns_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1_700_000_000,
            "model": "gpt-4o-mini",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "weather_analyst"},
                "finish_reason": "stop",
                "logprobs": null
            }],
            "usage": {"prompt_tokens": 9, "completion_tokens": 2, "total_tokens": 11}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatOpenAI::with_endpoint(Some("sk-test"), Some(&server.uri()), "gpt-4o-mini");
    let reply = client.invoke(&[Message::user("Who next?")]).await.unwrap();
    assert_eq!(reply.text(), "weather_analyst");
    assert_eq!(reply.usage.unwrap().total_tokens, 11);
}
