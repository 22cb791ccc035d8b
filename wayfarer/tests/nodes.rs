//! Single-step tests for the agent nodes: state in, new state and route out.


use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use wayfarer::agent::{
    Coordinator, ItineraryPlanner, Specialist, TransportMobility, WeatherAnalyst,
    INTERRUPTION_NOTICE,
};
use wayfarer::{
    maps_search_url, AgentModel, AgentNode, CurrentWeather, Message, MockLlm, Next, Node, NodeId,
    OutputStatus, PlanningState, ToolSourceError, TripRequest, WeatherSource,
};

fn kyoto() -> PlanningState {
    PlanningState::new(
        TripRequest::new("Kyoto")
            .with_duration_days(3)
            .with_interests(["food"]),
    )
}

fn model(llm: &Arc<MockLlm>, template: &str, window: usize) -> AgentModel {
    AgentModel::new(llm.clone(), template, window)
}

// --- Coordinator ---

/// **Scenario**: On an empty conversation the coordinator sends the kickoff prompt, bumps
/// the iteration count by one and routes by name.
#[tokio::test]
async fn coordinator_kickoff_and_iteration() {
    let llm = Arc::new(MockLlm::new("Let's start with the weather_analyst."));
    let node = Coordinator::new(model(&llm, "Coordinate a trip to {destination}.", 3), "Begin.");

    let initial = kyoto();
    let (out, next) = node.run(&initial).await.unwrap();

    assert_eq!(next, Next::Node(NodeId::WeatherAnalyst));
    assert_eq!(out.iteration_count(), 1);
    assert_eq!(initial.iteration_count(), 0);
    assert_eq!(out.current_node(), Some(NodeId::Coordinator));
    assert_eq!(out.messages().len(), 1);

    let sent = llm.last_call().unwrap();
    assert_eq!(sent[0], Message::system("Coordinate a trip to Kyoto."));
    assert_eq!(sent.last(), Some(&Message::user("Begin.")));
}

#[tokio::test]
async fn coordinator_skips_kickoff_once_conversation_started() {
    let llm = Arc::new(MockLlm::new("search for hotels"));
    let node = Coordinator::new(model(&llm, "Coordinate.", 3), "Begin.");
    let mut state = kyoto();
    state.push_message(Message::assistant("Advisor notes."));

    let (out, next) = node.run(&state).await.unwrap();
    assert_eq!(next, Next::Node(NodeId::ToolExecutor));
    let sent = llm.last_call().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(!sent.contains(&Message::user("Begin.")));
    assert_eq!(out.messages().len(), 2);
}

// --- Specialists ---

/// **Scenario**: A specialist sees only its trailing window and records its reply.
#[tokio::test]
async fn specialist_uses_window_and_records_output() {
    let llm = Arc::new(MockLlm::new("Stay near Gion."));
    let node = Specialist::new(NodeId::LocalExpert, model(&llm, "Local tips for {destination}.", 2));
    let mut state = kyoto();
    for text in ["one", "two", "three"] {
        state.push_message(Message::assistant(text));
    }

    let (out, next) = node.run(&state).await.unwrap();
    assert_eq!(next, Next::Node(NodeId::Coordinator));
    let sent = llm.last_call().unwrap();
    assert_eq!(
        sent,
        vec![
            Message::system("Local tips for Kyoto."),
            Message::assistant("two"),
            Message::assistant("three"),
        ]
    );
    let entry = out.output(NodeId::LocalExpert).unwrap();
    assert_eq!(entry.response, "Stay near Gion.");
    assert_eq!(entry.status, OutputStatus::Completed);
    assert_eq!(out.current_node(), Some(NodeId::LocalExpert));
}

#[tokio::test]
async fn specialist_search_marker_routes_to_tool_executor() {
    let llm = Arc::new(MockLlm::new("Need numbers. NEED_SEARCH: Kyoto hostel prices"));
    let node = AgentNode::Specialist(Specialist::new(
        NodeId::BudgetOptimizer,
        model(&llm, "Budget.", 2),
    ));
    assert_eq!(node.id(), NodeId::BudgetOptimizer);
    let (_, next) = Node::run(&node, &kyoto()).await.unwrap();
    assert_eq!(next, Next::Node(NodeId::ToolExecutor));
}

// --- Weather analyst ---

struct FixedWeather(Option<CurrentWeather>);

#[async_trait]
impl WeatherSource for FixedWeather {
    async fn fetch_current_weather(
        &self,
        _place: &str,
    ) -> Result<Option<CurrentWeather>, ToolSourceError> {
        Ok(self.0.clone())
    }
}

struct BrokenWeather;

#[async_trait]
impl WeatherSource for BrokenWeather {
    async fn fetch_current_weather(
        &self,
        _place: &str,
    ) -> Result<Option<CurrentWeather>, ToolSourceError> {
        Err(ToolSourceError::Transport("connection refused".into()))
    }
}

fn rainy() -> CurrentWeather {
    CurrentWeather {
        location: "Kyoto".into(),
        temperature_low_c: 9.0,
        temperature_high_c: 15.0,
        current_temp_c: 11.0,
        feels_like_c: 9.5,
        condition: "light rain".into(),
        humidity_pct: 80,
        wind_speed_mps: 3.0,
        country_code: Some("JP".into()),
    }
}

/// **Scenario**: Structured conditions produce the report without calling the model.
#[tokio::test]
async fn weather_prefers_structured_source() {
    let llm = Arc::new(MockLlm::new("should not be used"));
    let node = WeatherAnalyst::new(
        model(&llm, "Weather.", 2),
        Some(Arc::new(FixedWeather(Some(rainy())))),
    );

    let (out, next) = node.run(&kyoto()).await.unwrap();
    assert_eq!(llm.call_count(), 0);
    assert_eq!(next, Next::Node(NodeId::Coordinator));
    let entry = out.output(NodeId::WeatherAnalyst).unwrap();
    assert_eq!(entry.status, OutputStatus::Completed);
    assert_eq!(entry.output["temperature_c"]["expected_low"], 9.0);
    assert_eq!(entry.output["travel_dates"], "Not specified");
    let packing = entry.output["packing"].as_array().unwrap();
    assert!(packing.contains(&json!("Umbrella or rain jacket")));
    assert!(packing.contains(&json!("Warm layers for cool mornings and evenings")));
}

/// **Scenario**: A failing source falls back to the model; a non-JSON reply becomes the
/// default report with the text kept as the conditions summary.
#[tokio::test]
async fn weather_falls_back_to_model_then_default_report() {
    let llm = Arc::new(MockLlm::new("Expect mild, damp days."));
    let node = WeatherAnalyst::new(model(&llm, "Weather.", 2), Some(Arc::new(BrokenWeather)));

    let (out, _) = node.run(&kyoto()).await.unwrap();
    assert_eq!(llm.call_count(), 1);
    let entry = out.output(NodeId::WeatherAnalyst).unwrap();
    assert_eq!(entry.status, OutputStatus::Completed);
    assert!(entry.recovered);
    assert_eq!(entry.output["conditions_summary"], "Expect mild, damp days.");
    assert!(entry.output["temperature_c"]["expected_low"].is_null());
    assert_eq!(out.last_message_text(), "Expect mild, damp days.");
}

/// **Scenario**: A dated trip never reports today's conditions as its forecast; the model
/// is asked even though the structured source has data.
#[tokio::test]
async fn weather_dated_trip_skips_structured_source() {
    let llm = Arc::new(MockLlm::new(
        r#"{"destination": "Kyoto", "travel_dates": "August 10-14", "conditions_summary": "Hot and humid"}"#,
    ));
    let node = WeatherAnalyst::new(
        model(&llm, "Weather.", 2),
        Some(Arc::new(FixedWeather(Some(rainy())))),
    );
    let state = PlanningState::new(
        TripRequest::new("Kyoto")
            .with_duration_days(3)
            .with_travel_dates("August 10-14"),
    );

    let (out, _) = node.run(&state).await.unwrap();
    assert_eq!(llm.call_count(), 1);
    let entry = out.output(NodeId::WeatherAnalyst).unwrap();
    assert!(!entry.recovered);
    assert_eq!(entry.output["conditions_summary"], "Hot and humid");
    assert!(entry.output.get("temperature_c").is_none());
}

#[tokio::test]
async fn weather_parses_model_json_when_source_has_nothing() {
    let llm = Arc::new(MockLlm::new(
        r#"Forecast: {"destination": "Kyoto", "conditions_summary": "Cherry blossom season"}"#,
    ));
    let node = WeatherAnalyst::new(model(&llm, "Weather.", 2), Some(Arc::new(FixedWeather(None))));

    let (out, _) = node.run(&kyoto()).await.unwrap();
    let entry = out.output(NodeId::WeatherAnalyst).unwrap();
    assert_eq!(entry.status, OutputStatus::Completed);
    assert_eq!(entry.output["conditions_summary"], "Cherry blossom season");
}

// --- Transport & mobility ---

/// **Scenario**: The transport plan gains a maps link built from its map query.
#[tokio::test]
async fn transport_adds_map_link() {
    let llm = Arc::new(MockLlm::new(
        r#"{"summary": "Buses and trains.", "getting_there": "Shinkansen", "local_options": [], "tips": [], "map_query": "Kyoto Station"}"#,
    ));
    let node = TransportMobility::new(model(&llm, "Transport.", 2));

    let (out, next) = node.run(&kyoto()).await.unwrap();
    assert_eq!(next, Next::Node(NodeId::Coordinator));
    let entry = out.output(NodeId::TransportMobility).unwrap();
    assert_eq!(entry.output["map_link"], maps_search_url("Kyoto Station"));
    assert_eq!(entry.output["getting_there"], "Shinkansen");
}

#[tokio::test]
async fn transport_fallback_links_destination() {
    let llm = Arc::new(MockLlm::new("Walk everywhere."));
    let node = TransportMobility::new(model(&llm, "Transport.", 2));

    let (out, _) = node.run(&kyoto()).await.unwrap();
    let entry = out.output(NodeId::TransportMobility).unwrap();
    assert_eq!(entry.status, OutputStatus::Completed);
    assert!(entry.recovered);
    assert_eq!(entry.output["summary"], "Walk everywhere.");
    assert_eq!(entry.output["map_link"], maps_search_url("Kyoto"));
}

// --- Itinerary planner ---

/// **Scenario**: A malformed reply still yields a complete default plan in `final_plan`.
#[tokio::test]
async fn itinerary_malformed_reply_uses_default_plan() {
    let llm = Arc::new(MockLlm::new("Day one: temples {unfinished"));
    let node = ItineraryPlanner::new(model(&llm, "Plan {duration} days.", 5));

    let (out, next) = node.run(&kyoto()).await.unwrap();
    assert_eq!(next, Next::Node(NodeId::Coordinator));
    let plan = out.final_plan().unwrap();
    assert_eq!(plan["trip_title"], "Journey to Kyoto");
    assert_eq!(plan["overview"], "Day one: temples {unfinished");
    assert_eq!(plan["sustainability_score"], 85);
    assert_eq!(plan["days"], json!([]));
    let entry = out.output(NodeId::ItineraryPlanner).unwrap();
    assert_eq!(entry.status, OutputStatus::Completed);
    assert!(entry.recovered);
    assert_eq!(llm.last_call().unwrap()[0], Message::system("Plan 3 days."));
}

/// **Scenario**: A reply with a broken JSON tail still yields an object with a title and a
/// `days` array, and the run is not failed.
#[tokio::test]
async fn itinerary_truncated_json_reply_is_recovered() {
    let llm = Arc::new(MockLlm::new(
        r#"Sure! Here's your plan: {"trip_title": "X", "days": [}"#,
    ));
    let node = ItineraryPlanner::new(model(&llm, "Plan.", 5));

    let (out, next) = node.run(&kyoto()).await.unwrap();
    assert_eq!(next, Next::Node(NodeId::Coordinator));
    let plan = out.final_plan().unwrap();
    assert!(plan["trip_title"].is_string());
    assert!(plan["days"].is_array());
    let entry = out.output(NodeId::ItineraryPlanner).unwrap();
    assert_eq!(entry.status, OutputStatus::Completed);
}

#[tokio::test]
async fn itinerary_empty_reply_pushes_interruption_notice() {
    let llm = Arc::new(MockLlm::new("   "));
    let node = ItineraryPlanner::new(model(&llm, "Plan.", 5));

    let (out, _) = node.run(&kyoto()).await.unwrap();
    assert_eq!(out.last_message_text(), INTERRUPTION_NOTICE);
    assert_eq!(out.final_plan().unwrap()["overview"], INTERRUPTION_NOTICE);
}

#[tokio::test]
async fn itinerary_json_reply_becomes_final_plan() {
    let llm = Arc::new(MockLlm::new(
        r#"{"trip_title": "Kyoto", "days": [{"day_number": 1, "activities": []}]}"#,
    ));
    let node = ItineraryPlanner::new(model(&llm, "Plan.", 5));

    let (out, _) = node.run(&kyoto()).await.unwrap();
    let entry = out.output(NodeId::ItineraryPlanner).unwrap();
    assert_eq!(entry.status, OutputStatus::Completed);
    assert!(!entry.recovered);
    assert_eq!(out.final_plan(), Some(&entry.output));
    assert_eq!(out.final_plan().unwrap()["days"][0]["day_number"], 1);
}
