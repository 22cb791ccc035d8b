//! Typed read view of the itinerary planner's structured output.
//!
//! The graph stores the itinerary as a JSON value (`final_plan`); these structs are a
//! lenient view over it. Every field defaults, so partial model output still deserializes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&";

/// Google Maps search URL for `query`.
pub fn maps_search_url(query: &str) -> String {
    let encoded: String = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("query", query.trim())
        .finish();
    format!("{}{}", MAPS_SEARCH_BASE, encoded)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Itinerary {
    pub trip_title: String,
    pub overview: String,
    pub sustainability_score: Option<u32>,
    pub price_range: String,
    pub concierge_note: String,
    pub days: Vec<ItineraryDay>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItineraryDay {
    pub day_number: u32,
    pub day_name: String,
    pub theme: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub time: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub tag: String,
    pub map_query: String,
}

impl Itinerary {
    /// Reads a plan value; `None` when it is not an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn total_activities(&self) -> usize {
        self.days.iter().map(|d| d.activities.len()).sum()
    }
}

impl Activity {
    /// Maps link from `map_query`, falling back to location then title.
    pub fn map_link(&self) -> Option<String> {
        [&self.map_query, &self.location, &self.title]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .map(|q| maps_search_url(q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_search_url_encodes_query() {
        let url = maps_search_url("Fushimi Inari, Kyoto");
        assert_eq!(
            url,
            "https://www.google.com/maps/search/?api=1&query=Fushimi+Inari%2C+Kyoto"
        );
    }

    /// **Scenario**: Partial model output still yields a typed itinerary with defaults.
    #[test]
    fn from_value_tolerates_missing_fields() {
        let v = json!({
            "trip_title": "Kyoto in Three Days",
            "days": [{"day_number": 1, "activities": [{"title": "Nishiki Market"}]}]
        });
        let it = Itinerary::from_value(&v).unwrap();
        assert_eq!(it.trip_title, "Kyoto in Three Days");
        assert_eq!(it.days.len(), 1);
        assert_eq!(it.total_activities(), 1);
        assert!(it.sustainability_score.is_none());
        assert_eq!(
            it.days[0].activities[0].map_link().unwrap(),
            "https://www.google.com/maps/search/?api=1&query=Nishiki+Market"
        );
    }

    #[test]
    fn from_value_rejects_non_object() {
        assert!(Itinerary::from_value(&json!("plan")).is_none());
    }

    #[test]
    fn activity_without_any_query_has_no_link() {
        assert!(Activity::default().map_link().is_none());
    }
}
