//! Trip request: the user's planning parameters.
//!
//! Built once per planning run and shared read-only (`Arc`) by every state snapshot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Default trip length when the caller does not give one.
pub const DEFAULT_DURATION_DAYS: u32 = 7;
/// Default budget tier.
pub const DEFAULT_BUDGET: &str = "moderate";

/// Parameters of one planning request. Immutable once the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    pub destination: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    pub duration_days: u32,
    /// Budget tier as free text (e.g. "budget", "moderate", "luxury").
    pub budget: String,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    pub group_size: u32,
    /// Travel window as free text (e.g. "April 3-6").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_dates: Option<String>,
}

impl TripRequest {
    /// Request for `destination` with default duration, budget and a group of one.
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            origin: None,
            duration_days: DEFAULT_DURATION_DAYS,
            budget: DEFAULT_BUDGET.to_string(),
            interests: BTreeSet::new(),
            group_size: 1,
            travel_dates: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn with_duration_days(mut self, days: u32) -> Self {
        self.duration_days = days;
        self
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    /// Adds interests; duplicates and surrounding whitespace collapse.
    pub fn with_interests<I, T>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.interests.extend(
            interests
                .into_iter()
                .map(|i| i.into().trim().to_lowercase())
                .filter(|i| !i.is_empty()),
        );
        self
    }

    pub fn with_group_size(mut self, size: u32) -> Self {
        self.group_size = size;
        self
    }

    pub fn with_travel_dates(mut self, dates: impl Into<String>) -> Self {
        self.travel_dates = Some(dates.into());
        self
    }

    /// Interests joined with ", " (empty string when none).
    pub fn interests_joined(&self) -> String {
        self.interests
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Duration as text, e.g. "3 days".
    pub fn duration_label(&self) -> String {
        if self.duration_days == 1 {
            "1 day".to_string()
        } else {
            format!("{} days", self.duration_days)
        }
    }

    /// Cost share of one traveller; a zero group size counts as one.
    pub fn cost_per_person(&self, total: f64) -> f64 {
        total / f64::from(self.group_size.max(1))
    }

    /// Cost per day; a zero duration counts as one day.
    pub fn average_daily_cost(&self, total: f64) -> f64 {
        total / f64::from(self.duration_days.max(1))
    }
}
