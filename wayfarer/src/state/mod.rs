//! State types for the planning graph.
//!
//! The [`PlanningState`] flows through [`CompiledPlanningGraph`](crate::graph::CompiledPlanningGraph)
//! and is read by every [`AgentNode`](crate::agent::AgentNode); each node returns a new
//! value instead of mutating the one it was given.
//!
//! # Main types
//!
//! - [`PlanningState`]: conversation, per-node outputs, iteration counter, final plan.
//! - [`TripRequest`]: the user's parameters, shared read-only across snapshots.
//! - [`AgentOutput`] / [`OutputStatus`]: one node's latest result.
//! - [`Itinerary`]: typed view of the final plan.
//!
//! # Example
//!
//! ```rust
//! use wayfarer::{Message, PlanningState, TripRequest};
//!
//! let request = TripRequest::new("Kyoto").with_duration_days(3).with_interests(["food"]);
//! let mut state = PlanningState::new(request);
//! state.push_message(Message::user("Plan my trip."));
//! assert_eq!(state.messages().len(), 1);
//! ```

mod itinerary;
mod output;
mod planning_state;
mod request;

pub use itinerary::{maps_search_url, Activity, Itinerary, ItineraryDay};
pub use output::{AgentOutput, OutputStatus};
pub use planning_state::PlanningState;
pub use request::{TripRequest, DEFAULT_BUDGET, DEFAULT_DURATION_DAYS};
