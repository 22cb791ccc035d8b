//! Wayfarer CLI library: run options, graph construction from settings, and output
//! rendering used by the `wayfarer` binary.

pub mod display;
pub mod run;

pub use display::{format_step, outcome_json, render_plan, to_json_string, truncate_display};
pub use run::{build_graph, build_llm, graph_config, plan, RunError, RunOptions};
