//! Text and JSON rendering of planning runs.
//!
//! Steps go to stderr with `--verbose`; the final plan goes to stdout, as text or (with
//! `--json`) as one JSON document.

use serde_json::{json, Value};
use wayfarer::{
    GraphStep, Itinerary, Message, NodeId, PlanningState, RunOutcome, Termination,
};

/// Indent for nested lines (one level).
const INDENT: &str = "  ";

/// Truncates a string to at most `max` chars; appends "..." when truncated. UTF-8 safe.
pub fn truncate_display(s: &str, max: usize) -> String {
    const SUFFIX: &str = "...";
    let suffix_len = 3;
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max <= suffix_len {
        return s.chars().take(max).collect();
    }
    format!(
        "{}{}",
        s.chars().take(max - suffix_len).collect::<String>(),
        SUFFIX
    )
}

/// One message on one line, content truncated and newlines flattened.
pub fn format_message_truncated(m: &Message, max: usize) -> String {
    let flat = m.content().replace('\n', " ");
    match m {
        Message::System(_) => format!("System({})", truncate_display(&flat, max)),
        Message::User(_) => format!("User({})", truncate_display(&flat, max)),
        Message::Assistant(_) => format!("Assistant({})", truncate_display(&flat, max)),
    }
}

/// One verbose line per node execution, e.g. `[2] Travel Advisor -> coordinator (msgs=3, iter=1)`.
pub fn format_step(step: &GraphStep, max: usize) -> String {
    let mut line = format!(
        "[{}] {} -> {} (msgs={}, iter={})",
        step.step,
        step.node.label(),
        step.next,
        step.state.messages().len(),
        step.state.iteration_count()
    );
    if step.capped {
        line.push_str(" [recursion limit]");
    }
    if let Some(last) = step.state.last_message() {
        line.push('\n');
        line.push_str(INDENT);
        line.push_str(&format_message_truncated(last, max));
    }
    line
}

/// Human-readable plan: itinerary first, then what each specialist produced.
pub fn render_plan(outcome: &RunOutcome) -> String {
    let state = &outcome.state;
    let mut lines = Vec::new();

    match state.final_plan().and_then(Itinerary::from_value) {
        Some(plan) => render_itinerary(&plan, &mut lines),
        None => lines.push(format!(
            "No itinerary was produced for {}.",
            state.request().destination
        )),
    }

    let notes = specialist_notes(state);
    if !notes.is_empty() {
        lines.push(String::new());
        lines.push("Specialist notes:".to_string());
        lines.extend(notes);
    }

    if outcome.termination == Termination::RecursionLimit {
        lines.push(String::new());
        lines.push(format!(
            "Stopped after {} steps (recursion limit); the plan may be incomplete.",
            outcome.steps
        ));
    }
    lines.join("\n")
}

fn render_itinerary(plan: &Itinerary, lines: &mut Vec<String>) {
    let title = if plan.trip_title.is_empty() {
        "Trip plan"
    } else {
        plan.trip_title.as_str()
    };
    lines.push(title.to_string());
    lines.push("=".repeat(title.chars().count()));
    if !plan.overview.is_empty() {
        lines.push(plan.overview.clone());
    }
    let mut facts = Vec::new();
    if !plan.price_range.is_empty() {
        facts.push(format!("Budget: {}", plan.price_range));
    }
    if let Some(score) = plan.sustainability_score {
        facts.push(format!("Sustainability: {}/100", score));
    }
    if !facts.is_empty() {
        lines.push(facts.join(" | "));
    }

    for day in &plan.days {
        lines.push(String::new());
        let mut heading = format!("Day {}", day.day_number);
        if !day.day_name.is_empty() {
            heading.push_str(&format!(" ({})", day.day_name));
        }
        if !day.theme.is_empty() {
            heading.push_str(&format!(": {}", day.theme));
        }
        lines.push(heading);
        for a in &day.activities {
            let mut item = format!("{}- ", INDENT);
            if !a.time.is_empty() {
                item.push_str(&format!("{} ", a.time));
            }
            item.push_str(&a.title);
            if !a.location.is_empty() {
                item.push_str(&format!(" @ {}", a.location));
            }
            lines.push(item);
            if !a.description.is_empty() {
                lines.push(format!("{}{}{}", INDENT, INDENT, a.description));
            }
            if let Some(link) = a.map_link() {
                lines.push(format!("{}{}{}", INDENT, INDENT, link));
            }
        }
    }

    if !plan.concierge_note.is_empty() {
        lines.push(String::new());
        lines.push(format!("Note: {}", plan.concierge_note));
    }
}

/// One line per specialist output, in routing order.
fn specialist_notes(state: &PlanningState) -> Vec<String> {
    NodeId::ALL
        .iter()
        .filter(|id| {
            !matches!(
                id,
                NodeId::Coordinator | NodeId::ItineraryPlanner | NodeId::ToolExecutor
            )
        })
        .filter_map(|id| state.output(*id).map(|o| (*id, o)))
        .map(|(id, o)| {
            let marker = if o.recovered { " (fallback)" } else { "" };
            let flat = o.response.replace('\n', " ");
            format!("{}{}{}: {}", INDENT, id, marker, truncate_display(flat.trim(), 160))
        })
        .collect()
}

/// Machine-readable run result.
pub fn outcome_json(outcome: &RunOutcome) -> Value {
    let state = &outcome.state;
    json!({
        "request": state.request(),
        "termination": outcome.termination,
        "steps": outcome.steps,
        "path": outcome.path,
        "iteration_count": state.iteration_count(),
        "final_plan": state.final_plan(),
        "agent_outputs": state.agent_outputs(),
    })
}

/// Serializes `value` compactly, or multi-line with `pretty`.
pub fn to_json_string(value: &Value, pretty: bool) -> String {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    out.unwrap_or_else(|_| value.to_string())
}
