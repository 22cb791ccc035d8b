//! Coordinator: decides which agent works next.

use crate::error::AgentError;
use crate::graph::{coordinator_route, Next, NodeId};
use crate::message::Message;
use crate::state::{AgentOutput, PlanningState};

use super::AgentModel;

/// Reads the request and specialist outputs, replies with the next agent's name,
/// `SEARCH`, or `FINAL_PLAN`. Each run bumps `iteration_count` by one.
pub struct Coordinator {
    model: AgentModel,
    kickoff: String,
}

impl Coordinator {
    pub fn new(model: AgentModel, kickoff: impl Into<String>) -> Self {
        Self {
            model,
            kickoff: kickoff.into(),
        }
    }

    pub async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        let mut messages = self.model.build_messages(state);
        if state.messages().is_empty() {
            messages.push(Message::user(self.kickoff.clone()));
        }
        let reply = self.model.reply(NodeId::Coordinator, &messages).await?;

        let mut next_state = state.clone();
        next_state.push_message(Message::assistant(reply.clone()));
        next_state.record_output(NodeId::Coordinator, AgentOutput::text(reply));
        next_state.set_current_node(NodeId::Coordinator);
        let iteration = next_state.increment_iteration();

        let next = coordinator_route(&next_state);
        tracing::debug!(iteration, next = %next, "coordinator decision");
        Ok((next_state, next))
    }
}
