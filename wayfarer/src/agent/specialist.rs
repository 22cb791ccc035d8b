//! Free-text specialists: travel advisor, budget optimizer, local expert.

use crate::error::AgentError;
use crate::graph::{specialist_route, Next, NodeId};
use crate::message::Message;
use crate::state::{AgentOutput, PlanningState};

use super::AgentModel;

/// A specialist whose output is the reply text itself.
pub struct Specialist {
    id: NodeId,
    model: AgentModel,
}

impl Specialist {
    pub fn new(id: NodeId, model: AgentModel) -> Self {
        Self { id, model }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub async fn run(&self, state: &PlanningState) -> Result<(PlanningState, Next), AgentError> {
        let messages = self.model.build_messages(state);
        let reply = self.model.reply(self.id, &messages).await?;

        let mut next_state = state.clone();
        next_state.record_output(self.id, AgentOutput::text(reply.clone()));
        next_state.push_message(Message::assistant(reply));
        next_state.set_current_node(self.id);
        let next = specialist_route(&next_state);
        Ok((next_state, next))
    }
}
