//! The record threaded through every node of the planning graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::graph::NodeId;
use crate::message::Message;

use super::{AgentOutput, TripRequest};

/// Shared planning state.
///
/// Fields are private so the only edits are the append/overwrite operations below:
/// `messages` never shrinks, `agent_outputs` is keyed by the closed [`NodeId`] set, and
/// `iteration_count` only moves up. Cloning is cheap for the request (`Arc`) and copies
/// the conversation, so every snapshot is independent of the next.
#[derive(Debug, Clone, Serialize)]
pub struct PlanningState {
    request: Arc<TripRequest>,
    messages: Vec<Message>,
    current_node: Option<NodeId>,
    agent_outputs: BTreeMap<NodeId, AgentOutput>,
    iteration_count: u32,
    final_plan: Option<Value>,
}

impl PlanningState {
    /// Fresh state for one planning run.
    pub fn new(request: TripRequest) -> Self {
        Self::from_shared(Arc::new(request))
    }

    pub fn from_shared(request: Arc<TripRequest>) -> Self {
        Self {
            request,
            messages: Vec::new(),
            current_node: None,
            agent_outputs: BTreeMap::new(),
            iteration_count: 0,
            final_plan: None,
        }
    }

    pub fn request(&self) -> &TripRequest {
        &self.request
    }

    pub fn shared_request(&self) -> Arc<TripRequest> {
        Arc::clone(&self.request)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the latest message, or "" when there is none.
    pub fn last_message_text(&self) -> &str {
        self.messages.last().map(Message::content).unwrap_or("")
    }

    /// Trailing window of at most `n` messages, oldest first.
    pub fn recent_messages(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.current_node
    }

    pub fn agent_outputs(&self) -> &BTreeMap<NodeId, AgentOutput> {
        &self.agent_outputs
    }

    pub fn output(&self, node: NodeId) -> Option<&AgentOutput> {
        self.agent_outputs.get(&node)
    }

    pub fn has_output(&self, node: NodeId) -> bool {
        self.agent_outputs.contains_key(&node)
    }

    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    pub fn final_plan(&self) -> Option<&Value> {
        self.final_plan.as_ref()
    }

    /// Appends one message.
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Writes `node`'s entry, replacing only that node's previous output.
    pub fn record_output(&mut self, node: NodeId, output: AgentOutput) {
        self.agent_outputs.insert(node, output);
    }

    pub fn set_current_node(&mut self, node: NodeId) {
        self.current_node = Some(node);
    }

    /// Bumps the coordinator counter and returns the new value.
    pub fn increment_iteration(&mut self) -> u32 {
        self.iteration_count = self.iteration_count.saturating_add(1);
        self.iteration_count
    }

    pub fn set_final_plan(&mut self, plan: Value) {
        self.final_plan = Some(plan);
    }

    /// Stores a lookup result on `node`'s entry. Returns false when `node` has no entry yet.
    pub fn attach_search_results(&mut self, node: NodeId, results: impl Into<String>) -> bool {
        match self.agent_outputs.get_mut(&node) {
            Some(entry) => {
                entry.search_results = Some(results.into());
                true
            }
            None => false,
        }
    }
}
