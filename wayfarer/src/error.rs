//! Planning run error types.
//!
//! Returned by `Node::run`, `AgentNode::run` and the compiled graph's `invoke`/`run`.
//! Lookup failures never surface here: the tool executor turns them into messages.

use thiserror::Error;

/// Fatal error of a planning run.
///
/// A failed language-generation call is fatal to the whole run; the graph stops and the
/// error propagates to the caller. The recursion limit is not an error (see `Termination`).
#[derive(Debug, Error)]
pub enum AgentError {
    /// The language-generation call failed (transport, API status, empty choices).
    #[error("llm call failed: {0}")]
    Llm(String),

    /// Execution failed for any other reason (e.g. request build error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}
