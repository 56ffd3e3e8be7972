//! Agent Core error types.

use thiserror::Error;

use crate::llm::LlmError;

/// Errors that can occur while an agent processes a request.
///
/// The orchestrator is the last stop for these: it logs them and answers the
/// user with plain text, so none of them ever reaches a front end.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The language-model query itself failed.
    #[error("language model query failed: {0}")]
    Llm(#[from] LlmError),

    /// The model reply could not be parsed into an `{action, args}` mapping.
    #[error("unparsable action reply: {reason}")]
    UnparsableReply {
        /// Raw model reply, kept as diagnostic detail.
        reply: String,
        reason: String,
    },

    /// A matched handler failed while executing.
    #[error("handler '{identifier}' failed: {reason}")]
    HandlerFailed { identifier: String, reason: String },
}
