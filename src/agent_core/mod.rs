//! Agent Core — conversation state, action parsing, and request routing.
//!
//! Submodules:
//! - `memory`: Bounded FIFO conversation memory shared by orchestrator and agents
//! - `action`: `{action, args}` parsing of raw model replies
//! - `agent`: One specialist agent — model, memory, capability handlers
//! - `orchestrator`: Classification, location context, fan-out, merging
//! - `errors`: Agent-level error types

pub mod action;
pub mod agent;
pub mod errors;
pub mod memory;
pub mod orchestrator;

// Re-exports for convenience
pub use action::{StructuredAction, RESPOND_TO_USER};
pub use agent::{Agent, AgentReply};
pub use errors::AgentError;
pub use memory::ConversationMemory;
pub use orchestrator::{Envelope, LocationPrompter, Orchestrator};
