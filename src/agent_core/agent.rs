//! Agent — one specialist with a model, a memory, and capability handlers.
//!
//! An agent turns one natural-language request into either a handler
//! invocation or a direct answer:
//!
//! 1. Record the request in its own bounded memory
//! 2. Prompt the model with the transcript plus a handler roster
//! 3. Record the raw reply, then parse it into `{action, args}`
//! 4. Dispatch to the first handler whose identifier matches the action
//!    (case-insensitive); an unmatched action goes back to the caller
//!
//! Errors along the way are logged and propagated; the orchestrator owns
//! the user-facing fallback text.

use std::sync::Arc;

use crate::llm::LanguageModel;
use crate::tools::CapabilityHandler;

use super::action::{parse_action, StructuredAction};
use super::errors::AgentError;
use super::memory::ConversationMemory;

// ─── AgentReply ──────────────────────────────────────────────────────────────

/// What one `process_input` round produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    /// A matched handler ran and produced user-facing text.
    Text(String),
    /// No handler matched; the caller interprets the structured action.
    Action(StructuredAction),
}

// ─── Agent ───────────────────────────────────────────────────────────────────

/// A specialist agent: name, capability handlers, and its own short memory.
pub struct Agent {
    name: String,
    description: String,
    handlers: Vec<Arc<dyn CapabilityHandler>>,
    llm: Arc<dyn LanguageModel>,
    memory: ConversationMemory,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handlers: Vec<Arc<dyn CapabilityHandler>>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        let name = name.into();
        tracing::debug!(
            agent = %name,
            handler_count = handlers.len(),
            "initialized agent"
        );
        Self {
            name,
            description: description.into(),
            handlers,
            llm,
            memory: ConversationMemory::default(),
        }
    }

    /// The agent's display name, as the orchestrator's roster shows it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line capability summary for the routing prompt.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Process one request: ask the model, then dispatch or hand back.
    pub async fn process_input(&mut self, user_text: &str) -> Result<AgentReply, AgentError> {
        self.memory.push("User", user_text);

        let prompt = self.build_prompt();
        tracing::debug!(agent = %self.name, prompt_chars = prompt.len(), "querying model");
        let reply = match self.llm.query(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(agent = %self.name, error = %e, "model query failed");
                return Err(AgentError::from(e));
            }
        };
        self.memory.push("Agent", &reply);

        let action = match parse_action(&reply) {
            Ok(action) => action,
            Err(e) => {
                tracing::error!(agent = %self.name, error = %e, "model reply did not parse");
                return Err(e);
            }
        };

        for handler in &self.handlers {
            if handler.identifier().eq_ignore_ascii_case(&action.action) {
                tracing::info!(
                    agent = %self.name,
                    handler = handler.identifier(),
                    "dispatching action"
                );
                return match handler.invoke(&action.args).await {
                    Ok(text) => Ok(AgentReply::Text(text)),
                    Err(e) => {
                        tracing::error!(
                            agent = %self.name,
                            handler = handler.identifier(),
                            error = %e,
                            "handler failed"
                        );
                        Err(AgentError::HandlerFailed {
                            identifier: handler.identifier().to_string(),
                            reason: e.to_string(),
                        })
                    }
                };
            }
        }

        tracing::debug!(agent = %self.name, action = %action.action, "no handler matched");
        Ok(AgentReply::Action(action))
    }

    /// Invoke one handler by exact identifier, never failing outward.
    ///
    /// Mapping args are unwrapped before the call: a `location` key wins,
    /// otherwise the first value (insertion order) is forwarded as text.
    /// Unknown identifiers and handler failures become plain text.
    pub async fn use_handler(&self, identifier: &str, args: &serde_json::Value) -> String {
        let Some(handler) = self
            .handlers
            .iter()
            .find(|handler| handler.identifier() == identifier)
        else {
            tracing::warn!(agent = %self.name, handler = identifier, "unknown handler");
            return format!("Tool {identifier} not found");
        };

        let Some(forwarded) = unwrap_handler_args(args) else {
            tracing::error!(agent = %self.name, handler = identifier, "empty args mapping");
            return format!("Error using tool {identifier}");
        };

        match handler.invoke(&forwarded).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(
                    agent = %self.name,
                    handler = identifier,
                    error = %e,
                    "handler failed"
                );
                format!("Error using tool {identifier}")
            }
        }
    }

    fn build_prompt(&self) -> String {
        let roster = self
            .handlers
            .iter()
            .map(|handler| format!("- {}: {}", handler.identifier(), handler.description()))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Context:\n{transcript}\n\n\
             Available tools:\n{roster}\n\n\
             Based on the user's input and context, decide if you should use a tool or respond directly.\n\
             If you identify an action, respond with the tool name and the arguments for the tool.\n\
             If you decide to respond directly to the user then make the action \"respond_to_user\" \
             with args as your response in the following format.\n\n\
             Response Format:\n\
             {{\"action\": \"\", \"args\": \"\"}}",
            transcript = self.memory.transcript(),
        )
    }
}

/// Unwrap mapping args for direct handler use.
///
/// `None` only for an empty mapping, which has no value to forward.
fn unwrap_handler_args(args: &serde_json::Value) -> Option<serde_json::Value> {
    let serde_json::Value::Object(map) = args else {
        return Some(args.clone());
    };

    if let Some(location) = map.get("location") {
        return Some(location.clone());
    }

    let (_, first) = map.iter().next()?;
    let text = match first {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    Some(serde_json::Value::String(text))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
