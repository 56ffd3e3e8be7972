//! Orchestrator — request classification, location context, and fan-out.
//!
//! Every user request flows through `route`:
//!
//! 1. Bare negative acknowledgements short-circuit with a friendly sign-off
//! 2. The turn lands in shared bounded memory
//! 3. Keyword scans classify the request (summary? needs a location?)
//! 4. Location resolution ladder: conversation context, then an `in <word>`
//!    extraction from the request, then the interactive prompter (if any)
//! 5. Summary requests fan out to every agent in registration order and the
//!    unique non-empty replies merge into one text
//! 6. Anything else is routed to the single agent the model picks by name
//!
//! `route` never fails outward: routing errors are logged and the user gets
//! an apologetic envelope instead.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::llm::LanguageModel;
use crate::location::LocationResolver;

use super::action::RESPOND_TO_USER;
use super::agent::{Agent, AgentReply};
use super::errors::AgentError;
use super::memory::ConversationMemory;

// ─── Constants ────────────────────────────────────────────────────────────────

/// Bare negative acknowledgements that end an exchange without routing.
const NEGATIVE_ACKS: &[&str] = &["no", "nope", "nothing"];

/// Keywords that classify a request as a summary (fan-out) request.
const SUMMARY_KEYWORDS: &[&str] = &["summarize", "summary", "rundown", "brief", "tell me about"];

/// Keywords that mean a request needs a resolved location.
const LOCATION_KEYWORDS: &[&str] = &["weather", "time", "wear"];

/// Follow-up prompts the interactive loop rotates through.
const FOLLOW_UP_PROMPTS: &[&str] = &[
    "What else would you like to know?",
    "Is there anything else I can help you with?",
    "What other information would be helpful?",
    "Feel free to ask me anything else!",
    "Would you like to know anything else about the weather or what to wear?",
    "I'm here to help - what's on your mind?",
    "Need any other assistance?",
    "Anything else you'd like to check?",
];

/// Phrases that end the interactive loop, matched trimmed and lowercased.
const EXIT_PHRASES: &[&str] = &[
    "exit",
    "bye",
    "quit",
    "no",
    "nope",
    "that's all",
    "that is all",
    "nothing else",
    "i'm good",
    "im good",
    "i am good",
    "thanks",
    "thank you",
    "that's it",
    "that will be all",
];

/// Goodbye messages the interactive loop rotates through.
const GOODBYE_MESSAGES: &[&str] = &[
    "Take care! Have a great day! 👋",
    "Goodbye! Stay warm and stylish! 👋",
    "See you next time! Have a wonderful day! 👋",
    "Thanks for chatting! Stay amazing! ✨",
    "Bye for now! Remember to dress for the weather! 🌤️",
];

// ─── Envelope ────────────────────────────────────────────────────────────────

/// Normalized response every front end receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub action: String,
    pub input: String,
}

impl Envelope {
    /// Envelope carrying plain text back to the user.
    pub fn respond(input: impl Into<String>) -> Self {
        Self {
            action: RESPOND_TO_USER.to_string(),
            input: input.into(),
        }
    }
}

// ─── LocationPrompter ────────────────────────────────────────────────────────

/// Interactive fallback for requests that need a location nothing resolved.
///
/// The terminal front end plugs in a stdin-backed prompter; the HTTP front
/// end plugs in none, so an unresolved location becomes a plain-text reply
/// instead of a blocked service thread.
pub trait LocationPrompter: Send + Sync {
    /// Ask the user for a place name. `retry` is true after a failed
    /// validation; `None` means the prompter has no more input.
    fn request_location(&self, retry: bool) -> Option<String>;
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

/// Routes user requests across a set of specialist agents.
pub struct Orchestrator {
    agents: Vec<Agent>,
    llm: Arc<dyn LanguageModel>,
    memory: ConversationMemory,
    resolver: LocationResolver,
    location: Option<String>,
    prompter: Option<Arc<dyn LocationPrompter>>,
    prompt_index: usize,
    goodbye_index: usize,
}

impl Orchestrator {
    pub fn new(
        agents: Vec<Agent>,
        llm: Arc<dyn LanguageModel>,
        resolver: LocationResolver,
    ) -> Self {
        tracing::info!(agent_count = agents.len(), "initialized orchestrator");
        Self {
            agents,
            llm,
            memory: ConversationMemory::default(),
            resolver,
            location: None,
            prompter: None,
            prompt_index: 0,
            goodbye_index: 0,
        }
    }

    /// Attach an interactive location prompter (terminal front end).
    pub fn with_prompter(mut self, prompter: Arc<dyn LocationPrompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    /// Route one user request to an `{action, input}` envelope.
    ///
    /// Never fails outward: errors are logged and become apologetic text.
    pub async fn route(&mut self, user_text: &str) -> Envelope {
        let lowered = user_text.trim().to_lowercase();
        if NEGATIVE_ACKS.contains(&lowered.as_str()) {
            tracing::debug!("negative acknowledgement, short-circuiting");
            return Envelope::respond("Alright! Let me know if you need anything else! 😊");
        }

        match self.dispatch(user_text).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "request routing failed");
                Envelope::respond("I encountered an error processing your request.")
            }
        }
    }

    async fn dispatch(&mut self, user_text: &str) -> Result<Envelope, AgentError> {
        self.memory.push("User", user_text);

        let lowered = user_text.to_lowercase();
        let is_summary = SUMMARY_KEYWORDS.iter().any(|kw| lowered.contains(kw));
        let needs_location =
            is_summary || LOCATION_KEYWORDS.iter().any(|kw| lowered.contains(kw));
        tracing::debug!(
            summary = is_summary,
            needs_location,
            "classified user request"
        );

        if needs_location {
            let Some(location) = self.resolve_location(user_text).await else {
                return Ok(Envelope::respond(
                    "I need a valid location to provide recommendations.",
                ));
            };
            if is_summary {
                return self.summarize(&location).await;
            }
        }

        self.route_single_intent(user_text).await
    }

    /// Resolution ladder: conversation context, `in <word>` extraction,
    /// then the interactive prompter. `None` when all three come up empty.
    ///
    /// The prompter loop re-asks only for input the user can correct
    /// (empty or unmatched queries); a failed lookup call ends it.
    async fn resolve_location(&mut self, user_text: &str) -> Option<String> {
        if let Some(location) = &self.location {
            tracing::debug!(location = %location, "reusing conversation location");
            return Some(location.clone());
        }

        if let Some(candidate) = extract_location(user_text) {
            match self.resolver.validate_and_normalize(&candidate).await {
                Ok(_) => {
                    tracing::info!(location = %candidate, "location extracted from request");
                    self.location = Some(candidate.clone());
                    return Some(candidate);
                }
                Err(e) => {
                    tracing::debug!(
                        candidate = %candidate,
                        error = %e,
                        "extracted location did not validate"
                    );
                }
            }
        }

        let prompter = self.prompter.clone()?;
        let mut retry = false;
        while let Some(answer) = prompter.request_location(retry) {
            match self.resolver.validate_and_normalize(&answer).await {
                Ok(_) => {
                    let location = answer.trim().to_string();
                    tracing::info!(location = %location, "location provided interactively");
                    self.location = Some(location.clone());
                    return Some(location);
                }
                Err(e) if e.is_retryable_input() => {
                    tracing::debug!(
                        answer = %answer,
                        error = %e,
                        "prompted location did not validate"
                    );
                    retry = true;
                }
                Err(e) => {
                    tracing::error!(answer = %answer, error = %e, "location lookup failed");
                    return None;
                }
            }
        }

        None
    }

    /// Fan a summary request out to every agent, one sub-instruction each.
    async fn summarize(&mut self, location: &str) -> Result<Envelope, AgentError> {
        tracing::info!(location = %location, "fanning out summary request");

        let mut responses = Vec::new();
        for agent in &mut self.agents {
            let Some(instruction) = summary_instruction(agent.name(), location) else {
                tracing::debug!(agent = %agent.name(), "agent takes no part in summaries");
                continue;
            };
            let reply = agent.process_input(&instruction).await?;
            let text = reply_text(reply);
            if !text.is_empty() {
                responses.push(text);
            }
        }

        Ok(Envelope::respond(merge_responses(responses)))
    }

    /// Ask the model which agent owns the request, then delegate to it.
    async fn route_single_intent(&mut self, user_text: &str) -> Result<Envelope, AgentError> {
        let roster = self
            .agents
            .iter()
            .map(|agent| format!("{} ({})", agent.name(), agent.description()))
            .collect::<Vec<_>>()
            .join(", ");

        let prompt = format!(
            "Based on the user's request, which agent should handle it?\n\
             User request: {user_text}\n\
             Available agents: {roster}\n\
             Only return the agent name, nothing else."
        );

        let agent_name = self.llm.query(&prompt).await?.trim().to_string();
        tracing::debug!(agent = %agent_name, "model selected agent");

        let context = self.location.clone();
        for agent in &mut self.agents {
            if agent.name() != agent_name {
                continue;
            }

            let request = match &context {
                Some(location) if !user_text.contains(location.as_str()) => {
                    tracing::debug!(location = %location, "appending location context to request");
                    format!("{user_text} in {location}")
                }
                _ => user_text.to_string(),
            };

            let reply = agent.process_input(&request).await?;
            return Ok(Envelope::respond(reply_text(reply)));
        }

        tracing::warn!(agent = %agent_name, "model picked an unknown agent");
        Ok(Envelope::respond(
            "I'm not sure how to help with that request.",
        ))
    }

    // ─── Interactive-loop State ──────────────────────────────────────────────

    /// Next follow-up prompt, advancing the rotation.
    pub fn next_follow_up(&mut self) -> &'static str {
        let prompt = FOLLOW_UP_PROMPTS[self.prompt_index];
        self.prompt_index = (self.prompt_index + 1) % FOLLOW_UP_PROMPTS.len();
        prompt
    }

    /// Next goodbye message, advancing the rotation.
    pub fn next_goodbye(&mut self) -> &'static str {
        let message = GOODBYE_MESSAGES[self.goodbye_index];
        self.goodbye_index = (self.goodbye_index + 1) % GOODBYE_MESSAGES.len();
        message
    }

    /// Check a line against the exit-phrase table, trimmed and lowercased.
    pub fn is_exit_phrase(&self, text: &str) -> bool {
        let lowered = text.trim().to_lowercase();
        EXIT_PHRASES.contains(&lowered.as_str())
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Pull a candidate place name out of an `in <word>` phrase.
///
/// Takes the first whitespace token after the literal word "in", trimming
/// trailing punctuation. `None` when the phrase is absent or dangling.
fn extract_location(text: &str) -> Option<String> {
    let mut words = text.split_whitespace();
    while let Some(word) = words.next() {
        if word == "in" {
            return words
                .next()
                .map(|token| token.trim_end_matches([',', '.', '!', '?']).to_string())
                .filter(|token| !token.is_empty());
        }
    }
    None
}

/// The sub-instruction an agent receives during a summary fan-out.
///
/// Agents outside the known trio take no part in summaries.
fn summary_instruction(agent_name: &str, location: &str) -> Option<String> {
    match agent_name {
        "Weather Agent" => Some(format!("Get weather for {location}")),
        "Time Agent" => Some(format!("Get time for {location}")),
        "Clothing Agent" => Some(format!("What should I wear in {location}")),
        _ => None,
    }
}

/// Join unique non-empty agent responses, first-seen order preserved.
fn merge_responses(responses: Vec<String>) -> String {
    if responses.is_empty() {
        return "I apologize, but I couldn't process your request.".to_string();
    }

    let mut unique: Vec<String> = Vec::new();
    for response in responses {
        if !unique.contains(&response) {
            unique.push(response);
        }
    }
    unique.join(" ")
}

/// Render an agent reply as user-facing text.
fn reply_text(reply: AgentReply) -> String {
    match reply {
        AgentReply::Text(text) => text,
        AgentReply::Action(action) if action.is_respond_to_user() => action.args_text(),
        AgentReply::Action(action) => serde_json::to_string(&action).unwrap_or_default(),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
