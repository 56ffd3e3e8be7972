//! Structured action parsing.
//!
//! Agents ask the model to answer with a JSON mapping:
//! `{"action": "<tool name or respond_to_user>", "args": <anything>}`.
//! Models don't always comply — common slips are Python-literal syntax
//! (single quotes, `True`/`False`/`None`) instead of JSON. Parsing runs in
//! two stages, first match wins:
//!
//! 1. Strict: the trimmed reply parses as JSON directly
//! 2. Relaxed: quote and keyword repairs turn a Python-style literal into
//!    JSON, then the result goes through the strict parser again
//!
//! Either way the final value must be a mapping with a string `action`;
//! a missing `args` defaults to null. Anything else is a typed parse error
//! that keeps the raw reply for diagnostics.

use serde::{Deserialize, Serialize};

use super::errors::AgentError;

/// Action name models use to answer the user directly instead of a tool.
pub const RESPOND_TO_USER: &str = "respond_to_user";

// ─── StructuredAction ────────────────────────────────────────────────────────

/// One parsed `{action, args}` instruction from a model reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredAction {
    /// Handler identifier to dispatch, or `respond_to_user`.
    pub action: String,
    /// Handler arguments; null when the reply carried none.
    #[serde(default)]
    pub args: serde_json::Value,
}

impl StructuredAction {
    pub fn is_respond_to_user(&self) -> bool {
        self.action == RESPOND_TO_USER
    }

    /// The args rendered as user-facing text.
    ///
    /// String args pass through unchanged; null becomes empty; anything
    /// else is rendered as compact JSON.
    pub fn args_text(&self) -> String {
        match &self.args {
            serde_json::Value::String(text) => text.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a raw model reply into a `StructuredAction`.
pub fn parse_action(reply: &str) -> Result<StructuredAction, AgentError> {
    let trimmed = reply.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return action_from_value(value, trimmed);
    }

    let relaxed = relax_python_literal(trimmed);
    match serde_json::from_str::<serde_json::Value>(&relaxed) {
        Ok(value) => action_from_value(value, trimmed),
        Err(e) => Err(AgentError::UnparsableReply {
            reply: trimmed.to_string(),
            reason: format!("not valid JSON, even after relaxed repairs: {e}"),
        }),
    }
}

/// Validate the parsed value: must be a mapping with a string `action`.
fn action_from_value(
    value: serde_json::Value,
    reply: &str,
) -> Result<StructuredAction, AgentError> {
    let Some(map) = value.as_object() else {
        return Err(AgentError::UnparsableReply {
            reply: reply.to_string(),
            reason: "reply is not a mapping".to_string(),
        });
    };

    let Some(action) = map.get("action").and_then(|a| a.as_str()) else {
        return Err(AgentError::UnparsableReply {
            reply: reply.to_string(),
            reason: "mapping has no string 'action' field".to_string(),
        });
    };

    let args = map.get("args").cloned().unwrap_or(serde_json::Value::Null);

    Ok(StructuredAction {
        action: action.to_string(),
        args,
    })
}

/// Repair a Python-style literal into JSON.
///
/// Swaps single quotes for double quotes, then rewrites bare `True`,
/// `False`, and `None` keywords outside string literals. Text containing
/// apostrophes defeats the quote swap; such replies only survive the
/// strict stage.
fn relax_python_literal(text: &str) -> String {
    replace_bare_keywords(&text.replace('\'', "\""))
}

/// Rewrite bare Python keyword literals outside of string literals.
fn replace_bare_keywords(text: &str) -> String {
    const KEYWORDS: [(&str, &str); 3] = [("True", "true"), ("False", "false"), ("None", "null")];

    fn is_ident(byte: Option<&u8>) -> bool {
        matches!(byte, Some(&b) if b.is_ascii_alphanumeric() || b == b'_')
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'"' && (i == 0 || bytes[i - 1] != b'\\') {
            in_string = !in_string;
        }

        if !in_string && !is_ident(i.checked_sub(1).and_then(|prev| bytes.get(prev))) {
            let keyword_hit = KEYWORDS
                .iter()
                .find(|(keyword, _)| text[i..].starts_with(keyword))
                .filter(|(keyword, _)| !is_ident(bytes.get(i + keyword.len())));
            if let Some((keyword, json)) = keyword_hit {
                out.push_str(json);
                i += keyword.len();
                continue;
            }
        }

        // Copy the full character; keywords and quotes are ASCII but the
        // surrounding text may not be.
        match text[i..].chars().next() {
            Some(c) => {
                out.push(c);
                i += c.len_utf8();
            }
            None => break,
        }
    }

    out
}

// ─── Tests ────────────────────────────────────────────────────────────────────
