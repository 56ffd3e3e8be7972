//! OpenAI-compatible chat-completion client.
//!
//! Sends one user-role message per call and returns the assistant's text,
//! cleaned of markdown code fences. Both the agent tool-selection loop and
//! the orchestrator's intent classification go through the `LanguageModel`
//! trait so tests can script replies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::config::LlmConfig;
use super::errors::LlmError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Completion budget — replies here are tool selections or one-liners.
const MAX_TOKENS: u32 = 150;

/// Low temperature keeps action JSON and agent names deterministic.
const TEMPERATURE: f32 = 0.2;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Boundary contract for language-model queries.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one user prompt and return the cleaned reply text.
    async fn query(&self, prompt: &str) -> Result<String, LlmError>;
}

// ─── Wire Types ──────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

// ─── OpenAiClient ────────────────────────────────────────────────────────────

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: HttpClient,
    config: LlmConfig,
}

impl OpenAiClient {
    /// Create a client from resolved configuration.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::ConnectionFailed {
                endpoint: config.base_url.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { http, config })
    }

    /// Create a client from `OPENAI_*` environment variables.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// The model name sent with each request.
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn query(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        tracing::debug!(
            url = %url,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout {
                        duration_secs: REQUEST_TIMEOUT.as_secs(),
                    }
                } else {
                    LlmError::ConnectionFailed {
                        endpoint: url.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        let body_text = response
            .text()
            .await
            .map_err(|e| LlmError::MalformedCompletion {
                reason: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let content = extract_content(&body_text)?;
        Ok(clean_reply(&content))
    }
}

// ─── Response Cleaning ───────────────────────────────────────────────────────

/// Pull the first choice's message text out of a completion body.
fn extract_content(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedCompletion {
            reason: format!("invalid completion JSON: {e}"),
        })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| LlmError::MalformedCompletion {
            reason: "completion contained no choices".to_string(),
        })
}

/// Strip markdown code fences and stray backticks from a model reply.
///
/// Models asked for JSON routinely wrap it in ```json fences; surrounding
/// prose is preserved, only the fence markers go.
pub fn clean_reply(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(start) = rest.find("```") {
        cleaned.push_str(&rest[..start]);
        let after = &rest[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        let after = after.strip_prefix('\n').unwrap_or(after);

        match after.find("```") {
            Some(end) => {
                let body = &after[..end];
                cleaned.push_str(body.strip_suffix('\n').unwrap_or(body));
                rest = &after[end + 3..];
            }
            None => {
                // Unterminated fence: drop the marker, keep the text.
                rest = after;
            }
        }
    }
    cleaned.push_str(rest);

    cleaned.replace('`', "").trim().to_string()
}
