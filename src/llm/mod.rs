//! LLM — OpenAI-compatible chat-completion access.
//!
//! This module handles all communication with the language model:
//! - The `LanguageModel` trait the agent core depends on
//! - The concrete `OpenAiClient` (works against any compatible endpoint)
//! - Reply cleaning (code fences, stray backticks)
//! - Configuration from `OPENAI_*` environment variables
//!
//! Pointing the assistant at Ollama or another local server is a config
//! change (`OPENAI_BASE_URL`), not a code change.

pub mod client;
pub mod config;
pub mod errors;

// Re-exports for convenience
pub use client::{clean_reply, LanguageModel, OpenAiClient};
pub use config::LlmConfig;
pub use errors::LlmError;
