//! Language-model configuration from the environment.
//!
//! Three variables, one required:
//! - `OPENAI_API_KEY` — bearer token (required)
//! - `OPENAI_BASE_URL` — endpoint base, any OpenAI-compatible server
//! - `LLM_MODEL` — model name sent with each request

use super::errors::LlmError;

/// Default completion endpoint base.
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model when `LLM_MODEL` is unset.
const DEFAULT_MODEL: &str = "gpt-4o";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl LlmConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_parts(
            std::env::var("OPENAI_API_KEY").ok(),
            std::env::var("OPENAI_BASE_URL").ok(),
            std::env::var("LLM_MODEL").ok(),
        )
    }

    /// Build a configuration from optional raw values.
    ///
    /// Blank strings count as unset. The base URL is normalized without a
    /// trailing slash so path joins stay predictable.
    pub fn from_parts(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, LlmError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let base_url = base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config = LlmConfig::from_parts(Some("sk-test".into()), None, None).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = LlmConfig::from_parts(None, None, None).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn test_blank_api_key_is_an_error() {
        let err = LlmConfig::from_parts(Some("   ".into()), None, None).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let config = LlmConfig::from_parts(
            Some("sk-test".into()),
            Some("http://localhost:11434/v1/".into()),
            Some("llama3".into()),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn test_blank_overrides_fall_back_to_defaults() {
        let config =
            LlmConfig::from_parts(Some("sk-test".into()), Some("".into()), Some(" ".into()))
                .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
    }
}
