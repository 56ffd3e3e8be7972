//! Language-model error types.

use thiserror::Error;

/// Errors that can occur while querying the chat-completion endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured.
    #[error("OPENAI_API_KEY environment variable not set")]
    MissingApiKey,

    /// TCP/HTTP connection to the completion endpoint failed.
    #[error("connection failed to {endpoint}: {reason}")]
    ConnectionFailed {
        endpoint: String,
        reason: String,
    },

    /// The endpoint did not respond within the configured timeout.
    #[error("completion timeout after {duration_secs}s")]
    Timeout {
        duration_secs: u64,
    },

    /// Non-2xx HTTP response from the completion endpoint.
    #[error("HTTP {status}: {body}")]
    HttpError {
        status: u16,
        body: String,
    },

    /// The response body was not a usable chat completion.
    #[error("malformed completion: {reason}")]
    MalformedCompletion {
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_message() {
        assert_eq!(
            LlmError::MissingApiKey.to_string(),
            "OPENAI_API_KEY environment variable not set"
        );
    }

    #[test]
    fn test_http_error_carries_status_and_body() {
        let err = LlmError::HttpError {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 429: rate limited");
    }
}
