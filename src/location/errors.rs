//! Location error types.
//!
//! All errors implement `std::error::Error` via `thiserror`. Structured logging
//! is the caller's responsibility — these types carry the context needed to
//! build meaningful log entries.

use thiserror::Error;

/// Errors that can occur while validating or resolving a place name.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The caller supplied an empty (or all-whitespace) location string.
    #[error("Location cannot be empty")]
    EmptyInput,

    /// The geocoding service answered normally but had no match for the query.
    #[error("Could not find location: {location}")]
    NotFound {
        location: String,
        /// Raw geocoding response body, kept as diagnostic detail.
        api_response: String,
    },

    /// The geocoding request itself failed (connection, timeout, bad payload).
    #[error("Failed to validate location: {reason}")]
    LookupFailed {
        location: String,
        reason: String,
    },

    /// A just-validated location was expected in the cache but is missing.
    ///
    /// Validation caches under the trimmed key while `get_info` reads back
    /// under the caller's raw key, so untrimmed input can trip this.
    #[error("Location not found in cache: {location}")]
    MissingFromCache {
        location: String,
    },
}

impl LocationError {
    /// Check if retrying with a different query string could succeed.
    ///
    /// Empty input and no-match outcomes are user-correctable; transport
    /// failures and cache inconsistencies are not.
    pub fn is_retryable_input(&self) -> bool {
        matches!(
            self,
            LocationError::EmptyInput | LocationError::NotFound { .. }
        )
    }
}
