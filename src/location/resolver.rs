//! Place-name validation and caching.
//!
//! `LocationResolver` sits between callers and the geocoding API:
//!
//! 1. Trims input and rejects empty strings.
//! 2. Serves repeat lookups from an in-memory cache (keyed by the trimmed
//!    caller string, never by the rewritten lookup string).
//! 3. Expands country-code suffixes ("London, UK" → "London, United Kingdom")
//!    for the lookup only.
//! 4. Retries with the pre-comma prefix when the full string has no match.
//!
//! Negative results are never cached, and the cache never expires — it lives
//! exactly as long as the owning conversation.

use std::collections::HashMap;
use std::sync::Arc;

use super::country_codes::normalize_country_suffix;
use super::errors::LocationError;
use super::geocoding::{Geocoding, LocationInfo, OpenMeteoGeocoding};

/// Validates free-text place names and caches successful lookups.
pub struct LocationResolver {
    geocoding: Arc<dyn Geocoding>,
    cache: HashMap<String, LocationInfo>,
}

impl LocationResolver {
    pub fn new(geocoding: Arc<dyn Geocoding>) -> Self {
        Self {
            geocoding,
            cache: HashMap::new(),
        }
    }

    /// Resolver backed by the live Open-Meteo geocoding API.
    pub fn open_meteo() -> Self {
        Self::new(Arc::new(OpenMeteoGeocoding::new()))
    }

    /// Validate a place name, caching the result for reuse.
    ///
    /// Returns `Ok(true)` when the name resolves (possibly from cache).
    /// Failure is always a typed error — there is no `Ok(false)` path; the
    /// bool return mirrors how call sites read (`if resolver.validate…`).
    pub async fn validate_and_normalize(
        &mut self,
        location: &str,
    ) -> Result<bool, LocationError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(LocationError::EmptyInput);
        }

        if self.cache.contains_key(trimmed) {
            tracing::debug!(location = %trimmed, "location cache hit");
            return Ok(true);
        }

        let lookup = normalize_country_suffix(trimmed);
        let mut outcome = self.geocoding.search(&lookup).await?;

        // The full string may over-constrain the search ("Springfield,
        // Atlantis"); the city alone often still resolves.
        if outcome.result.is_none() {
            if let Some((prefix, _)) = trimmed.split_once(',') {
                let prefix = prefix.trim();
                if !prefix.is_empty() {
                    tracing::debug!(
                        original = %lookup,
                        retry = %prefix,
                        "no geocoding match, retrying with pre-comma prefix"
                    );
                    outcome = self.geocoding.search(prefix).await?;
                }
            }
        }

        match outcome.result {
            Some(info) => {
                tracing::info!(
                    location = %trimmed,
                    resolved = %info.display_name(),
                    "location validated"
                );
                self.cache.insert(trimmed.to_string(), info);
                Ok(true)
            }
            None => Err(LocationError::NotFound {
                location: trimmed.to_string(),
                api_response: outcome.raw_body,
            }),
        }
    }

    /// Validate (as a side effect) and return the cached record.
    ///
    /// Reads back under the caller's raw key; validation stores under the
    /// trimmed key, so untrimmed input fails the read-back check.
    pub async fn get_info(&mut self, location: &str) -> Result<LocationInfo, LocationError> {
        self.validate_and_normalize(location).await?;

        self.cache
            .get(location)
            .cloned()
            .ok_or_else(|| LocationError::MissingFromCache {
                location: location.to_string(),
            })
    }

    /// Drop every cached entry.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
