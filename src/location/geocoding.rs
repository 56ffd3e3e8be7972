//! Open-Meteo geocoding client.
//!
//! One trait seam (`Geocoding`) so the resolver and tools can be exercised
//! with scripted lookups in tests, and one concrete client for the real API.
//! Zero matches is a normal outcome here — only transport problems fail.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::errors::LocationError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Open-Meteo place-name search endpoint.
const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

// ─── Types ───────────────────────────────────────────────────────────────────

/// A single geocoding match.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// IANA timezone identifier (e.g. "Europe/London").
    #[serde(default)]
    pub timezone: Option<String>,
}

impl LocationInfo {
    /// "Name, Country" when the country is known, otherwise just the name.
    pub fn display_name(&self) -> String {
        match self.country.as_deref() {
            Some(country) if !country.is_empty() => format!("{}, {}", self.name, country),
            _ => self.name.clone(),
        }
    }
}

/// Outcome of one geocoding query: the best match (if any) plus the raw
/// response body, kept so "no match" errors can carry the API's answer.
#[derive(Debug, Clone)]
pub struct GeocodingOutcome {
    pub result: Option<LocationInfo>,
    pub raw_body: String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Boundary contract for place-name search.
#[async_trait]
pub trait Geocoding: Send + Sync {
    /// Look up a place name, returning at most the best match.
    async fn search(&self, name: &str) -> Result<GeocodingOutcome, LocationError>;
}

// ─── Open-Meteo Client ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<LocationInfo>,
}

/// Client for the Open-Meteo geocoding API.
pub struct OpenMeteoGeocoding {
    http: HttpClient,
}

impl OpenMeteoGeocoding {
    pub fn new() -> Self {
        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self { http }
    }
}

impl Default for OpenMeteoGeocoding {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoding for OpenMeteoGeocoding {
    async fn search(&self, name: &str) -> Result<GeocodingOutcome, LocationError> {
        let response = self
            .http
            .get(GEOCODING_URL)
            .query(&[("name", name), ("count", "1")])
            .send()
            .await
            .map_err(|e| LocationError::LookupFailed {
                location: name.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(|e| LocationError::LookupFailed {
                location: name.to_string(),
                reason: format!("failed to read response body: {e}"),
            })?;

        if !status.is_success() {
            return Err(LocationError::LookupFailed {
                location: name.to_string(),
                reason: format!("HTTP {}: {raw_body}", status.as_u16()),
            });
        }

        let parsed: SearchResponse =
            serde_json::from_str(&raw_body).map_err(|e| LocationError::LookupFailed {
                location: name.to_string(),
                reason: format!("invalid geocoding payload: {e}"),
            })?;

        Ok(GeocodingOutcome {
            result: parsed.results.into_iter().next(),
            raw_body,
        })
    }
}
