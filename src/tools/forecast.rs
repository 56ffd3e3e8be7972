//! Open-Meteo forecast client.
//!
//! One trait seam (`Forecast`) shared by the weather and clothing tools so
//! tests can script conditions, and one concrete client for the real API.
//! Requests `timezone=auto` so the response names the location's IANA zone.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;

use super::ToolError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// TCP connection timeout.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Total request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Open-Meteo forecast endpoint.
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Current-conditions fields requested on every call. The clothing tool
/// only reads three of them; one superset query keeps the seam single.
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
precipitation,weather_code,wind_speed_10m";

// ─── Types ───────────────────────────────────────────────────────────────────

/// The `current` block of a forecast response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub precipitation: f64,
    pub weather_code: u16,
    pub wind_speed_10m: f64,
}

/// A forecast snapshot: current conditions plus the location's zone.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentForecast {
    pub current: CurrentConditions,
    /// IANA zone resolved by `timezone=auto`; "UTC" when the API omits it.
    pub timezone: String,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Boundary contract for current-conditions lookups.
#[async_trait]
pub trait Forecast: Send + Sync {
    async fn current(&self, latitude: f64, longitude: f64)
        -> Result<CurrentForecast, ToolError>;
}

// ─── Open-Meteo Client ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
    #[serde(default)]
    timezone: Option<String>,
}

/// Client for the Open-Meteo forecast API.
pub struct OpenMeteoForecast {
    http: HttpClient,
}

impl OpenMeteoForecast {
    pub fn new() -> Self {
        let http = HttpClient::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self { http }
    }
}

impl Default for OpenMeteoForecast {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Forecast for OpenMeteoForecast {
    async fn current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentForecast, ToolError> {
        let response = self
            .http
            .get(FORECAST_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(|e| ToolError::Lookup {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Lookup {
                reason: format!("HTTP {}: {body}", status.as_u16()),
            });
        }

        let parsed: ForecastResponse =
            response.json().await.map_err(|e| ToolError::Lookup {
                reason: format!("invalid forecast payload: {e}"),
            })?;

        let current = parsed.current.ok_or_else(|| ToolError::Lookup {
            reason: "forecast response missing current block".to_string(),
        })?;

        Ok(CurrentForecast {
            current,
            timezone: parsed.timezone.unwrap_or_else(|| "UTC".to_string()),
        })
    }
}
