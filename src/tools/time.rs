//! Time capability — current local time for a place name.
//!
//! Unlike the weather/clothing tools this one geocodes directly (no cache):
//! the interesting output is the zone, which rides along on every geocoding
//! match, so a forecast round-trip is never needed.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;

use crate::location::{Geocoding, LocationInfo, OpenMeteoGeocoding};

use super::{location_from_args, CapabilityHandler, ToolError};

/// "The current time in {place} is {hh:mm AM/PM} ({zone})", or `None` when
/// the zone name does not parse.
fn render_time_line(loc_name: &str, zone_name: &str) -> Option<String> {
    let zone = Tz::from_str(zone_name).ok()?;
    let now = Utc::now().with_timezone(&zone);
    Some(format!(
        "The current time in {loc_name} is {} ({zone_name})",
        now.format("%I:%M %p")
    ))
}

/// Reports the current local time for a location.
pub struct TimeTool {
    geocoding: Arc<dyn Geocoding>,
}

impl TimeTool {
    /// Tool backed by the live Open-Meteo geocoding API.
    pub fn new() -> Self {
        Self::with_client(Arc::new(OpenMeteoGeocoding::new()))
    }

    /// Tool with an injected geocoding client.
    pub fn with_client(geocoding: Arc<dyn Geocoding>) -> Self {
        Self { geocoding }
    }

    /// Find the zone for a place, retrying with the pre-comma prefix.
    ///
    /// All failures collapse to `None` — the caller only distinguishes
    /// "found" from "not found".
    async fn find_zone(&self, location: &str) -> Option<(String, LocationInfo)> {
        // The search endpoint matches "City,Country" more reliably than
        // "City, Country".
        let cleaned = location.replace(", ", ",").trim().to_string();

        let first = match self.geocoding.search(&cleaned).await {
            Ok(outcome) => outcome.result,
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "timezone lookup failed");
                return None;
            }
        };
        if let Some(info) = first {
            return Some((zone_of(&info), info));
        }

        let (city, _) = cleaned.split_once(',')?;
        let city = city.trim();
        if city.is_empty() {
            return None;
        }

        match self.geocoding.search(city).await {
            Ok(outcome) => outcome.result.map(|info| (zone_of(&info), info)),
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "timezone retry failed");
                None
            }
        }
    }
}

fn zone_of(info: &LocationInfo) -> String {
    info.timezone.clone().unwrap_or_else(|| "UTC".to_string())
}

impl Default for TimeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityHandler for TimeTool {
    fn identifier(&self) -> &str {
        "time_tool"
    }

    fn description(&self) -> &str {
        "Provides current time for a given location."
    }

    async fn invoke(&self, args: &serde_json::Value) -> Result<String, ToolError> {
        let location = location_from_args(args);

        let Some((zone_name, info)) = self.find_zone(&location).await else {
            return Ok(format!("Sorry, I couldn't find the location: {location}"));
        };

        match render_time_line(&info.display_name(), &zone_name) {
            Some(line) => Ok(line),
            None => {
                tracing::error!(
                    location = %location,
                    timezone = %zone_name,
                    "geocoding returned an unusable timezone"
                );
                Ok("Sorry, I encountered an error getting the time information.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::location::{GeocodingOutcome, LocationError};
    use serde_json::json;

    /// Scripted geocoding double with a query log (mirrors the resolver tests).
    struct ScriptedGeocoding {
        matches: Vec<(&'static str, LocationInfo)>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedGeocoding {
        fn new(matches: Vec<(&'static str, LocationInfo)>) -> Arc<Self> {
            Arc::new(Self {
                matches,
                queries: Mutex::new(Vec::new()),
            })
        }

        fn queries(&self) -> Vec<String> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Geocoding for ScriptedGeocoding {
        async fn search(&self, name: &str) -> Result<GeocodingOutcome, LocationError> {
            self.queries.lock().unwrap().push(name.to_string());
            let result = self
                .matches
                .iter()
                .find(|(query, _)| *query == name)
                .map(|(_, info)| info.clone());
            Ok(GeocodingOutcome {
                result,
                raw_body: "{}".to_string(),
            })
        }
    }

    fn tokyo() -> LocationInfo {
        LocationInfo {
            name: "Tokyo".to_string(),
            country: Some("Japan".to_string()),
            latitude: 35.69,
            longitude: 139.69,
            timezone: Some("Asia/Tokyo".to_string()),
        }
    }

    // ── rendering tests ──

    #[test]
    fn test_render_time_line_shape() {
        let line = render_time_line("Tokyo, Japan", "Asia/Tokyo").unwrap();
        assert!(line.starts_with("The current time in Tokyo, Japan is "));
        assert!(line.ends_with("(Asia/Tokyo)"));
        assert!(line.contains("AM") || line.contains("PM"));
    }

    #[test]
    fn test_render_time_line_bad_zone() {
        assert!(render_time_line("Nowhere", "Not/AZone").is_none());
    }

    // ── invoke tests ──

    #[tokio::test]
    async fn test_invoke_reports_local_time() {
        let geo = ScriptedGeocoding::new(vec![("Tokyo", tokyo())]);
        let tool = TimeTool::with_client(geo);

        let reply = tool.invoke(&json!("Tokyo")).await.unwrap();
        assert!(reply.starts_with("The current time in Tokyo, Japan is "));
        assert!(reply.ends_with("(Asia/Tokyo)"));
    }

    #[tokio::test]
    async fn test_invoke_compacts_comma_spacing() {
        let geo = ScriptedGeocoding::new(vec![("Tokyo,Japan", tokyo())]);
        let tool = TimeTool::with_client(geo.clone());

        let reply = tool.invoke(&json!("Tokyo, Japan")).await.unwrap();
        assert!(reply.contains("Asia/Tokyo"));
        assert_eq!(geo.queries(), vec!["Tokyo,Japan"]);
    }

    #[tokio::test]
    async fn test_invoke_retries_with_city_prefix() {
        let geo = ScriptedGeocoding::new(vec![("Tokyo", tokyo())]);
        let tool = TimeTool::with_client(geo.clone());

        let reply = tool.invoke(&json!("Tokyo, Nowhereshire")).await.unwrap();
        assert!(reply.contains("(Asia/Tokyo)"));
        assert_eq!(geo.queries(), vec!["Tokyo,Nowhereshire", "Tokyo"]);
    }

    #[tokio::test]
    async fn test_invoke_unknown_location_apologizes() {
        let geo = ScriptedGeocoding::new(vec![]);
        let tool = TimeTool::with_client(geo);

        let reply = tool.invoke(&json!("Atlantis")).await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't find the location: Atlantis");
    }

    #[tokio::test]
    async fn test_invoke_defaults_missing_zone_to_utc() {
        let mut info = tokyo();
        info.timezone = None;
        let geo = ScriptedGeocoding::new(vec![("Tokyo", info)]);
        let tool = TimeTool::with_client(geo);

        let reply = tool.invoke(&json!("Tokyo")).await.unwrap();
        assert!(reply.ends_with("(UTC)"));
    }
}
