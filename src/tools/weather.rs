//! Weather capability — current conditions for a place name.
//!
//! Geocodes through its own `LocationResolver` (per-tool cache), fetches the
//! current block from the forecast API, and renders a fixed multi-line
//! report stamped with the location's local time.

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;

use crate::location::{Geocoding, LocationResolver, OpenMeteoGeocoding};

use super::forecast::{CurrentConditions, Forecast, OpenMeteoForecast};
use super::{location_from_args, CapabilityHandler, ToolError};

/// Human-readable label for a WMO weather code.
fn weather_description(code: u16) -> &'static str {
    match code {
        0 => "clear sky",
        1 => "mainly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 => "foggy",
        48 => "depositing rime fog",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        71 => "slight snow",
        73 => "moderate snow",
        75 => "heavy snow",
        77 => "snow grains",
        95 => "thunderstorm",
        96 => "thunderstorm with slight hail",
        99 => "thunderstorm with heavy hail",
        _ => "unknown",
    }
}

/// Current wall-clock time in an IANA zone, rendered like "03:41 PM".
fn local_time_in(zone_name: &str) -> Option<String> {
    let zone = Tz::from_str(zone_name).ok()?;
    Some(Utc::now().with_timezone(&zone).format("%I:%M %p").to_string())
}

/// Fixed report layout; precipitation only appears when there is any.
fn render_report(loc_name: &str, local_time: &str, current: &CurrentConditions) -> String {
    let mut report = format!(
        "Weather in {loc_name} at {local_time}:\n\
         Temperature: {}°C (feels like {}°C)\n\
         Conditions: {}\n\
         Humidity: {}%\n\
         Wind Speed: {} km/h",
        current.temperature_2m,
        current.apparent_temperature,
        weather_description(current.weather_code),
        current.relative_humidity_2m,
        current.wind_speed_10m,
    );

    if current.precipitation > 0.0 {
        report.push_str(&format!("\nPrecipitation: {} mm", current.precipitation));
    }

    report
}

/// Reports current weather for a location.
pub struct WeatherTool {
    resolver: tokio::sync::Mutex<LocationResolver>,
    forecast: Arc<dyn Forecast>,
}

impl WeatherTool {
    /// Tool backed by the live Open-Meteo APIs.
    pub fn new() -> Self {
        Self::with_clients(
            Arc::new(OpenMeteoGeocoding::new()),
            Arc::new(OpenMeteoForecast::new()),
        )
    }

    /// Tool with injected lookup clients.
    pub fn with_clients(geocoding: Arc<dyn Geocoding>, forecast: Arc<dyn Forecast>) -> Self {
        Self {
            resolver: tokio::sync::Mutex::new(LocationResolver::new(geocoding)),
            forecast,
        }
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityHandler for WeatherTool {
    fn identifier(&self) -> &str {
        "weather_tool"
    }

    fn description(&self) -> &str {
        "Provides current weather information for a given location."
    }

    async fn invoke(&self, args: &serde_json::Value) -> Result<String, ToolError> {
        let location = location_from_args(args);

        let info = match self.resolver.lock().await.get_info(&location).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "weather location lookup failed");
                return Ok(format!("Sorry, I couldn't find the location: {location}"));
            }
        };

        let forecast = match self.forecast.current(info.latitude, info.longitude).await {
            Ok(forecast) => forecast,
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "forecast fetch failed");
                return Ok(format!("Sorry, I couldn't get weather data for {location}"));
            }
        };

        match local_time_in(&forecast.timezone) {
            Some(local_time) => Ok(render_report(
                &info.display_name(),
                &local_time,
                &forecast.current,
            )),
            None => {
                tracing::error!(
                    location = %location,
                    timezone = %forecast.timezone,
                    "forecast returned an unusable timezone"
                );
                Ok("Sorry, I encountered an error getting the weather information.".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{GeocodingOutcome, LocationError, LocationInfo};
    use crate::tools::forecast::CurrentForecast;
    use serde_json::json;

    /// Geocoding double: one fixed match for every query.
    struct OneHit(LocationInfo);

    #[async_trait]
    impl Geocoding for OneHit {
        async fn search(&self, _name: &str) -> Result<GeocodingOutcome, LocationError> {
            Ok(GeocodingOutcome {
                result: Some(self.0.clone()),
                raw_body: String::new(),
            })
        }
    }

    /// Geocoding double: never matches.
    struct NoHit;

    #[async_trait]
    impl Geocoding for NoHit {
        async fn search(&self, _name: &str) -> Result<GeocodingOutcome, LocationError> {
            Ok(GeocodingOutcome {
                result: None,
                raw_body: "{}".to_string(),
            })
        }
    }

    /// Forecast double returning fixed conditions.
    struct FixedForecast(CurrentForecast);

    #[async_trait]
    impl Forecast for FixedForecast {
        async fn current(&self, _lat: f64, _lon: f64) -> Result<CurrentForecast, ToolError> {
            Ok(self.0.clone())
        }
    }

    /// Forecast double that always fails.
    struct BrokenForecast;

    #[async_trait]
    impl Forecast for BrokenForecast {
        async fn current(&self, _lat: f64, _lon: f64) -> Result<CurrentForecast, ToolError> {
            Err(ToolError::Lookup {
                reason: "HTTP 503: unavailable".to_string(),
            })
        }
    }

    fn london() -> LocationInfo {
        LocationInfo {
            name: "London".to_string(),
            country: Some("United Kingdom".to_string()),
            latitude: 51.5,
            longitude: -0.12,
            timezone: Some("Europe/London".to_string()),
        }
    }

    fn rainy() -> CurrentForecast {
        CurrentForecast {
            current: CurrentConditions {
                temperature_2m: 12.4,
                relative_humidity_2m: 81.0,
                apparent_temperature: 10.8,
                precipitation: 0.2,
                weather_code: 61,
                wind_speed_10m: 14.5,
            },
            timezone: "Europe/London".to_string(),
        }
    }

    // ── weather_description tests ──

    #[test]
    fn test_weather_description_table() {
        assert_eq!(weather_description(0), "clear sky");
        assert_eq!(weather_description(45), "foggy");
        assert_eq!(weather_description(61), "slight rain");
        assert_eq!(weather_description(95), "thunderstorm");
        assert_eq!(weather_description(99), "thunderstorm with heavy hail");
    }

    #[test]
    fn test_weather_description_unknown_code() {
        assert_eq!(weather_description(42), "unknown");
    }

    // ── rendering tests ──

    #[test]
    fn test_render_report_with_precipitation() {
        let expected = "Weather in London, United Kingdom at 03:41 PM:\n\
                        Temperature: 12.4°C (feels like 10.8°C)\n\
                        Conditions: slight rain\n\
                        Humidity: 81%\n\
                        Wind Speed: 14.5 km/h\n\
                        Precipitation: 0.2 mm";
        assert_eq!(
            render_report("London, United Kingdom", "03:41 PM", &rainy().current),
            expected
        );
    }

    #[test]
    fn test_render_report_omits_zero_precipitation() {
        let mut current = rainy().current;
        current.precipitation = 0.0;
        current.weather_code = 0;

        let report = render_report("Tokyo, Japan", "09:00 AM", &current);
        assert!(report.contains("Conditions: clear sky"));
        assert!(!report.contains("Precipitation"));
    }

    #[test]
    fn test_local_time_in_known_zone() {
        let time = local_time_in("Europe/London").unwrap();
        assert!(time.ends_with("AM") || time.ends_with("PM"), "time: {time}");
    }

    #[test]
    fn test_local_time_in_bad_zone() {
        assert!(local_time_in("Not/AZone").is_none());
    }

    // ── invoke tests ──

    #[tokio::test]
    async fn test_invoke_reports_current_conditions() {
        let tool = WeatherTool::with_clients(
            Arc::new(OneHit(london())),
            Arc::new(FixedForecast(rainy())),
        );

        let reply = tool.invoke(&json!("London")).await.unwrap();
        assert!(reply.starts_with("Weather in London, United Kingdom at "));
        assert!(reply.contains("Conditions: slight rain"));
        assert!(reply.contains("Precipitation: 0.2 mm"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_location_apologizes() {
        let tool =
            WeatherTool::with_clients(Arc::new(NoHit), Arc::new(FixedForecast(rainy())));

        let reply = tool.invoke(&json!("Atlantis")).await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't find the location: Atlantis");
    }

    #[tokio::test]
    async fn test_invoke_forecast_failure_apologizes() {
        let tool = WeatherTool::with_clients(Arc::new(OneHit(london())), Arc::new(BrokenForecast));

        let reply = tool.invoke(&json!("London")).await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't get weather data for London");
    }

    #[tokio::test]
    async fn test_invoke_unusable_timezone_is_generic_apology() {
        let mut forecast = rainy();
        forecast.timezone = "Not/AZone".to_string();
        let tool =
            WeatherTool::with_clients(Arc::new(OneHit(london())), Arc::new(FixedForecast(forecast)));

        let reply = tool.invoke(&json!("London")).await.unwrap();
        assert_eq!(
            reply,
            "Sorry, I encountered an error getting the weather information."
        );
    }
}
