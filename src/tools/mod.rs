//! Tools — the concrete capability handlers behind the agents.
//!
//! Submodules:
//! - `weather`: Current conditions via the Open-Meteo forecast API
//! - `time`: Local time lookup via geocoded IANA timezones
//! - `clothing`: Outfit recommendations from temperature/conditions/wind
//! - `forecast`: `Forecast` trait seam plus the Open-Meteo forecast client
//!
//! Handlers never fail outward for "no data" cases — they return apologetic
//! text in the `Sorry, I couldn't…` register instead. The `Result` in the
//! trait is for implementations that do want strict propagation.

use async_trait::async_trait;
use thiserror::Error;

pub mod clothing;
pub mod forecast;
pub mod time;
pub mod weather;

// Re-exports for convenience
pub use clothing::ClothingTool;
pub use forecast::{CurrentConditions, CurrentForecast, Forecast, OpenMeteoForecast};
pub use time::TimeTool;
pub use weather::WeatherTool;

/// Errors a capability handler (or its lookup client) can produce.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A data lookup failed (connection, timeout, bad payload).
    #[error("lookup failed: {reason}")]
    Lookup { reason: String },
}

/// A named, described unit of work an agent can dispatch to.
#[async_trait]
pub trait CapabilityHandler: Send + Sync {
    /// Stable identifier the model echoes back as the `action` field.
    fn identifier(&self) -> &str;

    /// One-line capability summary shown to the model.
    fn description(&self) -> &str;

    /// Run the capability against parsed action arguments.
    async fn invoke(&self, args: &serde_json::Value) -> Result<String, ToolError>;
}

/// Extract a location string from handler args.
///
/// Plain strings pass through; mappings contribute their `location` value.
/// Anything else yields an empty string, which downstream lookups reject
/// with the usual apology.
pub fn location_from_args(args: &serde_json::Value) -> String {
    match args {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Object(map) => map
            .get("location")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_from_string_args() {
        assert_eq!(location_from_args(&json!("London")), "London");
    }

    #[test]
    fn test_location_from_mapping_args() {
        assert_eq!(
            location_from_args(&json!({"location": "Tokyo", "units": "metric"})),
            "Tokyo"
        );
    }

    #[test]
    fn test_location_missing_or_unusable() {
        assert_eq!(location_from_args(&json!({"city": "Oslo"})), "");
        assert_eq!(location_from_args(&json!(42)), "");
        assert_eq!(location_from_args(&serde_json::Value::Null), "");
    }
}
