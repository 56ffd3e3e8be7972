//! Clothing capability — outfit recommendations from current weather.
//!
//! Temperature picks a base outfit (five bands), then conditions adjust it:
//! rain adds a rain jacket and umbrella, snow adds snow gear, strong wind
//! adds a windbreaker. Categories render in table order; an adjustment that
//! introduces a missing category appends it at the end.

use std::sync::Arc;

use async_trait::async_trait;

use crate::location::{Geocoding, LocationResolver, OpenMeteoGeocoding};

use super::forecast::{Forecast, OpenMeteoForecast};
use super::{location_from_args, CapabilityHandler, ToolError};

/// Ordered category → items recommendation set.
type Outfit = Vec<(&'static str, Vec<&'static str>)>;

/// Base outfit for a temperature in °C.
///
/// Bands: below 0, 0–10, 10–20, 20–25, and 25 up.
fn base_outfit(temperature: f64) -> Outfit {
    if temperature < 0.0 {
        vec![
            ("base", vec!["Thermal underwear", "Warm long-sleeve shirt"]),
            ("mid", vec!["Wool sweater", "Fleece jacket"]),
            ("outer", vec!["Heavy winter coat"]),
            ("bottom", vec!["Insulated pants", "Thermal leggings"]),
            (
                "accessories",
                vec!["Warm hat", "Scarf", "Gloves", "Warm socks", "Winter boots"],
            ),
        ]
    } else if temperature < 10.0 {
        vec![
            ("base", vec!["Long-sleeve thermal shirt"]),
            ("mid", vec!["Sweater"]),
            ("outer", vec!["Winter jacket"]),
            ("bottom", vec!["Warm pants"]),
            ("accessories", vec!["Light hat", "Scarf", "Gloves"]),
        ]
    } else if temperature < 20.0 {
        vec![
            ("base", vec!["Long-sleeve shirt"]),
            ("mid", vec!["Light jacket"]),
            ("bottom", vec!["Regular pants", "Jeans"]),
            ("accessories", vec!["Light scarf"]),
        ]
    } else if temperature < 25.0 {
        vec![
            ("base", vec!["T-shirt", "Short-sleeve shirt"]),
            ("bottom", vec!["Light pants", "Shorts"]),
            ("accessories", vec!["Sunglasses"]),
        ]
    } else {
        vec![
            ("base", vec!["Light t-shirt", "Tank top"]),
            ("bottom", vec!["Shorts", "Light skirt"]),
            ("accessories", vec!["Sunglasses", "Sun hat"]),
        ]
    }
}

/// Append an item to a category, creating the category at the end if absent.
fn push_item(outfit: &mut Outfit, category: &'static str, item: &'static str) {
    if let Some((_, items)) = outfit.iter_mut().find(|(name, _)| *name == category) {
        items.push(item);
    } else {
        outfit.push((category, vec![item]));
    }
}

/// Layer condition-specific items onto the base outfit.
fn adjust_for_conditions(outfit: &mut Outfit, weather_code: u16, wind_speed: f64) {
    let rain = matches!(weather_code, 51..=65 | 80..=82);
    let snow = matches!(weather_code, 71..=77 | 85..=86);

    if rain {
        push_item(outfit, "outer", "Rain jacket");
        push_item(outfit, "accessories", "Umbrella");
    } else if snow {
        push_item(outfit, "outer", "Snow-proof jacket");
        push_item(outfit, "accessories", "Snow boots");
        push_item(outfit, "accessories", "Waterproof gloves");
    }

    if wind_speed > 20.0 {
        push_item(outfit, "outer", "Windbreaker");
    }
}

fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Header plus one "{Category}: item, item" line per non-empty category.
fn render_outfit(loc_name: &str, temperature: f64, outfit: &Outfit) -> String {
    let mut lines = vec![format!(
        "Based on the current temperature of {temperature}°C in {loc_name}, \
         here's what you should wear:"
    )];

    for (category, items) in outfit {
        if !items.is_empty() {
            lines.push(format!("{}: {}", category_label(category), items.join(", ")));
        }
    }

    lines.join("\n")
}

/// Recommends clothing for the current weather at a location.
pub struct ClothingTool {
    resolver: tokio::sync::Mutex<LocationResolver>,
    forecast: Arc<dyn Forecast>,
}

impl ClothingTool {
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

impl Default for ClothingTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CapabilityHandler for ClothingTool {
    fn identifier(&self) -> &str {
        "clothing_tool"
    }

    fn description(&self) -> &str {
        "Recommends clothing based on weather conditions."
    }

    async fn invoke(&self, args: &serde_json::Value) -> Result<String, ToolError> {
        let location = location_from_args(args);

        let info = match self.resolver.lock().await.get_info(&location).await {
            Ok(info) => info,
            Err(e) => {
                tracing::warn!(location = %location, error = %e, "clothing location lookup failed");
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

        let current = &forecast.current;
        let mut outfit = base_outfit(current.temperature_2m);
        adjust_for_conditions(&mut outfit, current.weather_code, current.wind_speed_10m);

        Ok(render_outfit(
            &info.display_name(),
            current.temperature_2m,
            &outfit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{GeocodingOutcome, LocationError, LocationInfo};
    use crate::tools::forecast::{CurrentConditions, CurrentForecast};
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

    fn london() -> LocationInfo {
        LocationInfo {
            name: "London".to_string(),
            country: Some("United Kingdom".to_string()),
            latitude: 51.5,
            longitude: -0.12,
            timezone: Some("Europe/London".to_string()),
        }
    }

    fn conditions(temperature: f64, weather_code: u16, wind_speed: f64) -> CurrentForecast {
        CurrentForecast {
            current: CurrentConditions {
                temperature_2m: temperature,
                relative_humidity_2m: 60.0,
                apparent_temperature: temperature,
                precipitation: 0.0,
                weather_code,
                wind_speed_10m: wind_speed,
            },
            timezone: "Europe/London".to_string(),
        }
    }

    fn items_for<'a>(outfit: &'a Outfit, category: &str) -> Option<&'a Vec<&'static str>> {
        outfit
            .iter()
            .find(|(name, _)| *name == category)
            .map(|(_, items)| items)
    }

    // ── temperature band tests ──

    #[test]
    fn test_band_boundaries() {
        assert_eq!(base_outfit(-5.0)[0].1[0], "Thermal underwear");
        assert_eq!(base_outfit(0.0)[0].1[0], "Long-sleeve thermal shirt");
        assert_eq!(base_outfit(9.9)[0].1[0], "Long-sleeve thermal shirt");
        assert_eq!(base_outfit(10.0)[0].1[0], "Long-sleeve shirt");
        assert_eq!(base_outfit(20.0)[0].1[0], "T-shirt");
        assert_eq!(base_outfit(24.9)[0].1[0], "T-shirt");
        assert_eq!(base_outfit(25.0)[0].1[0], "Light t-shirt");
    }

    #[test]
    fn test_warm_band_has_no_outer_layer() {
        let outfit = base_outfit(22.0);
        assert!(items_for(&outfit, "outer").is_none());
        assert!(items_for(&outfit, "mid").is_none());
    }

    // ── condition adjustment tests ──

    #[test]
    fn test_rain_adds_jacket_and_umbrella() {
        let mut outfit = base_outfit(15.0);
        adjust_for_conditions(&mut outfit, 61, 5.0);

        assert_eq!(items_for(&outfit, "outer").unwrap(), &vec!["Rain jacket"]);
        assert!(items_for(&outfit, "accessories").unwrap().contains(&"Umbrella"));
        // Mild has no outer layer, so the rain jacket category lands last.
        assert_eq!(outfit.last().unwrap().0, "outer");
    }

    #[test]
    fn test_snow_extends_existing_outer_layer() {
        let mut outfit = base_outfit(5.0);
        adjust_for_conditions(&mut outfit, 73, 5.0);

        assert_eq!(
            items_for(&outfit, "outer").unwrap(),
            &vec!["Winter jacket", "Snow-proof jacket"]
        );
        let accessories = items_for(&outfit, "accessories").unwrap();
        assert!(accessories.ends_with(&["Snow boots", "Waterproof gloves"]));
    }

    #[test]
    fn test_strong_wind_adds_windbreaker() {
        let mut outfit = base_outfit(22.0);
        adjust_for_conditions(&mut outfit, 0, 25.0);
        assert_eq!(items_for(&outfit, "outer").unwrap(), &vec!["Windbreaker"]);
    }

    #[test]
    fn test_calm_clear_weather_changes_nothing() {
        let mut outfit = base_outfit(15.0);
        let before = outfit.clone();
        adjust_for_conditions(&mut outfit, 0, 10.0);
        assert_eq!(outfit, before);
    }

    // ── invoke tests ──

    #[tokio::test]
    async fn test_invoke_renders_mild_outfit() {
        let tool = ClothingTool::with_clients(
            Arc::new(OneHit(london())),
            Arc::new(FixedForecast(conditions(15.3, 0, 8.0))),
        );

        let reply = tool.invoke(&json!("London")).await.unwrap();
        let expected = "Based on the current temperature of 15.3°C in London, United Kingdom, \
                        here's what you should wear:\n\
                        Base: Long-sleeve shirt\n\
                        Mid: Light jacket\n\
                        Bottom: Regular pants, Jeans\n\
                        Accessories: Light scarf";
        assert_eq!(reply, expected);
    }

    #[tokio::test]
    async fn test_invoke_accepts_mapping_args() {
        let tool = ClothingTool::with_clients(
            Arc::new(OneHit(london())),
            Arc::new(FixedForecast(conditions(-3.0, 71, 10.0))),
        );

        let reply = tool.invoke(&json!({"location": "London"})).await.unwrap();
        assert!(reply.contains("Heavy winter coat, Snow-proof jacket"));
        assert!(reply.contains("Snow boots, Waterproof gloves"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_location_apologizes() {
        let tool = ClothingTool::with_clients(
            Arc::new(NoHit),
            Arc::new(FixedForecast(conditions(15.0, 0, 5.0))),
        );

        let reply = tool.invoke(&json!("Atlantis")).await.unwrap();
        assert_eq!(reply, "Sorry, I couldn't find the location: Atlantis");
    }
}
