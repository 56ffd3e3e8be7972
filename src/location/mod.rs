//! Location — place-name validation, normalization, and caching.
//!
//! Submodules:
//! - `resolver`: Cache-first validation with country-code + pre-comma fallbacks
//! - `geocoding`: `Geocoding` trait seam plus the Open-Meteo search client
//! - `country_codes`: "City, UK" → "City, United Kingdom" alias expansion
//! - `errors`: Location-level error types

pub mod country_codes;
pub mod errors;
pub mod geocoding;
pub mod resolver;

// Re-exports for convenience
pub use errors::LocationError;
pub use geocoding::{Geocoding, GeocodingOutcome, LocationInfo, OpenMeteoGeocoding};
pub use resolver::LocationResolver;
