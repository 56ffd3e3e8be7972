//! Country-code suffix normalization.
//!
//! The geocoding search endpoint treats everything after a comma as part of
//! the place name, so "London, UK" matches far less reliably than
//! "London, United Kingdom". A small alias table covers the abbreviations
//! people actually type.

/// Two/three-letter country abbreviations mapped to the full names the
/// geocoding service indexes. Lookup is case-insensitive.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("us", "United States"),
    ("usa", "United States"),
    ("uk", "United Kingdom"),
    ("gb", "United Kingdom"),
    ("uae", "United Arab Emirates"),
    ("ae", "United Arab Emirates"),
    ("au", "Australia"),
    ("nz", "New Zealand"),
    ("ca", "Canada"),
    ("mx", "Mexico"),
    ("br", "Brazil"),
    ("ar", "Argentina"),
    ("cl", "Chile"),
    ("co", "Colombia"),
    ("pe", "Peru"),
    ("de", "Germany"),
    ("fr", "France"),
    ("es", "Spain"),
    ("pt", "Portugal"),
    ("it", "Italy"),
    ("nl", "Netherlands"),
    ("be", "Belgium"),
    ("ch", "Switzerland"),
    ("at", "Austria"),
    ("ie", "Ireland"),
    ("se", "Sweden"),
    ("no", "Norway"),
    ("dk", "Denmark"),
    ("fi", "Finland"),
    ("pl", "Poland"),
    ("cz", "Czechia"),
    ("gr", "Greece"),
    ("tr", "Turkey"),
    ("ru", "Russia"),
    ("cn", "China"),
    ("jp", "Japan"),
    ("kr", "South Korea"),
    ("in", "India"),
    ("sg", "Singapore"),
    ("hk", "Hong Kong"),
    ("tw", "Taiwan"),
    ("th", "Thailand"),
    ("my", "Malaysia"),
    ("id", "Indonesia"),
    ("ph", "Philippines"),
    ("vn", "Vietnam"),
    ("za", "South Africa"),
    ("eg", "Egypt"),
    ("ng", "Nigeria"),
    ("ke", "Kenya"),
    ("ma", "Morocco"),
    ("il", "Israel"),
    ("sa", "Saudi Arabia"),
];

/// Expand a recognized country-code alias to its full country name.
///
/// Returns `None` for anything not in the table, including full country
/// names that need no expansion.
pub fn expand_country_code(code: &str) -> Option<&'static str> {
    let lowered = code.trim().to_lowercase();
    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, full)| *full)
}

/// Rewrite `"City, CC"` to `"City, Full Country"` when the text after the
/// last comma is a recognized alias; otherwise return the input unchanged.
///
/// Only the lookup string sent to geocoding is rewritten — callers cache
/// under the string the user actually typed.
pub fn normalize_country_suffix(location: &str) -> String {
    if let Some((head, tail)) = location.rsplit_once(',') {
        if let Some(full) = expand_country_code(tail) {
            return format!("{}, {}", head.trim_end(), full);
        }
    }
    location.to_string()
}
