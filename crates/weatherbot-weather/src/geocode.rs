//! Direct geocoding: convert a city name to coordinates.
//! Uses the OpenWeatherMap geocoding API.

use serde::Deserialize;

use crate::types::Coordinates;

/// One candidate from the direct geocoding endpoint. Only the coordinates
/// are read; name/country/state are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeEntry {
    lat: f64,
    lon: f64,
}

/// Pick the first candidate. Ambiguous names ("Paris") are not disambiguated.
pub(crate) fn first_match(entries: &[GeocodeEntry]) -> Option<Coordinates> {
    entries.first().map(|e| Coordinates {
        latitude: e.lat,
        longitude: e.lon,
    })
}

/// Normalize a user-typed city name; `None` when nothing is left to look up.
pub fn normalize_city(raw: &str) -> Option<&str> {
    let city = raw.trim();
    (!city.is_empty()).then_some(city)
}
