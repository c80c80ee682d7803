//! Weather lookup for the bot.
//!
//! Resolves a city name to coordinates via OpenWeatherMap direct geocoding,
//! then fetches current conditions for those coordinates.

pub mod convert;
pub mod geocode;
pub mod provider;
pub mod types;

pub use convert::kelvin_to_celsius;
pub use provider::WeatherProvider;
pub use types::*;
