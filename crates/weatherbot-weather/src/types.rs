use serde::{Deserialize, Serialize};

/// Geographic coordinates resolved from a city name
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions for a set of coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Provider's condition text, e.g. "clear sky"
    pub description: String,
    pub temperature_kelvin: f64,
}

impl WeatherReport {
    pub fn temperature_celsius(&self) -> f64 {
        crate::convert::kelvin_to_celsius(self.temperature_kelvin)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited by weather provider")]
    RateLimited,

    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Returns a message suitable for sending back to the chat.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::CityNotFound(_) => "Can't find this city.",
            WeatherError::Network(e) if e.is_timeout() => {
                "The weather service took too long to answer. Please try again."
            }
            WeatherError::Network(_) => "Unable to reach the weather service. Please try again.",
            WeatherError::InvalidApiKey => "The weather service rejected our credentials.",
            WeatherError::RateLimited => "Too many requests right now. Please try again later.",
            WeatherError::Api { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            WeatherError::Api { .. } | WeatherError::Parse(_) => {
                "Weather service error. Please try again."
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, WeatherError::CityNotFound(_))
    }
}
