//! OpenWeatherMap client: city name -> coordinates -> current conditions.

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use weatherbot_core::WeatherConfig;

use crate::geocode::{first_match, normalize_city, GeocodeEntry};
use crate::types::{Coordinates, WeatherError, WeatherReport};

const USER_AGENT: &str = concat!("weatherbot/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    weather: Vec<ConditionEntry>,
    main: MainBlock,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: Temperature,
}

/// `main.temp` is normally a number, but some proxies hand it back as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Temperature {
    Number(f64),
    Text(String),
}

impl Temperature {
    fn kelvin(&self) -> Result<f64, WeatherError> {
        match self {
            Temperature::Number(k) => Ok(*k),
            Temperature::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| WeatherError::Parse(format!("non-numeric temperature: {:?}", s))),
        }
    }
}

impl TryFrom<CurrentWeatherResponse> for WeatherReport {
    type Error = WeatherError;

    fn try_from(resp: CurrentWeatherResponse) -> Result<Self, Self::Error> {
        let temperature_kelvin = resp.main.temp.kelvin()?;
        let description = resp
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| WeatherError::Parse("response has no weather conditions".into()))?;

        Ok(Self {
            description,
            temperature_kelvin,
        })
    }
}

#[derive(Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    geocoding_url: String,
    weather_url: String,
}

impl std::fmt::Debug for WeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherProvider")
            .field("geocoding_url", &self.geocoding_url)
            .field("weather_url", &self.weather_url)
            .finish_non_exhaustive()
    }
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: config.api_key.clone(),
            geocoding_url: config.geocoding_url.clone(),
            weather_url: config.weather_url.clone(),
        })
    }

    /// Look up current weather for a free-text city name.
    ///
    /// Returns `WeatherError::CityNotFound` when geocoding has no match;
    /// transport and provider failures are returned as-is, without retry.
    #[instrument(skip(self), level = "info")]
    pub async fn find_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let coords = self
            .geocode(city)
            .await?
            .ok_or_else(|| WeatherError::CityNotFound(city.trim().to_string()))?;

        let report = self.current_weather(&coords).await?;
        tracing::info!(
            "Weather for {}: {} at {} K",
            city.trim(),
            report.description,
            report.temperature_kelvin
        );
        Ok(report)
    }

    /// Resolve a city name to the provider's first matching coordinates.
    #[instrument(skip(self), level = "debug")]
    pub async fn geocode(&self, city: &str) -> Result<Option<Coordinates>, WeatherError> {
        let Some(city) = normalize_city(city) else {
            return Ok(None);
        };

        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let entries: Vec<GeocodeEntry> = handle_response(response).await?;
        let coords = first_match(&entries);

        match &coords {
            Some(c) => tracing::debug!("Geocoded {} to {}, {}", city, c.latitude, c.longitude),
            None => tracing::debug!("No geocoding match for {}", city),
        }
        Ok(coords)
    }

    /// Fetch current conditions for coordinates.
    #[instrument(skip(self), level = "debug")]
    pub async fn current_weather(&self, coords: &Coordinates) -> Result<WeatherReport, WeatherError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();

        let response = self
            .client
            .get(&self.weather_url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let body: CurrentWeatherResponse = handle_response(response).await?;
        WeatherReport::try_from(body)
    }
}

/// Map status codes to errors and decode successful bodies.
async fn handle_response<T: DeserializeOwned>(response: Response) -> Result<T, WeatherError> {
    let status = response.status();

    if status.is_success() {
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
    } else if status == StatusCode::UNAUTHORIZED {
        Err(WeatherError::InvalidApiKey)
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Err(WeatherError::RateLimited)
    } else {
        let message = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Failed to read error body: {}", e);
                String::new()
            }
        };
        tracing::warn!("Weather API returned {}: {}", status, message);
        Err(WeatherError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
