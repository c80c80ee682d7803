use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TG_API_TOKEN";
/// Environment variable holding the OpenWeatherMap API key.
pub const WEATHER_API_KEY_ENV: &str = "OWM_API_TOKEN";
/// Environment variable overriding `conversation.city_routing`.
pub const CITY_ROUTING_ENV: &str = "WEATHERBOT_CITY_ROUTING";

pub const DEFAULT_GEOCODING_URL: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Bot configuration.
///
/// Non-secret settings come from an optional TOML file; secrets and the
/// routing switch are overlaid from the process environment (a `.env` file
/// in the working directory is honoured).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub weather: WeatherConfig,
    pub conversation: ConversationConfig,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
}

// Tokens must never reach the logs.
impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redact(&self.bot_token))
            .finish()
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    pub api_key: String,

    /// Direct geocoding endpoint
    pub geocoding_url: String,

    /// Current weather endpoint
    pub weather_url: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for WeatherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherConfig")
            .field("api_key", &redact(&self.api_key))
            .field("geocoding_url", &self.geocoding_url)
            .field("weather_url", &self.weather_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// How free-text messages are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CityRouting {
    /// Every text message is a city name, whether or not "Find city" was pressed.
    #[default]
    AnyText,
    /// Text is only a city name right after the "Find city" prompt.
    AfterPrompt,
}

impl FromStr for CityRouting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any_text" => Ok(Self::AnyText),
            "after_prompt" => Ok(Self::AfterPrompt),
            other => Err(ConfigError::Invalid(format!(
                "unknown city routing '{}', expected any_text or after_prompt",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    pub city_routing: CityRouting,
}

impl Config {
    /// Load configuration from `.env`, the config file (if present) and the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {}", e),
        }

        let path = Self::config_path();
        Self::load_from(path.as_deref(), |key| std::env::var(key).ok())
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; any validation error is returned as
    /// `ConfigError::MissingSetting` or `ConfigError::Invalid`.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        Self::check(Self::load()?)
    }

    /// Validate an already-loaded configuration.
    ///
    /// A missing secret is reported as `MissingSetting` naming the field;
    /// any other validation error becomes `Invalid`.
    pub fn check(config: Config) -> Result<(Self, ValidationResult), ConfigError> {
        if let Some(field) = config.missing_secret() {
            return Err(ConfigError::MissingSetting(field.to_string()));
        }

        let validation = config.validate();

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        Ok((config, validation))
    }

    /// First required secret that is unset, by field name.
    fn missing_secret(&self) -> Option<&'static str> {
        if self.telegram.bot_token.trim().is_empty() {
            Some("telegram.bot_token")
        } else if self.weather.api_key.trim().is_empty() {
            Some("weather.api_key")
        } else {
            None
        }
    }

    /// Build configuration from an optional TOML file and an environment lookup.
    pub fn load_from(
        path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) if p.exists() => {
                tracing::debug!("Reading config file {}", p.display());
                let contents = std::fs::read_to_string(p)?;
                Self::from_toml_str(&contents)?
            }
            _ => Self::default(),
        };

        config.apply_env(env)?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay environment values. Blank values are treated as unset.
    pub fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let lookup = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = lookup(TELEGRAM_TOKEN_ENV) {
            self.telegram.bot_token = token;
        }
        if let Some(key) = lookup(WEATHER_API_KEY_ENV) {
            self.weather.api_key = key;
        }
        if let Some(routing) = lookup(CITY_ROUTING_ENV) {
            self.conversation.city_routing = routing.parse()?;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.telegram.bot_token.trim().is_empty() {
            result.add_error("telegram.bot_token", MISSING_MESSAGE);
        }
        if self.weather.api_key.trim().is_empty() {
            result.add_error("weather.api_key", MISSING_MESSAGE);
        }

        validate_url(&self.weather.geocoding_url, "weather.geocoding_url", &mut result);
        validate_url(&self.weather.weather_url, "weather.weather_url", &mut result);

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 120 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>120s)",
            );
        }

        if self.conversation.city_routing == CityRouting::AnyText {
            result.add_warning(
                "conversation.city_routing",
                "Every text message is treated as a city name",
            );
        }

        result
    }

    /// Path to the optional configuration file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("weatherbot").join("config.toml"))
    }
}

const MISSING_MESSAGE: &str = "Setting is required";

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
