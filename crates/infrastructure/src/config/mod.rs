//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `calendar`: calendar source and commute mode
//!
//! Transit, geocoding and address matching settings are owned by
//! `integration_transit` and embedded as-is.

mod calendar;
mod server;

use std::fmt;

use integration_transit::{AddressMatchingConfig, GeocoderConfig, TransitConfig};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use calendar::{
    CalendarAppConfig, CalendarSource, CommuteConfig, FixedEventConfig, GoogleCalendarConfig,
};
pub use server::ServerConfig;

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment
    #[default]
    Development,
    /// Production environment
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Journey planner configuration
    #[serde(default)]
    pub transit: TransitConfig,

    /// Geocoder configuration
    #[serde(default)]
    pub geocoding: GeocoderConfig,

    /// Word lists and thresholds for address clean-up
    #[serde(default)]
    pub address_matching: AddressMatchingConfig,

    /// Calendar source
    #[serde(default)]
    pub calendar: CalendarAppConfig,

    /// Commute endpoint behaviour
    #[serde(default)]
    pub commute: CommuteConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` and the environment
    ///
    /// Environment variables use the `HOMEBOY_` prefix and `__` between
    /// sections, e.g. `HOMEBOY_SERVER__PORT=8080` or
    /// `HOMEBOY_CALENDAR__GOOGLE__ACCESS_TOKEN=...`.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("HOMEBOY")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// The configured environment, development when unset
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        self.transit
            .validate()
            .map_err(|e| format!("transit: {e}"))?;
        self.geocoding
            .validate()
            .map_err(|e| format!("geocoding: {e}"))?;
        self.calendar.validate()?;

        if self.address_matching.min_query_chars == 0 {
            return Err("address_matching: min_query_chars must be greater than 0".to_string());
        }

        if self.environment() == Environment::Production {
            if self.server.cors_enabled && self.server.allowed_origins.is_empty() {
                warn!("CORS allows any origin in production");
            }
            if self.commute.use_mocks {
                warn!("Mock commute routes are enabled in production");
            }
        }

        Ok(())
    }
}
