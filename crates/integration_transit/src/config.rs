//! Journey planner configuration

use serde::{Deserialize, Serialize};

use crate::local_time::LocalTimePolicy;

/// Configuration for the journey planner (Entur Journey Planner v3)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitConfig {
    /// GraphQL endpoint of the journey planner
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value sent in the `ET-Client-Name` header
    #[serde(default = "default_client_name")]
    pub client_name: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of ranked itineraries to request
    #[serde(default = "default_max_results")]
    pub max_results: u8,

    /// How UTC arrival times are turned into the travel region's local time
    #[serde(default)]
    pub local_time: LocalTimePolicy,
}

fn default_base_url() -> String {
    "https://api.entur.io/journey-planner/v3/graphql".to_string()
}

pub(crate) fn default_client_name() -> String {
    "homeboy".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_max_results() -> u8 {
    3
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_name: default_client_name(),
            timeout_secs: default_timeout_secs(),
            max_results: default_max_results(),
            local_time: LocalTimePolicy::default(),
        }
    }
}

impl TransitConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.client_name.trim().is_empty() {
            return Err("client_name must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_results == 0 {
            return Err("max_results must be greater than 0".to_string());
        }

        if self.max_results > 10 {
            return Err("max_results must be 10 or less".to_string());
        }

        self.local_time.validate()
    }
}
