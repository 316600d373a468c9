//! Client configuration
//!
//! Configuration is loaded with the `config` crate from defaults, an optional
//! `config/samurai` file and `SAMURAI__`-prefixed environment variables
//! (a `.env` file is honoured through `dotenvy`).

use config::{Config, Environment, File};
use serde::Deserialize;
use std::time::Duration;

use crate::error::SamuraiError;
use crate::number::NumberPlan;

/// XML-RPC endpoint of the Samurai service, without scheme
pub const DEFAULT_SERVER_URL: &str = "samurai.sipgate.net/RPC2";

/// Account and endpoint configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SamuraiConfig {
    /// Account username
    pub username: String,

    /// Account password
    pub password: String,

    /// Server endpoint, without scheme
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Dialing context for number normalization
    #[serde(default)]
    pub number_plan: NumberPlan,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl SamuraiConfig {
    /// Builds a configuration with default endpoint and number plan
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            server_url: default_server_url(),
            timeout_secs: default_timeout(),
            number_plan: NumberPlan::default(),
        }
    }

    pub fn with_server_url(mut self, server_url: &str) -> Self {
        self.server_url = server_url.to_string();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_number_plan(mut self, number_plan: NumberPlan) -> Self {
        self.number_plan = number_plan;
        self
    }

    /// Load configuration from environment and optional config file
    ///
    /// Recognized variables: `SAMURAI__USERNAME`, `SAMURAI__PASSWORD`,
    /// `SAMURAI__SERVER_URL`, `SAMURAI__TIMEOUT_SECS`,
    /// `SAMURAI__NUMBER_PLAN__DOMAIN`, `SAMURAI__NUMBER_PLAN__COUNTRY_CODE`,
    /// `SAMURAI__NUMBER_PLAN__AREA_CODE`.
    pub fn load() -> Result<Self, SamuraiError> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("server_url", DEFAULT_SERVER_URL)?
            .set_default("timeout_secs", default_timeout() as i64)?
            .add_source(File::with_name("config/samurai").required(false))
            .add_source(
                Environment::with_prefix("SAMURAI")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, SamuraiError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Rejects configurations the transport cannot work with
    pub fn validate(&self) -> Result<(), SamuraiError> {
        if self.username.is_empty() {
            return Err(SamuraiError::Config("username is empty".to_string()));
        }
        if self.server_url.is_empty() {
            return Err(SamuraiError::Config("server_url is empty".to_string()));
        }
        if self.server_url.contains("://") {
            return Err(SamuraiError::Config(format!(
                "server_url must not carry a scheme: {}",
                self.server_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(SamuraiError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
