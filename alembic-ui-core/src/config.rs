//! Dashboard configuration
//!
//! The backend location is an explicit value passed at start-up. It is
//! resolved from, highest precedence first: command-line overrides applied
//! by the caller, environment variables, and built-in defaults.

use std::time::Duration;

use alembic_ui_sdk::{
    derive_server_base, AlembicApi, AlembicUiError, DEFAULT_API_BASE, DEFAULT_TIMEOUT,
};
use thiserror::Error;
use url::Url;

pub const ENV_API_BASE: &str = "ALEMBIC_UI_API_BASE";
pub const ENV_SERVER_URL: &str = "ALEMBIC_UI_SERVER_URL";
pub const ENV_TIMEOUT_SECS: &str = "ALEMBIC_UI_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {value}")]
    InvalidUrl { name: &'static str, value: String },

    #[error("{name} must be a positive number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },

    #[error(transparent)]
    Client(#[from] AlembicUiError),
}

/// Where the backend lives and how long to wait for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Base URL of the API namespace (e.g. `http://localhost:8000/api`)
    pub api_base: String,
    /// Base URL for the top-level health probe; derived from `api_base`
    /// when unset
    pub server_base: Option<String>,
    pub timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            server_base: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the process environment
    ///
    /// | Env Var                   | Default                      |
    /// |---------------------------|------------------------------|
    /// | `ALEMBIC_UI_API_BASE`     | `http://localhost:8000/api`  |
    /// | `ALEMBIC_UI_SERVER_URL`   | API base without `/api`      |
    /// | `ALEMBIC_UI_TIMEOUT_SECS` | `30`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(api_base) = non_empty(ENV_API_BASE) {
            config.api_base = api_base.trim().to_string();
        }
        if let Some(server) = non_empty(ENV_SERVER_URL) {
            config.server_base = Some(server.trim().to_string());
        }
        if let Some(raw) = non_empty(ENV_TIMEOUT_SECS) {
            config.timeout = parse_timeout(ENV_TIMEOUT_SECS, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_server_base(mut self, server_base: impl Into<String>) -> Self {
        self.server_base = Some(server_base.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The health probe base, explicit or derived
    pub fn resolved_server_base(&self) -> String {
        match &self.server_base {
            Some(server) => server.clone(),
            None => derive_server_base(&self.api_base),
        }
    }

    /// Check that both URLs parse and the timeout is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("api base", &self.api_base)?;
        check_url("server url", &self.resolved_server_base())?;
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout {
                name: "timeout",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Build the HTTP client for this configuration
    pub fn client(&self) -> Result<AlembicApi, ConfigError> {
        self.validate()?;
        let client = AlembicApi::builder()
            .api_base(&self.api_base)
            .server_base(self.resolved_server_base())
            .timeout(self.timeout)
            .build()?;
        Ok(client)
    }
}

fn check_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_timeout(name: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            name,
            value: raw.to_string(),
        }),
    }
}
