//! Health probe payloads

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Whether the backend has an Alembic configuration to work with
///
/// The wire value is a free-form string. Only `"configured"` counts as
/// configured; the backend sends `"not configured"` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigState {
    Configured,
    Unconfigured,
}

impl ConfigState {
    /// Parse the wire value
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("configured") {
            ConfigState::Configured
        } else {
            ConfigState::Unconfigured
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigState::Configured => "configured",
            ConfigState::Unconfigured => "unconfigured",
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, ConfigState::Configured)
    }
}

impl Serialize for ConfigState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ConfigState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value
            .as_deref()
            .map(ConfigState::parse)
            .unwrap_or(ConfigState::Unconfigured))
    }
}

/// Top-level `GET /health` payload, outside the API namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Liveness of the backend process
    pub status: String,

    /// Database connectivity as reported by the backend
    #[serde(default)]
    pub database: String,

    /// Gates onboarding vs. the operational view
    #[serde(default = "unconfigured")]
    pub alembic_config: ConfigState,
}

fn unconfigured() -> ConfigState {
    ConfigState::Unconfigured
}

/// `GET /alembic/health` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiHealth {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
