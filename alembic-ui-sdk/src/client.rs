//! HTTP client for the migration backend

use crate::error::AlembicUiError;
use crate::health::{ApiHealth, HealthStatus};
use crate::migrations::{ActionResult, MigrationRecord, MigrationStatusSummary};
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;

/// Default API base URL (the backend mounts its routers under `/api`)
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Default server root, where the top-level `/health` lives
pub const DEFAULT_SERVER_BASE: &str = "http://localhost:8000";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_USER_AGENT: &str = concat!("alembic-ui/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Client
// ============================================================================

/// Client for the Alembic migration backend
///
/// Requests are never retried: upgrade and downgrade are not idempotent, and
/// reads are only re-issued when the operator asks for it.
#[derive(Clone)]
pub struct AlembicApi {
    client: reqwest::Client,
    api_base: String,
    server_base: String,
}

impl std::fmt::Debug for AlembicApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlembicApi")
            .field("api_base", &self.api_base)
            .field("server_base", &self.server_base)
            .finish()
    }
}

impl AlembicApi {
    /// Create a client for the given API base, with the server root derived from it
    ///
    /// A trailing `/api` segment is stripped to find the server root.
    pub fn new(api_base: impl Into<String>) -> Result<Self, AlembicUiError> {
        let api_base = api_base.into();
        let server_base = derive_server_base(&api_base);
        Self::builder()
            .api_base(api_base)
            .server_base(server_base)
            .build()
    }

    /// Create a builder for more advanced configuration
    pub fn builder() -> AlembicApiBuilder {
        AlembicApiBuilder::new()
    }

    /// The API base URL requests under `/alembic` are resolved against
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// The server root the top-level health probe is resolved against
    pub fn server_base(&self) -> &str {
        &self.server_base
    }

    /// List all known revisions in the order the backend returns them
    pub async fn migrations(&self) -> Result<Vec<MigrationRecord>, AlembicUiError> {
        let url = format!("{}/alembic/migrations", self.api_base);
        self.execute(reqwest::Method::GET, &url).await
    }

    /// Fetch the current revision and pending count
    pub async fn status(&self) -> Result<MigrationStatusSummary, AlembicUiError> {
        let url = format!("{}/alembic/status", self.api_base);
        self.execute(reqwest::Method::GET, &url).await
    }

    /// Apply all pending migrations (`alembic upgrade head`)
    pub async fn upgrade(&self) -> Result<ActionResult, AlembicUiError> {
        let url = format!("{}/alembic/upgrade", self.api_base);
        self.execute(reqwest::Method::POST, &url).await
    }

    /// Roll back exactly one revision (`alembic downgrade -1`)
    pub async fn downgrade(&self) -> Result<ActionResult, AlembicUiError> {
        let url = format!("{}/alembic/downgrade", self.api_base);
        self.execute(reqwest::Method::POST, &url).await
    }

    /// Liveness probe of the migration service inside the API namespace
    pub async fn health(&self) -> Result<ApiHealth, AlembicUiError> {
        let url = format!("{}/alembic/health", self.api_base);
        self.execute(reqwest::Method::GET, &url).await
    }

    /// Top-level backend health, including whether Alembic is configured
    pub async fn server_health(&self) -> Result<HealthStatus, AlembicUiError> {
        let url = format!("{}/health", self.server_base);
        self.execute(reqwest::Method::GET, &url).await
    }

    /// Send a body-less request and decode a JSON response
    async fn execute<T>(&self, method: reqwest::Method, url: &str) -> Result<T, AlembicUiError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!("{} {}", method, url);

        let response = self
            .client
            .request(method.clone(), url)
            .send()
            .await
            .map_err(AlembicUiError::from_reqwest_error)?;

        let status = response.status();
        debug!("{} {} -> {}", method, url, status.as_u16());

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(AlembicUiError::from_reqwest_error)?;
            return serde_json::from_str::<T>(&body).map_err(|e| {
                AlembicUiError::InvalidResponse(format!("Failed to parse response: {}", e))
            });
        }

        let error_body = response.text().await.unwrap_or_default();
        Err(AlembicUiError::from_status(status.as_u16(), &error_body))
    }
}

/// Builder for [`AlembicApi`]
///
/// Create with [`AlembicApi::builder()`]. Every setting has a default, so
/// `AlembicApi::builder().build()` targets a backend on `localhost:8000`.
pub struct AlembicApiBuilder {
    api_base: Option<String>,
    server_base: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl AlembicApiBuilder {
    fn new() -> Self {
        Self {
            api_base: None,
            server_base: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Set the API base URL (e.g. `http://localhost:8000/api`)
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the server root URL (e.g. `http://localhost:8000`)
    pub fn server_base(mut self, server_base: impl Into<String>) -> Self {
        self.server_base = Some(server_base.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the `User-Agent` header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<AlembicApi, AlembicUiError> {
        let api_base = normalize_base(
            self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE),
            "API base",
        )?;
        let server_base = normalize_base(
            self.server_base.as_deref().unwrap_or(DEFAULT_SERVER_BASE),
            "server URL",
        )?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(AlembicUiError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .build()
            .map_err(|e| {
                AlembicUiError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(AlembicApi {
            client,
            api_base,
            server_base,
        })
    }
}

// ============================================================================
// Shared Helpers
// ============================================================================

/// Validate an http(s) URL and strip trailing slashes
fn normalize_base(raw: &str, what: &str) -> Result<String, AlembicUiError> {
    let trimmed = raw.trim();
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| AlembicUiError::Configuration(format!("Invalid {} '{}': {}", what, raw, e)))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AlembicUiError::Configuration(format!(
            "Invalid {} '{}': scheme must be http or https",
            what, raw
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Server root for an API base: `http://host:8000/api` -> `http://host:8000`
pub fn derive_server_base(api_base: &str) -> String {
    let trimmed = api_base.trim().trim_end_matches('/');
    trimmed
        .strip_suffix("/api")
        .unwrap_or(trimmed)
        .to_string()
}
