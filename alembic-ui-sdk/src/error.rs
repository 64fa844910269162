//! Error types for the alembic-ui SDK

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Backend Error Body
// ============================================================================

/// Error body returned by the backend on non-2xx responses
///
/// The backend follows the FastAPI convention of a single `detail` field.
/// It is usually a string, but validation failures send a list of objects.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    /// Human-readable detail, if the body carried one
    ///
    /// Strings are returned as-is; any other JSON value is rendered compactly.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

// ============================================================================
// SDK Error Types
// ============================================================================

/// Errors that can occur when talking to the migration backend
#[derive(Debug, Clone, Error)]
pub enum AlembicUiError {
    /// Network unreachable, timeout, DNS failure or connection refused
    #[error("Network error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status
    #[error("Request failed with status code {status}{}", detail_suffix(.detail))]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// `detail` from the error body, when present
        detail: Option<String>,
    },

    /// A 2xx response whose body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Bad base URL or HTTP client construction failure
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

impl AlembicUiError {
    /// The backend's structured detail message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            AlembicUiError::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code for [`AlembicUiError::HttpStatus`]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AlembicUiError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the backend could not be reached at all
    pub fn is_transport(&self) -> bool {
        matches!(self, AlembicUiError::Transport(_))
    }

    /// Best message for a failed read: the backend detail, else the error itself
    pub fn display_message(&self) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| self.to_string())
    }

    /// Best message for a failed action: the backend detail, else `fallback`
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Build an error from a non-2xx status and its raw body
    pub fn from_status(status_code: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ApiErrorResponse>(body)
            .ok()
            .and_then(|r| r.detail_text());

        AlembicUiError::HttpStatus {
            status: status_code,
            detail,
        }
    }

    /// Classify a reqwest error into an appropriate error variant
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AlembicUiError::Transport(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            AlembicUiError::Transport(format!("Connection failed: {}", err))
        } else if err.is_builder() {
            AlembicUiError::Configuration(err.to_string())
        } else if err.is_decode() {
            AlembicUiError::InvalidResponse(format!("Failed to parse response: {}", err))
        } else if let Some(status) = err.status() {
            AlembicUiError::HttpStatus {
                status: status.as_u16(),
                detail: None,
            }
        } else {
            AlembicUiError::Transport(format!("Request failed: {}", err))
        }
    }
}
