//! Minimal client for the alembic-ui migration backend
//!
//! The backend wraps an Alembic project and exposes its revision history and
//! the `upgrade head` / `downgrade -1` commands over HTTP. This crate is the
//! typed boundary to that API: wire types, one method per endpoint and a
//! small error taxonomy.
//!
//! # Quick Start
//!
//! ```no_run
//! use alembic_ui_sdk::AlembicApi;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AlembicApi::new("http://localhost:8000/api")?;
//!
//! let health = client.server_health().await?;
//! if health.alembic_config.is_configured() {
//!     for record in client.migrations().await? {
//!         println!("{} {:?} {}", record.revision, record.state(), record.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Failed requests surface the backend's `detail` message when it sent one:
//!
//! ```no_run
//! use alembic_ui_sdk::AlembicApi;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = AlembicApi::builder().build()?;
//! match client.upgrade().await {
//!     Ok(result) => println!("{}", result.message),
//!     Err(e) => eprintln!("{}", e.message_or("Failed to upgrade migrations")),
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod health;
pub mod migrations;

// Client types
pub use client::{
    derive_server_base, AlembicApi, AlembicApiBuilder, DEFAULT_API_BASE, DEFAULT_SERVER_BASE,
    DEFAULT_TIMEOUT,
};

// Error types
pub use error::{AlembicUiError, ApiErrorResponse};

// Health
pub use health::{ApiHealth, ConfigState, HealthStatus};

// Migrations
pub use migrations::{
    check_migration_list, ActionResult, ActionStatus, ListViolation, MigrationRecord,
    MigrationStatusSummary, RecordState, NO_MIGRATIONS_APPLIED,
};
