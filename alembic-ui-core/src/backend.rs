//! Backend abstraction for the dashboard
//!
//! The shell and the migrations page only talk to the backend through
//! [`MigrationBackend`], so they can be driven by the real HTTP client or by
//! a scripted mock in tests.

use alembic_ui_sdk::{
    ActionResult, AlembicApi, AlembicUiError, HealthStatus, MigrationRecord,
    MigrationStatusSummary,
};

/// Operations the dashboard needs from the migration backend
#[async_trait::async_trait]
pub trait MigrationBackend: Send + Sync {
    /// Top-level health probe used by the application shell
    async fn server_health(&self) -> Result<HealthStatus, AlembicUiError>;

    /// All revisions, in server order
    async fn migrations(&self) -> Result<Vec<MigrationRecord>, AlembicUiError>;

    /// Current revision and pending count
    async fn status(&self) -> Result<MigrationStatusSummary, AlembicUiError>;

    /// Apply all pending migrations
    async fn upgrade(&self) -> Result<ActionResult, AlembicUiError>;

    /// Roll back one migration
    async fn downgrade(&self) -> Result<ActionResult, AlembicUiError>;

    /// Name for logs (e.g. the API base URL)
    fn describe(&self) -> String {
        "backend".to_string()
    }
}

#[async_trait::async_trait]
impl MigrationBackend for AlembicApi {
    async fn server_health(&self) -> Result<HealthStatus, AlembicUiError> {
        AlembicApi::server_health(self).await
    }

    async fn migrations(&self) -> Result<Vec<MigrationRecord>, AlembicUiError> {
        AlembicApi::migrations(self).await
    }

    async fn status(&self) -> Result<MigrationStatusSummary, AlembicUiError> {
        AlembicApi::status(self).await
    }

    async fn upgrade(&self) -> Result<ActionResult, AlembicUiError> {
        AlembicApi::upgrade(self).await
    }

    async fn downgrade(&self) -> Result<ActionResult, AlembicUiError> {
        AlembicApi::downgrade(self).await
    }

    fn describe(&self) -> String {
        self.api_base().to_string()
    }
}
