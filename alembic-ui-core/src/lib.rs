//! # alembic-ui-core
//!
//! State machines and view model for the alembic-ui migration dashboard.
//!
//! The dashboard has two layers:
//!
//! - [`AppShell`] probes the backend once and picks a [`Screen`]: a
//!   connection error, the onboarding guide when Alembic is not configured,
//!   or the operational view.
//! - [`MigrationsPage`] is the operational view. It fetches the migration
//!   list and the status summary together, and runs the two mutating actions
//!   (apply all pending, roll back one) behind a confirmation.
//!
//! Neither layer draws anything. Front-ends turn page state into output with
//! the [`view`] module, put questions to the operator through a [`Prompter`]
//! and can observe everything through [`DashboardHook`]s.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use alembic_ui_core::{AppShell, AutoConfirm, DashboardConfig, PageState, Screen};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::from_env()?;
//! let mut shell = AppShell::new(Arc::new(config.client()?));
//!
//! shell.check().await;
//! if let Screen::Operational { .. } = shell.screen() {
//!     let mut page = shell.migrations_page();
//!     if let PageState::Loaded(snapshot) = page.load().await {
//!         println!("{} pending", snapshot.status.pending_migrations);
//!     }
//!     page.apply_pending(&AutoConfirm).await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Observing Events
//!
//! ```no_run
//! # use alembic_ui_core::{AppShell, DashboardEvent};
//! # fn example(shell: &AppShell<alembic_ui_sdk::AlembicApi>) {
//! shell.add_hook(|event: &DashboardEvent| {
//!     if let DashboardEvent::ActionFailed { error, .. } = event {
//!         eprintln!("action failed: {}", error);
//!     }
//! });
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod events;
pub mod page;
pub mod prompt;
pub mod shell;
pub mod view;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use backend::MigrationBackend;
pub use config::{ConfigError, DashboardConfig};
pub use events::{DashboardEvent, DashboardHook, HookSet};
pub use page::{ActionOutcome, MigrationsPage, PageAction, PageState, Snapshot};
pub use prompt::{AutoCancel, AutoConfirm, ConfirmRequest, Decision, Notice, NoticeLevel, Prompter};
pub use shell::{AppShell, Screen, ScreenKind};
pub use view::{
    ActionButton, ActionsView, MigrationRowView, RowMarker, StatusBadge, StatusView, TimelineView,
};

// Re-export the SDK so front-ends need only one dependency
pub use alembic_ui_sdk;
