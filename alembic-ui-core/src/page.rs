//! Migrations page: fetch cycle and the two mutating actions

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use alembic_ui_sdk::{
    check_migration_list, ActionResult, AlembicUiError, MigrationRecord, MigrationStatusSummary,
};
use log::{debug, warn};

use crate::backend::MigrationBackend;
use crate::events::{DashboardEvent, DashboardHook, HookSet};
use crate::prompt::{ConfirmRequest, Decision, Notice, Prompter};

/// Message shown when a read fails without any better explanation
pub const LOAD_FALLBACK_MESSAGE: &str = "Failed to load migrations";

// ============================================================================
// Actions
// ============================================================================

/// The two operator-triggered mutations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAction {
    /// `alembic upgrade head`
    ApplyPending,
    /// `alembic downgrade -1`
    RollbackOne,
}

impl PageAction {
    /// Confirmation question put to the operator
    pub fn confirm_message(&self) -> &'static str {
        match self {
            PageAction::ApplyPending => "Apply all pending migrations?",
            PageAction::RollbackOne => "Rollback one migration? This cannot be undone!",
        }
    }

    /// Message used when the backend gave no detail
    pub fn failure_fallback(&self) -> &'static str {
        match self {
            PageAction::ApplyPending => "Failed to upgrade migrations",
            PageAction::RollbackOne => "Failed to downgrade migration",
        }
    }

    /// Whether the dashboard can undo this action itself
    pub fn is_destructive(&self) -> bool {
        matches!(self, PageAction::RollbackOne)
    }
}

impl fmt::Display for PageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageAction::ApplyPending => write!(f, "upgrade"),
            PageAction::RollbackOne => write!(f, "downgrade"),
        }
    }
}

/// Result of an action attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action is disabled in the current state; nothing was asked or sent
    Unavailable,
    /// The operator declined; nothing was sent
    Cancelled,
    /// Backend succeeded; the page has been reloaded
    Completed { message: String },
    /// Backend failed; the prior snapshot is kept
    Failed { message: String },
}

// ============================================================================
// Page State
// ============================================================================

/// A consistent pair of reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub migrations: Vec<MigrationRecord>,
    pub status: MigrationStatusSummary,
}

impl Snapshot {
    /// Pending count as reported by the backend
    pub fn has_pending(&self) -> bool {
        self.status.pending_migrations > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageState {
    Loading,
    Error { message: String },
    Loaded(Snapshot),
}

impl PageState {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            PageState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }
}

// ============================================================================
// Page
// ============================================================================

/// The operational view
///
/// Every fetch replaces the snapshot wholesale; actions never patch it.
/// Dropping a `load` or action future cancels its requests, and the mutable
/// borrow guarantees no state update lands after the page is gone.
pub struct MigrationsPage<B: MigrationBackend + ?Sized> {
    backend: Arc<B>,
    state: PageState,
    in_flight: bool,
    hooks: HookSet,
}

impl<B: MigrationBackend + ?Sized> MigrationsPage<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self::with_hooks(backend, HookSet::new())
    }

    pub(crate) fn with_hooks(backend: Arc<B>, hooks: HookSet) -> Self {
        Self {
            backend,
            state: PageState::Loading,
            in_flight: false,
            hooks,
        }
    }

    pub fn add_hook(&self, hook: impl DashboardHook + 'static) {
        self.hooks.add(hook);
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.state.snapshot()
    }

    /// True while an upgrade or downgrade is running
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// "Apply pending" is enabled
    pub fn can_apply(&self) -> bool {
        !self.in_flight && self.snapshot().is_some_and(Snapshot::has_pending)
    }

    /// "Rollback one" is enabled
    pub fn can_rollback(&self) -> bool {
        !self.in_flight && self.snapshot().is_some_and(|s| !s.migrations.is_empty())
    }

    /// Whether `action` is enabled
    pub fn can_run(&self, action: PageAction) -> bool {
        match action {
            PageAction::ApplyPending => self.can_apply(),
            PageAction::RollbackOne => self.can_rollback(),
        }
    }

    /// Fetch the list and the status concurrently
    ///
    /// Both must succeed; the first failure moves the page to `Error`.
    pub async fn load(&mut self) -> &PageState {
        self.state = PageState::Loading;
        self.hooks.emit(DashboardEvent::LoadStarted);
        let started = Instant::now();

        let result = futures::try_join!(self.backend.migrations(), self.backend.status());

        match result {
            Ok((migrations, status)) => {
                if let Err(violation) = check_migration_list(&migrations) {
                    warn!("backend returned an ill-formed migration list: {}", violation);
                }
                if !status.is_consistent() {
                    warn!(
                        "backend status is inconsistent: total={}, pending={}, up_to_date={}",
                        status.total_migrations, status.pending_migrations, status.is_up_to_date
                    );
                }
                debug!(
                    "loaded {} migrations, {} pending",
                    migrations.len(),
                    status.pending_migrations
                );

                self.hooks.emit(DashboardEvent::LoadCompleted {
                    migrations: migrations.len(),
                    pending: status.pending_migrations,
                    is_up_to_date: status.is_up_to_date,
                    duration: started.elapsed(),
                });
                self.state = PageState::Loaded(Snapshot { migrations, status });
            }
            Err(e) => {
                let message = load_failure_message(&e);
                warn!("failed to load migrations: {}", e);

                self.hooks.emit(DashboardEvent::LoadFailed {
                    error: message.clone(),
                    duration: started.elapsed(),
                });
                self.state = PageState::Error { message };
            }
        }

        &self.state
    }

    /// Manual refresh
    pub async fn refresh(&mut self) -> &PageState {
        self.load().await
    }

    /// Retry after a failed load
    pub async fn retry(&mut self) -> &PageState {
        self.load().await
    }

    /// Apply all pending migrations after confirmation
    pub async fn apply_pending(&mut self, prompter: &dyn Prompter) -> ActionOutcome {
        self.run_action(PageAction::ApplyPending, prompter).await
    }

    /// Roll back one migration after confirmation
    pub async fn rollback_one(&mut self, prompter: &dyn Prompter) -> ActionOutcome {
        self.run_action(PageAction::RollbackOne, prompter).await
    }

    /// Confirm, execute, acknowledge, and reload on success
    pub async fn run_action(&mut self, action: PageAction, prompter: &dyn Prompter) -> ActionOutcome {
        if !self.can_run(action) {
            debug!("{} is not available in the current state", action);
            return ActionOutcome::Unavailable;
        }

        self.hooks.emit(DashboardEvent::ActionRequested { action });

        let request = ConfirmRequest {
            action,
            message: action.confirm_message().to_string(),
            destructive: action.is_destructive(),
        };
        if prompter.confirm(&request) == Decision::Cancelled {
            debug!("{} cancelled via {}", action, prompter.name());
            self.hooks.emit(DashboardEvent::ActionCancelled { action });
            return ActionOutcome::Cancelled;
        }

        let started = Instant::now();
        let result = {
            let _busy = InFlight::start(&mut self.in_flight);
            match action {
                PageAction::ApplyPending => self.backend.upgrade().await,
                PageAction::RollbackOne => self.backend.downgrade().await,
            }
        };

        let outcome = match action_message(action, result) {
            Ok(message) => {
                self.hooks.emit(DashboardEvent::ActionCompleted {
                    action,
                    message: message.clone(),
                    duration: started.elapsed(),
                });
                prompter.acknowledge(&Notice::info(message.clone()));
                self.load().await;
                ActionOutcome::Completed { message }
            }
            Err(message) => {
                warn!("{} failed: {}", action, message);
                self.hooks.emit(DashboardEvent::ActionFailed {
                    action,
                    error: message.clone(),
                    duration: started.elapsed(),
                });
                prompter.acknowledge(&Notice::error(message.clone()));
                ActionOutcome::Failed { message }
            }
        };

        outcome
    }
}

/// Marks an action as in flight until dropped
///
/// Dropping the action future mid-request still clears the flag.
struct InFlight<'a>(&'a mut bool);

impl<'a> InFlight<'a> {
    fn start(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

fn load_failure_message(err: &AlembicUiError) -> String {
    let message = err.display_message();
    if message.trim().is_empty() {
        LOAD_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

/// Reduce an action response to the message shown to the operator
///
/// A 2xx body reporting `"status": "error"` counts as a failure.
fn action_message(
    action: PageAction,
    result: Result<ActionResult, AlembicUiError>,
) -> Result<String, String> {
    match result {
        Ok(body) if body.is_success() => Ok(body.message),
        Ok(body) if !body.message.is_empty() => Err(body.message),
        Ok(_) => Err(action.failure_fallback().to_string()),
        Err(e) => Err(e.message_or(action.failure_fallback())),
    }
}
