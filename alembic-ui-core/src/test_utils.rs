//! Test utilities for alembic-ui-core.
//!
//! Scripted stand-ins for the backend and the operator, so the shell and the
//! migrations page can be driven without a running server or a terminal.
//!
//! Enable with the `test-utils` feature:
//!
//! ```toml
//! [dev-dependencies]
//! alembic-ui-core = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use alembic_ui_core::test_utils::{configured_health, MockBackend};
//! use alembic_ui_core::{AppShell, ScreenKind};
//!
//! # async fn example() {
//! let backend = Arc::new(MockBackend::new().with_health(Ok(configured_health())));
//! let mut shell = AppShell::new(backend);
//! assert_eq!(shell.check().await.kind(), ScreenKind::Operational);
//! # }
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use alembic_ui_sdk::{
    ActionResult, ActionStatus, AlembicUiError, ConfigState, HealthStatus, MigrationRecord,
    MigrationStatusSummary,
};
use parking_lot::Mutex;

use crate::backend::MigrationBackend;
use crate::prompt::{ConfirmRequest, Decision, Notice, Prompter};

/// Backend operations, for per-endpoint call counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    Migrations,
    Status,
    Upgrade,
    Downgrade,
}

/// Responses served in order; the last one repeats forever
struct Script<T> {
    queue: VecDeque<Result<T, AlembicUiError>>,
}

impl<T: Clone> Script<T> {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    fn push(&mut self, response: Result<T, AlembicUiError>) {
        self.queue.push_back(response);
    }

    fn next(&mut self, endpoint: Endpoint) -> Result<T, AlembicUiError> {
        if self.queue.len() > 1 {
            if let Some(response) = self.queue.pop_front() {
                return response;
            }
        }
        match self.queue.front() {
            Some(response) => response.clone(),
            None => Err(AlembicUiError::Transport(format!(
                "no scripted response for {:?}",
                endpoint
            ))),
        }
    }
}

struct Scripts {
    health: Script<HealthStatus>,
    migrations: Script<Vec<MigrationRecord>>,
    status: Script<MigrationStatusSummary>,
    upgrade: Script<ActionResult>,
    downgrade: Script<ActionResult>,
}

/// A scripted [`MigrationBackend`]
///
/// Each endpoint has its own response queue. Responses are served in the
/// order they were added and the last one keeps being served, so a single
/// `with_*` call scripts every subsequent request. Endpoints without a
/// script fail with a transport error.
///
/// ```rust
/// use alembic_ui_core::test_utils::{record, status, MockBackend};
///
/// let backend = MockBackend::new()
///     .with_migrations(Ok(vec![record("a1", true, false)]))
///     .with_status(Ok(status("a1", 1, 0)));
/// ```
#[derive(Clone)]
pub struct MockBackend {
    scripts: Arc<Mutex<Scripts>>,
    calls: Arc<Mutex<HashMap<Endpoint, usize>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(Scripts {
                health: Script::new(),
                migrations: Script::new(),
                status: Script::new(),
                upgrade: Script::new(),
                downgrade: Script::new(),
            })),
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_health(self, response: Result<HealthStatus, AlembicUiError>) -> Self {
        self.scripts.lock().health.push(response);
        self
    }

    pub fn with_migrations(self, response: Result<Vec<MigrationRecord>, AlembicUiError>) -> Self {
        self.scripts.lock().migrations.push(response);
        self
    }

    pub fn with_status(self, response: Result<MigrationStatusSummary, AlembicUiError>) -> Self {
        self.scripts.lock().status.push(response);
        self
    }

    pub fn with_upgrade(self, response: Result<ActionResult, AlembicUiError>) -> Self {
        self.scripts.lock().upgrade.push(response);
        self
    }

    pub fn with_downgrade(self, response: Result<ActionResult, AlembicUiError>) -> Self {
        self.scripts.lock().downgrade.push(response);
        self
    }

    /// Number of requests made to `endpoint`
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().get(&endpoint).copied().unwrap_or(0)
    }

    /// Total number of requests across all endpoints
    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    fn record_call(&self, endpoint: Endpoint) {
        *self.calls.lock().entry(endpoint).or_insert(0) += 1;
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MigrationBackend for MockBackend {
    async fn server_health(&self) -> Result<HealthStatus, AlembicUiError> {
        self.record_call(Endpoint::Health);
        self.scripts.lock().health.next(Endpoint::Health)
    }

    async fn migrations(&self) -> Result<Vec<MigrationRecord>, AlembicUiError> {
        self.record_call(Endpoint::Migrations);
        self.scripts.lock().migrations.next(Endpoint::Migrations)
    }

    async fn status(&self) -> Result<MigrationStatusSummary, AlembicUiError> {
        self.record_call(Endpoint::Status);
        self.scripts.lock().status.next(Endpoint::Status)
    }

    async fn upgrade(&self) -> Result<ActionResult, AlembicUiError> {
        self.record_call(Endpoint::Upgrade);
        self.scripts.lock().upgrade.next(Endpoint::Upgrade)
    }

    async fn downgrade(&self) -> Result<ActionResult, AlembicUiError> {
        self.record_call(Endpoint::Downgrade);
        self.scripts.lock().downgrade.next(Endpoint::Downgrade)
    }

    fn describe(&self) -> String {
        "MockBackend".to_string()
    }
}

/// A [`Prompter`] that answers from a queue and records everything
///
/// Decisions are consumed in order; once the queue is empty every
/// confirmation is answered with the default (Confirmed unless changed).
#[derive(Clone)]
pub struct ScriptedPrompter {
    decisions: Arc<Mutex<VecDeque<Decision>>>,
    default: Decision,
    confirms: Arc<Mutex<Vec<ConfirmRequest>>>,
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl ScriptedPrompter {
    /// Confirms everything
    pub fn new() -> Self {
        Self {
            decisions: Arc::new(Mutex::new(VecDeque::new())),
            default: Decision::Confirmed,
            confirms: Arc::new(Mutex::new(Vec::new())),
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Cancels everything
    pub fn cancelling() -> Self {
        Self {
            default: Decision::Cancelled,
            ..Self::new()
        }
    }

    /// Queue a decision for the next confirmation
    pub fn then(self, decision: Decision) -> Self {
        self.decisions.lock().push_back(decision);
        self
    }

    /// Confirmation requests seen so far
    pub fn confirms(&self) -> Vec<ConfirmRequest> {
        self.confirms.lock().clone()
    }

    /// Notices acknowledged so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn last_notice(&self) -> Option<Notice> {
        self.notices.lock().last().cloned()
    }
}

impl Default for ScriptedPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, request: &ConfirmRequest) -> Decision {
        self.confirms.lock().push(request.clone());
        self.decisions.lock().pop_front().unwrap_or(self.default)
    }

    fn acknowledge(&self, notice: &Notice) {
        self.notices.lock().push(notice.clone());
    }

    fn name(&self) -> &'static str {
        "ScriptedPrompter"
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A migration record with no parent and no date
pub fn record(revision: &str, is_current: bool, is_pending: bool) -> MigrationRecord {
    MigrationRecord {
        revision: revision.to_string(),
        down_revision: None,
        message: format!("revision {}", revision),
        is_current,
        is_pending,
        created_date: None,
    }
}

/// A status summary whose `is_up_to_date` agrees with `pending`
pub fn status(current: &str, total: u64, pending: u64) -> MigrationStatusSummary {
    MigrationStatusSummary {
        current_revision: current.to_string(),
        total_migrations: total,
        pending_migrations: pending,
        is_up_to_date: pending == 0,
    }
}

pub fn configured_health() -> HealthStatus {
    HealthStatus {
        status: "healthy".to_string(),
        database: "connected".to_string(),
        alembic_config: ConfigState::Configured,
    }
}

pub fn unconfigured_health() -> HealthStatus {
    HealthStatus {
        alembic_config: ConfigState::Unconfigured,
        ..configured_health()
    }
}

pub fn action_success(message: &str) -> ActionResult {
    ActionResult {
        status: ActionStatus::Success,
        message: message.to_string(),
    }
}

pub fn http_error(status: u16, detail: Option<&str>) -> AlembicUiError {
    AlembicUiError::HttpStatus {
        status,
        detail: detail.map(str::to_string),
    }
}
