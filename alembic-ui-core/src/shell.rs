//! Application shell: picks the screen from a single health probe

use std::sync::Arc;

use alembic_ui_sdk::{AlembicUiError, ConfigState, HealthStatus};
use log::{debug, warn};

use crate::backend::MigrationBackend;
use crate::events::{DashboardEvent, DashboardHook, HookSet};
use crate::page::MigrationsPage;

/// What the dashboard is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Health probe in flight
    Checking,
    /// The probe failed; the operator may retry
    ConnectionError { message: String },
    /// Backend is up but Alembic is not configured
    Onboarding { health: HealthStatus },
    /// Backend is up and configured; the migrations page takes over
    Operational { health: HealthStatus },
}

/// Field-less discriminant of [`Screen`], for events and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Checking,
    ConnectionError,
    Onboarding,
    Operational,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::Checking => ScreenKind::Checking,
            Screen::ConnectionError { .. } => ScreenKind::ConnectionError,
            Screen::Onboarding { .. } => ScreenKind::Onboarding,
            Screen::Operational { .. } => ScreenKind::Operational,
        }
    }

    /// Select the screen for a probe result
    pub fn from_probe(result: Result<HealthStatus, AlembicUiError>) -> Self {
        match result {
            Ok(health) => match health.alembic_config {
                ConfigState::Configured => Screen::Operational { health },
                ConfigState::Unconfigured => Screen::Onboarding { health },
            },
            Err(e) => Screen::ConnectionError {
                message: health_failure_message(&e),
            },
        }
    }
}

fn health_failure_message(err: &AlembicUiError) -> String {
    match err {
        AlembicUiError::HttpStatus { status, detail } => match detail {
            Some(detail) => format!("Health check failed: {}", detail),
            None => format!("Health check failed: HTTP {}", status),
        },
        other => other.to_string(),
    }
}

/// Top-level state selector
///
/// Starts in [`Screen::Checking`]. Every probe is operator-initiated: there
/// are no timers and no automatic retries.
pub struct AppShell<B: MigrationBackend + ?Sized> {
    backend: Arc<B>,
    screen: Screen,
    hooks: HookSet,
}

impl<B: MigrationBackend + ?Sized> AppShell<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            screen: Screen::Checking,
            hooks: HookSet::new(),
        }
    }

    /// Register a hook for shell and page events
    pub fn add_hook(&self, hook: impl DashboardHook + 'static) {
        self.hooks.add(hook);
    }

    pub fn hooks(&self) -> &HookSet {
        &self.hooks
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Enter `Checking`, issue exactly one health probe and select a screen
    pub async fn check(&mut self) -> &Screen {
        self.set_screen(Screen::Checking);
        self.hooks.emit(DashboardEvent::HealthCheckStarted);
        debug!("probing {}", self.backend.describe());

        let result = self.backend.server_health().await;
        if let Err(e) = &result {
            warn!("health check failed: {}", e);
        }

        self.set_screen(Screen::from_probe(result));
        &self.screen
    }

    /// Retry after a connection error
    pub async fn retry(&mut self) -> &Screen {
        self.check().await
    }

    /// Probe again from the onboarding screen
    pub async fn check_again(&mut self) -> &Screen {
        self.check().await
    }

    /// Create the migrations page for the operational screen
    ///
    /// The page shares this shell's backend and hooks. It starts in
    /// `Loading`; call [`MigrationsPage::load`] to fetch.
    pub fn migrations_page(&self) -> MigrationsPage<B> {
        MigrationsPage::with_hooks(Arc::clone(&self.backend), self.hooks.clone())
    }

    fn set_screen(&mut self, screen: Screen) {
        let changed = self.screen.kind() != screen.kind();
        self.screen = screen;
        if changed {
            debug!("screen -> {:?}", self.screen.kind());
            self.hooks.emit(DashboardEvent::ScreenChanged {
                screen: self.screen.kind(),
            });
        }
    }
}
