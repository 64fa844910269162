use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::page::PageAction;
use crate::shell::ScreenKind;

/// Events emitted by the shell and the migrations page
///
/// These let a front-end observe fetches and actions without owning the
/// page, e.g. to keep a status line current.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    // ===== Shell =====
    /// Health probe issued
    HealthCheckStarted,

    /// The shell switched screens
    ScreenChanged {
        /// The screen now shown
        screen: ScreenKind,
    },

    // ===== Page Fetch Cycle =====
    /// List and status requested
    LoadStarted,

    /// Both reads succeeded
    LoadCompleted {
        /// Number of records in the list
        migrations: usize,
        /// Pending count as reported by the backend
        pending: u64,
        /// Backend-reported up-to-date flag
        is_up_to_date: bool,
        /// Time taken by the joined reads
        duration: Duration,
    },

    /// At least one read failed
    LoadFailed {
        /// Message shown to the operator
        error: String,
        /// How long before failure
        duration: Duration,
    },

    // ===== Actions =====
    /// Operator asked for an action (before confirmation)
    ActionRequested {
        action: PageAction,
    },

    /// Operator declined the confirmation
    ActionCancelled {
        action: PageAction,
    },

    /// Backend reported success
    ActionCompleted {
        action: PageAction,
        /// Backend message
        message: String,
        duration: Duration,
    },

    /// Request failed or backend reported an error
    ActionFailed {
        action: PageAction,
        /// Message shown to the operator
        error: String,
        duration: Duration,
    },
}

/// Hook for observing dashboard events
///
/// # Example
/// ```
/// use alembic_ui_core::events::{DashboardEvent, DashboardHook};
///
/// struct Logger;
///
/// impl DashboardHook for Logger {
///     fn on_event(&self, event: &DashboardEvent) {
///         if let DashboardEvent::LoadFailed { error, .. } = event {
///             eprintln!("load failed: {}", error);
///         }
///     }
/// }
/// ```
pub trait DashboardHook: Send + Sync {
    /// Called when an event occurs
    fn on_event(&self, event: &DashboardEvent);
}

/// Blanket implementation for closures
impl<F> DashboardHook for F
where
    F: Fn(&DashboardEvent) + Send + Sync,
{
    fn on_event(&self, event: &DashboardEvent) {
        self(event)
    }
}

/// Shared, cloneable list of hooks
///
/// The shell hands a clone to every page it creates, so hooks registered once
/// observe the whole session.
#[derive(Clone, Default)]
pub struct HookSet {
    hooks: Arc<RwLock<Vec<Arc<dyn DashboardHook>>>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook
    pub fn add(&self, hook: impl DashboardHook + 'static) {
        self.hooks.write().push(Arc::new(hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.read().is_empty()
    }

    /// Deliver an event to every hook, in registration order
    pub fn emit(&self, event: DashboardEvent) {
        for hook in self.hooks.read().iter() {
            hook.on_event(&event);
        }
    }
}

impl std::fmt::Debug for HookSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookSet").field("len", &self.len()).finish()
    }
}
