//! Persistent status line display

use std::io::{stdout, Write};
use std::sync::Arc;

use alembic_ui_core::{DashboardEvent, DashboardHook, ScreenKind};
use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand, QueueableCommand,
};
use parking_lot::Mutex;

/// What the status line reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardStatus {
    Checking,
    Disconnected,
    Unconfigured,
    Connected,
    Loading,
    UpToDate { total: usize },
    Pending { pending: u64, total: usize },
    LoadFailed,
}

impl DashboardStatus {
    /// Next status after `event`
    pub fn apply(self, event: &DashboardEvent) -> Self {
        match event {
            DashboardEvent::HealthCheckStarted => Self::Checking,
            DashboardEvent::ScreenChanged { screen } => match screen {
                ScreenKind::Checking => Self::Checking,
                ScreenKind::ConnectionError => Self::Disconnected,
                ScreenKind::Onboarding => Self::Unconfigured,
                ScreenKind::Operational => Self::Connected,
            },
            DashboardEvent::LoadStarted => Self::Loading,
            DashboardEvent::LoadCompleted {
                migrations,
                pending,
                is_up_to_date,
                ..
            } => {
                if *is_up_to_date {
                    Self::UpToDate { total: *migrations }
                } else {
                    Self::Pending {
                        pending: *pending,
                        total: *migrations,
                    }
                }
            }
            DashboardEvent::LoadFailed { .. } => Self::LoadFailed,
            // Actions only change what is shown once the page reloads
            _ => self,
        }
    }
}

/// Hook that keeps the latest [`DashboardStatus`]
#[derive(Clone)]
pub struct StatusTracker {
    status: Arc<Mutex<DashboardStatus>>,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            status: Arc::new(Mutex::new(DashboardStatus::Checking)),
        }
    }

    pub fn status(&self) -> DashboardStatus {
        *self.status.lock()
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardHook for StatusTracker {
    fn on_event(&self, event: &DashboardEvent) {
        let mut status = self.status.lock();
        *status = status.apply(event);
    }
}

/// ANSI color codes for status display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusColors {
    /// Foreground color ANSI code
    pub fg: &'static str,
    /// Background color ANSI code
    pub bg: &'static str,
}

impl StatusColors {
    /// Red text on dark red background (backend unreachable or load failed)
    pub const CRITICAL: Self = Self {
        fg: "\x1b[31m",
        bg: "\x1b[48;5;52m",
    };

    /// Yellow text on dark yellow background (pending migrations, unconfigured)
    pub const WARNING: Self = Self {
        fg: "\x1b[33m",
        bg: "\x1b[48;5;58m",
    };

    /// White text on gray background (normal)
    pub const NORMAL: Self = Self {
        fg: "\x1b[37m",
        bg: "\x1b[48;5;236m",
    };
}

pub fn select_status_colors(status: DashboardStatus) -> StatusColors {
    match status {
        DashboardStatus::Disconnected | DashboardStatus::LoadFailed => StatusColors::CRITICAL,
        DashboardStatus::Pending { .. } | DashboardStatus::Unconfigured => StatusColors::WARNING,
        _ => StatusColors::NORMAL,
    }
}

pub fn format_status_text(status: DashboardStatus, api_base: &str) -> String {
    let state = match status {
        DashboardStatus::Checking => "checking backend".to_string(),
        DashboardStatus::Disconnected => "backend unreachable".to_string(),
        DashboardStatus::Unconfigured => "alembic not configured".to_string(),
        DashboardStatus::Connected => "connected".to_string(),
        DashboardStatus::Loading => "loading".to_string(),
        DashboardStatus::UpToDate { total } => {
            format!("up to date · {} migrations", total)
        }
        DashboardStatus::Pending { pending, total } => {
            format!("{} pending · {} migrations", pending, total)
        }
        DashboardStatus::LoadFailed => "failed to load migrations".to_string(),
    };
    format!("  {} · {}", api_base, state)
}

/// Update persistent status line at bottom of terminal
pub fn update_status_line(status: DashboardStatus, api_base: &str) {
    let Ok((width, height)) = terminal::size() else {
        return;
    };

    let mut stdout = stdout();
    let colors = select_status_colors(status);
    let status_text = format_status_text(status, api_base);

    let _ = stdout.queue(cursor::SavePosition);
    let _ = stdout.queue(cursor::MoveTo(0, height.saturating_sub(1)));

    let _ = write!(stdout, "{}{}{}", colors.bg, colors.fg, status_text);
    let padding = (width as usize).saturating_sub(status_text.chars().count());
    if padding > 0 {
        let _ = write!(stdout, "{}", " ".repeat(padding));
    }
    let _ = write!(stdout, "\x1b[0m");

    let _ = stdout.queue(cursor::RestorePosition);
    let _ = stdout.flush();
}

/// Clear the persistent status line
pub fn clear_status_line() {
    if let Ok((_, height)) = terminal::size() {
        let mut stdout = stdout();
        let _ = stdout.queue(cursor::SavePosition);
        let _ = stdout.queue(cursor::MoveTo(0, height.saturating_sub(1)));
        let _ = stdout.execute(terminal::Clear(ClearType::CurrentLine));
        let _ = stdout.queue(cursor::RestorePosition);
        let _ = stdout.flush();
    }
}
