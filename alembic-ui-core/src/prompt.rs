//! Confirmation and acknowledgement seam
//!
//! Destructive actions ask the operator before doing anything, and the
//! backend's answer is shown as a blocking notice. Both go through
//! [`Prompter`] so the page never depends on a particular front-end.

use crate::page::PageAction;

// =============================================================================
// Core Types
// =============================================================================

/// A yes/no question put to the operator before an action runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    /// The action awaiting confirmation
    pub action: PageAction,
    /// Question text
    pub message: String,
    /// True if the action cannot be undone from the dashboard
    pub destructive: bool,
}

/// The operator's answer to a [`ConfirmRequest`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Cancelled,
}

impl Decision {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Decision::Confirmed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message the operator must acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Trait for confirmation front-ends
///
/// Implement this to put confirmations in front of the operator. Both methods
/// block until the operator has answered.
pub trait Prompter: Send + Sync {
    /// Ask the operator and return their decision
    fn confirm(&self, request: &ConfirmRequest) -> Decision;

    /// Show a notice and wait until it is dismissed
    fn acknowledge(&self, notice: &Notice);

    /// Human-readable name for this prompter
    fn name(&self) -> &'static str;
}

// =============================================================================
// Non-interactive Prompters
// =============================================================================

/// Confirms everything and logs notices
///
/// For scripted, non-interactive runs.
pub struct AutoConfirm;

impl Prompter for AutoConfirm {
    fn confirm(&self, request: &ConfirmRequest) -> Decision {
        log::info!("auto-confirming: {}", request.message);
        Decision::Confirmed
    }

    fn acknowledge(&self, notice: &Notice) {
        log_notice(notice);
    }

    fn name(&self) -> &'static str {
        "AutoConfirm"
    }
}

/// Declines everything; actions never reach the backend
pub struct AutoCancel;

impl Prompter for AutoCancel {
    fn confirm(&self, request: &ConfirmRequest) -> Decision {
        log::info!("declining: {}", request.message);
        Decision::Cancelled
    }

    fn acknowledge(&self, notice: &Notice) {
        log_notice(notice);
    }

    fn name(&self) -> &'static str {
        "AutoCancel"
    }
}

fn log_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Info => log::info!("{}", notice.message),
        NoticeLevel::Error => log::warn!("{}", notice.message),
    }
}
