//! Presentation model for the operational view
//!
//! Pure functions from fetched snapshots to what a front-end draws. Nothing
//! here is recomputed from the list: counts and the up-to-date flag come from
//! the status summary exactly as the backend sent them.

use alembic_ui_sdk::{MigrationRecord, MigrationStatusSummary, RecordState};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::page::{PageAction, Snapshot};

/// Number of characters of a revision shown in the status card
pub const SHORT_REVISION_LEN: usize = 12;

pub const EMPTY_TIMELINE_MESSAGE: &str = "No migrations found";

/// Shorten a revision for display, respecting char boundaries
pub fn short_revision(revision: &str) -> &str {
    match revision.char_indices().nth(SHORT_REVISION_LEN) {
        Some((idx, _)) => &revision[..idx],
        None => revision,
    }
}

/// Render an ISO-8601 timestamp as a local `YYYY-MM-DD` date
///
/// Timestamps with an offset are converted to local time; naive ones are
/// taken as already local. Unparseable text is returned unchanged.
pub fn format_created_date(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format("%Y-%m-%d").to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }

    raw.to_string()
}

// ============================================================================
// Status Card
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    UpToDate,
    Pending,
}

impl StatusBadge {
    pub fn label(&self) -> &'static str {
        match self {
            StatusBadge::UpToDate => "Up to date",
            StatusBadge::Pending => "Pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    /// First twelve characters of the current revision
    pub current_revision: String,
    pub total_migrations: u64,
    pub pending_migrations: u64,
    pub badge: StatusBadge,
    pub has_pending: bool,
}

impl StatusView {
    pub fn from_summary(summary: &MigrationStatusSummary) -> Self {
        Self {
            current_revision: short_revision(&summary.current_revision).to_string(),
            total_migrations: summary.total_migrations,
            pending_migrations: summary.pending_migrations,
            badge: if summary.is_up_to_date {
                StatusBadge::UpToDate
            } else {
                StatusBadge::Pending
            },
            has_pending: summary.pending_migrations > 0,
        }
    }
}

// ============================================================================
// Action Bar
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub action: PageAction,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionsView {
    pub apply: ActionButton,
    pub rollback: ActionButton,
}

impl ActionsView {
    pub fn from_snapshot(snapshot: &Snapshot, in_flight: bool) -> Self {
        let pending = snapshot.status.pending_migrations;
        let apply_enabled = !in_flight && pending > 0;
        let apply_label = if pending > 0 {
            format!("Apply Migrations ({})", pending)
        } else {
            "Apply Migrations".to_string()
        };

        Self {
            apply: ActionButton {
                action: PageAction::ApplyPending,
                label: apply_label,
                enabled: apply_enabled,
            },
            rollback: ActionButton {
                action: PageAction::RollbackOne,
                label: "Rollback One".to_string(),
                enabled: !in_flight && !snapshot.migrations.is_empty(),
            },
        }
    }
}

// ============================================================================
// Timeline
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowMarker {
    AppliedCurrent,
    Pending,
    AppliedHistorical,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRowView {
    pub marker: RowMarker,
    pub badge: Option<&'static str>,
    pub revision: String,
    pub message: String,
    /// Parent revision, shown as-is
    pub parent: Option<String>,
    pub created: Option<String>,
}

impl MigrationRowView {
    pub fn from_record(record: &MigrationRecord) -> Self {
        let (marker, badge) = match record.state() {
            RecordState::Current => (RowMarker::AppliedCurrent, Some("CURRENT")),
            RecordState::Pending => (RowMarker::Pending, Some("PENDING")),
            RecordState::Applied => (RowMarker::AppliedHistorical, None),
        };

        Self {
            marker,
            badge,
            revision: record.revision.clone(),
            message: record.message.clone(),
            parent: record.down_revision.clone(),
            created: record.created_date.as_deref().map(format_created_date),
        }
    }
}

/// Rows in server order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimelineView {
    pub rows: Vec<MigrationRowView>,
}

impl TimelineView {
    pub fn from_records(records: &[MigrationRecord]) -> Self {
        Self {
            rows: records.iter().map(MigrationRowView::from_record).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
