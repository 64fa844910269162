//! Migration records, status summaries and action results

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel the backend reports as `current_revision` before any migration ran
pub const NO_MIGRATIONS_APPLIED: &str = "No migrations applied";

// ============================================================================
// Migration Records
// ============================================================================

/// A single revision as reported by `GET /alembic/migrations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationRecord {
    /// Unique revision identifier
    pub revision: String,

    /// Parent revision, `None` for the root
    #[serde(default)]
    pub down_revision: Option<String>,

    /// Revision docstring
    pub message: String,

    /// True for the revision the database is at
    #[serde(default)]
    pub is_current: bool,

    /// True for revisions not yet applied
    #[serde(default)]
    pub is_pending: bool,

    /// ISO-8601 timestamp of the revision file, display only
    #[serde(default)]
    pub created_date: Option<String>,
}

/// Display state of a record, derived from its two flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordState {
    /// Applied, and the database is at this revision
    Current,
    /// Not yet applied
    Pending,
    /// Applied earlier in history
    Applied,
}

impl MigrationRecord {
    /// Classify this record
    ///
    /// `is_current` wins over `is_pending` for records that violate the
    /// mutual-exclusion invariant.
    pub fn state(&self) -> RecordState {
        match (self.is_current, self.is_pending) {
            (true, _) => RecordState::Current,
            (false, true) => RecordState::Pending,
            (false, false) => RecordState::Applied,
        }
    }

    /// Returns true if this revision has no parent
    pub fn is_root(&self) -> bool {
        self.down_revision.is_none()
    }
}

/// A well-formedness violation in a fetched migration list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListViolation {
    /// More than one record claims to be current
    MultipleCurrent {
        /// Revisions flagged current, in list order
        revisions: Vec<String>,
    },
    /// A record is flagged both current and pending
    CurrentAndPending {
        /// The offending revision
        revision: String,
    },
}

impl fmt::Display for ListViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListViolation::MultipleCurrent { revisions } => {
                write!(f, "multiple current revisions: {}", revisions.join(", "))
            }
            ListViolation::CurrentAndPending { revision } => {
                write!(f, "revision {} is both current and pending", revision)
            }
        }
    }
}

/// Check the list-level invariants of a fetched migration list
///
/// At most one record is current, and no record is both current and pending.
pub fn check_migration_list(records: &[MigrationRecord]) -> Result<(), ListViolation> {
    if let Some(record) = records.iter().find(|r| r.is_current && r.is_pending) {
        return Err(ListViolation::CurrentAndPending {
            revision: record.revision.clone(),
        });
    }

    let current: Vec<String> = records
        .iter()
        .filter(|r| r.is_current)
        .map(|r| r.revision.clone())
        .collect();

    if current.len() > 1 {
        return Err(ListViolation::MultipleCurrent { revisions: current });
    }

    Ok(())
}

// ============================================================================
// Status Summary
// ============================================================================

/// Summary returned by `GET /alembic/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationStatusSummary {
    /// Revision the database is at, or [`NO_MIGRATIONS_APPLIED`]
    pub current_revision: String,

    /// Number of known revisions
    pub total_migrations: u64,

    /// Number of revisions not yet applied
    pub pending_migrations: u64,

    /// Backend-computed `pending_migrations == 0`
    pub is_up_to_date: bool,
}

impl MigrationStatusSummary {
    /// Returns true if the database has no applied revision yet
    pub fn is_uninitialized(&self) -> bool {
        let current = self.current_revision.trim();
        current.is_empty() || current == NO_MIGRATIONS_APPLIED
    }

    /// Returns true if the summary satisfies its counting invariants
    ///
    /// Diagnostic only: the dashboard always shows `is_up_to_date` as sent.
    pub fn is_consistent(&self) -> bool {
        self.pending_migrations <= self.total_migrations
            && self.is_up_to_date == (self.pending_migrations == 0)
    }
}

// ============================================================================
// Action Results
// ============================================================================

/// Outcome reported by the backend for upgrade/downgrade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Error,
    #[serde(other)]
    Other,
}

/// Body of `POST /alembic/upgrade` and `POST /alembic/downgrade`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub status: ActionStatus,
    #[serde(default)]
    pub message: String,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }
}
