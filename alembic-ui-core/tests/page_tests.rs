mod common;

use std::sync::Arc;
use std::time::Duration;

use alembic_ui_core::alembic_ui_sdk::{
    check_migration_list, ActionResult, ActionStatus, AlembicUiError, HealthStatus,
    ListViolation, MigrationRecord, MigrationStatusSummary,
};
use alembic_ui_core::test_utils::{
    action_success, http_error, record, status, Endpoint, MockBackend, ScriptedPrompter,
};
use alembic_ui_core::{
    ActionOutcome, ActionsView, Decision, MigrationBackend, MigrationsPage, NoticeLevel,
    PageAction, PageState,
};
use common::EventCollector;

fn three_pending() -> MockBackend {
    MockBackend::new()
        .with_migrations(Ok(vec![
            record("a1", true, false),
            record("b2", false, true),
            record("c3", false, true),
            record("d4", false, true),
        ]))
        .with_status(Ok(status("a1", 4, 3)))
}

async fn loaded_page(backend: &Arc<MockBackend>) -> MigrationsPage<MockBackend> {
    let mut page = MigrationsPage::new(Arc::clone(backend));
    page.load().await;
    assert!(page.snapshot().is_some(), "page should be loaded");
    page
}

// ===== Fetch cycle =====

#[tokio::test]
async fn test_load_success() {
    let backend = Arc::new(three_pending());
    let page = loaded_page(&backend).await;

    let snapshot = page.snapshot().unwrap();
    assert_eq!(snapshot.migrations.len(), 4);
    assert_eq!(snapshot.status.pending_migrations, 3);
    assert!(check_migration_list(&snapshot.migrations).is_ok());
    assert!(snapshot.status.is_consistent());
}

#[tokio::test]
async fn test_status_failure_enters_error_with_detail() {
    let backend = Arc::new(
        MockBackend::new()
            .with_migrations(Ok(vec![record("a1", true, false)]))
            .with_status(Err(http_error(500, Some("Failed to get status: db locked")))),
    );
    let mut page = MigrationsPage::new(Arc::clone(&backend));

    assert_eq!(
        page.load().await,
        &PageState::Error {
            message: "Failed to get status: db locked".to_string()
        }
    );
    assert!(!page.can_apply());
    assert!(!page.can_rollback());
}

#[tokio::test]
async fn test_retry_reissues_both_reads() {
    let backend = Arc::new(
        MockBackend::new()
            .with_migrations(Ok(vec![record("a1", true, false)]))
            .with_status(Err(AlembicUiError::Transport("timed out".to_string())))
            .with_status(Ok(status("a1", 1, 0))),
    );
    let mut page = MigrationsPage::new(Arc::clone(&backend));

    match page.load().await {
        PageState::Error { message } => assert!(message.contains("timed out")),
        other => panic!("expected error state, got {:?}", other),
    }

    assert!(matches!(page.retry().await, PageState::Loaded(_)));
    assert_eq!(backend.call_count(Endpoint::Migrations), 2);
    assert_eq!(backend.call_count(Endpoint::Status), 2);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let backend = Arc::new(three_pending());
    let mut page = loaded_page(&backend).await;
    let first = page.snapshot().cloned().unwrap();

    page.refresh().await;
    let second = page.snapshot().cloned().unwrap();

    assert_eq!(first.migrations, second.migrations);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_ill_formed_list_is_shown_as_sent() {
    let records = vec![record("a1", true, false), record("b2", true, false)];
    assert!(matches!(
        check_migration_list(&records),
        Err(ListViolation::MultipleCurrent { .. })
    ));

    let backend = Arc::new(
        MockBackend::new()
            .with_migrations(Ok(records.clone()))
            .with_status(Ok(status("b2", 2, 0))),
    );
    let page = loaded_page(&backend).await;
    assert_eq!(page.snapshot().unwrap().migrations, records);
}

// ===== Enablement =====

#[tokio::test]
async fn test_apply_enabled_and_labeled_with_pending_count() {
    let backend = Arc::new(three_pending());
    let page = loaded_page(&backend).await;

    assert!(page.can_apply());
    let actions = ActionsView::from_snapshot(page.snapshot().unwrap(), page.in_flight());
    assert!(actions.apply.label.contains('3'));
}

#[tokio::test]
async fn test_apply_disabled_without_pending() {
    let backend = Arc::new(
        MockBackend::new()
            .with_migrations(Ok(vec![record("a1", true, false)]))
            .with_status(Ok(status("a1", 1, 0))),
    );
    let page = loaded_page(&backend).await;

    assert!(!page.can_apply());
    assert!(page.can_rollback());
}

#[tokio::test]
async fn test_rollback_disabled_for_empty_list() {
    let backend = Arc::new(
        MockBackend::new()
            .with_migrations(Ok(vec![]))
            .with_status(Ok(status("No migrations applied", 0, 0))),
    );
    let mut page = loaded_page(&backend).await;
    let prompter = ScriptedPrompter::new();

    assert!(!page.can_rollback());
    assert_eq!(page.rollback_one(&prompter).await, ActionOutcome::Unavailable);
    assert!(prompter.confirms().is_empty());
    assert_eq!(backend.call_count(Endpoint::Downgrade), 0);
}

#[tokio::test]
async fn test_actions_unavailable_while_loading() {
    let backend = Arc::new(three_pending());
    let mut page = MigrationsPage::new(Arc::clone(&backend));
    let prompter = ScriptedPrompter::new();

    assert_eq!(page.apply_pending(&prompter).await, ActionOutcome::Unavailable);
    assert_eq!(backend.total_calls(), 0);
}

// ===== Actions =====

#[tokio::test]
async fn test_upgrade_success_reloads() {
    let backend = Arc::new(
        MockBackend::new()
            .with_migrations(Ok(vec![record("a1", true, false), record("b2", false, true)]))
            .with_migrations(Ok(vec![record("a1", false, false), record("b2", true, false)]))
            .with_status(Ok(status("a1", 2, 1)))
            .with_status(Ok(status("b2", 2, 0)))
            .with_upgrade(Ok(action_success("Successfully upgraded to head revision"))),
    );
    let collector = EventCollector::new();
    let mut page = loaded_page(&backend).await;
    page.add_hook(collector.clone());
    let prompter = ScriptedPrompter::new();

    let outcome = page.apply_pending(&prompter).await;

    assert_eq!(
        outcome,
        ActionOutcome::Completed {
            message: "Successfully upgraded to head revision".to_string()
        }
    );
    assert_eq!(backend.call_count(Endpoint::Upgrade), 1);
    assert_eq!(backend.call_count(Endpoint::Migrations), 2);
    assert_eq!(backend.call_count(Endpoint::Status), 2);

    let snapshot = page.snapshot().unwrap();
    assert!(snapshot.status.is_up_to_date);
    assert_eq!(snapshot.status.current_revision, "b2");
    assert!(!page.in_flight());
    assert!(!page.can_apply());

    let confirms = prompter.confirms();
    assert_eq!(confirms.len(), 1);
    assert_eq!(confirms[0].message, "Apply all pending migrations?");
    assert!(!confirms[0].destructive);

    let notice = prompter.last_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.message, "Successfully upgraded to head revision");

    assert_eq!(
        collector.events(),
        vec![
            "requested:upgrade",
            "completed:upgrade",
            "load_started",
            "load_completed",
        ]
    );
}

#[tokio::test]
async fn test_cancelled_confirmation_sends_nothing() {
    let backend = Arc::new(three_pending());
    let mut page = loaded_page(&backend).await;
    let before = page.snapshot().cloned();
    let prompter = ScriptedPrompter::cancelling();

    assert_eq!(page.apply_pending(&prompter).await, ActionOutcome::Cancelled);
    assert_eq!(page.rollback_one(&prompter).await, ActionOutcome::Cancelled);

    assert_eq!(backend.call_count(Endpoint::Upgrade), 0);
    assert_eq!(backend.call_count(Endpoint::Downgrade), 0);
    assert_eq!(backend.call_count(Endpoint::Migrations), 1);
    assert!(prompter.notices().is_empty());
    assert_eq!(page.snapshot().cloned(), before);
}

#[tokio::test]
async fn test_rollback_confirmation_is_destructive() {
    let backend = Arc::new(three_pending().with_downgrade(Ok(action_success(
        "Successfully downgraded one revision",
    ))));
    let mut page = loaded_page(&backend).await;
    let prompter = ScriptedPrompter::new()
        .then(Decision::Cancelled)
        .then(Decision::Confirmed);

    assert_eq!(page.rollback_one(&prompter).await, ActionOutcome::Cancelled);
    assert!(matches!(
        page.rollback_one(&prompter).await,
        ActionOutcome::Completed { .. }
    ));

    let confirms = prompter.confirms();
    assert_eq!(confirms.len(), 2);
    assert_eq!(confirms[0].action, PageAction::RollbackOne);
    assert_eq!(
        confirms[0].message,
        "Rollback one migration? This cannot be undone!"
    );
    assert!(confirms[0].destructive);
    assert_eq!(backend.call_count(Endpoint::Downgrade), 1);
}

#[tokio::test]
async fn test_failed_upgrade_keeps_snapshot() {
    let backend = Arc::new(three_pending().with_upgrade(Err(http_error(
        500,
        Some("Failed to upgrade: relation already exists"),
    ))));
    let collector = EventCollector::new();
    let mut page = loaded_page(&backend).await;
    page.add_hook(collector.clone());
    let before = page.snapshot().cloned();
    let prompter = ScriptedPrompter::new();

    let outcome = page.apply_pending(&prompter).await;

    assert_eq!(
        outcome,
        ActionOutcome::Failed {
            message: "Failed to upgrade: relation already exists".to_string()
        }
    );
    assert_eq!(page.snapshot().cloned(), before);
    assert_eq!(backend.call_count(Endpoint::Migrations), 1);
    assert!(!page.in_flight());
    assert!(page.can_apply());

    let notice = prompter.last_notice().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(collector.events(), vec!["requested:upgrade", "failed:upgrade"]);
}

#[tokio::test]
async fn test_failed_downgrade_without_detail_uses_fallback() {
    let backend = Arc::new(
        three_pending().with_downgrade(Err(AlembicUiError::Transport("reset".to_string()))),
    );
    let mut page = loaded_page(&backend).await;
    let prompter = ScriptedPrompter::new();

    assert_eq!(
        page.rollback_one(&prompter).await,
        ActionOutcome::Failed {
            message: "Failed to downgrade migration".to_string()
        }
    );
    assert_eq!(
        prompter.last_notice().unwrap().message,
        "Failed to downgrade migration"
    );
}

#[tokio::test]
async fn test_error_status_in_2xx_body_is_failure() {
    let backend = Arc::new(three_pending().with_upgrade(Ok(ActionResult {
        status: ActionStatus::Error,
        message: "Failed to upgrade: lock timeout".to_string(),
    })));
    let mut page = loaded_page(&backend).await;
    let prompter = ScriptedPrompter::new();

    assert_eq!(
        page.apply_pending(&prompter).await,
        ActionOutcome::Failed {
            message: "Failed to upgrade: lock timeout".to_string()
        }
    );
    assert_eq!(backend.call_count(Endpoint::Migrations), 1);
}

#[tokio::test]
async fn test_reload_failure_after_successful_action() {
    let backend = Arc::new(
        MockBackend::new()
            .with_migrations(Ok(vec![record("a1", true, false)]))
            .with_status(Ok(status("a1", 1, 0)))
            .with_status(Err(http_error(500, None)))
            .with_downgrade(Ok(action_success("Successfully downgraded one revision"))),
    );
    let mut page = loaded_page(&backend).await;
    let prompter = ScriptedPrompter::new();

    assert!(matches!(
        page.rollback_one(&prompter).await,
        ActionOutcome::Completed { .. }
    ));
    assert!(matches!(page.state(), PageState::Error { .. }));
    assert!(!page.in_flight());
}

/// Backend whose upgrade request never completes
struct StalledUpgrade(MockBackend);

#[async_trait::async_trait]
impl MigrationBackend for StalledUpgrade {
    async fn server_health(&self) -> Result<HealthStatus, AlembicUiError> {
        self.0.server_health().await
    }

    async fn migrations(&self) -> Result<Vec<MigrationRecord>, AlembicUiError> {
        self.0.migrations().await
    }

    async fn status(&self) -> Result<MigrationStatusSummary, AlembicUiError> {
        self.0.status().await
    }

    async fn upgrade(&self) -> Result<ActionResult, AlembicUiError> {
        std::future::pending().await
    }

    async fn downgrade(&self) -> Result<ActionResult, AlembicUiError> {
        self.0.downgrade().await
    }
}

#[tokio::test]
async fn test_dropped_action_clears_in_flight() {
    let backend = Arc::new(StalledUpgrade(
        three_pending().with_downgrade(Ok(action_success("Successfully downgraded one revision"))),
    ));
    let mut page = MigrationsPage::new(Arc::clone(&backend));
    page.load().await;
    let prompter = ScriptedPrompter::new();

    let timed_out =
        tokio::time::timeout(Duration::from_millis(50), page.apply_pending(&prompter)).await;
    assert!(timed_out.is_err(), "upgrade should still be pending");

    assert!(!page.in_flight());
    assert!(page.can_apply());
    assert!(page.can_rollback());
    assert!(prompter.notices().is_empty());

    page.refresh().await;
    assert!(page.can_apply());
    assert!(matches!(
        page.rollback_one(&prompter).await,
        ActionOutcome::Completed { .. }
    ));
}
