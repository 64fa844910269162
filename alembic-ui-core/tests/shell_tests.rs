mod common;

use std::sync::Arc;

use alembic_ui_core::alembic_ui_sdk::{AlembicUiError, HealthStatus};
use alembic_ui_core::test_utils::{
    configured_health, http_error, record, status, unconfigured_health, Endpoint, MockBackend,
};
use alembic_ui_core::{AppShell, PageState, Screen, ScreenKind};
use common::EventCollector;

fn health_from_json(value: serde_json::Value) -> HealthStatus {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_shell_starts_checking() {
    let shell = AppShell::new(Arc::new(MockBackend::new()));
    assert_eq!(shell.screen(), &Screen::Checking);
}

#[tokio::test]
async fn test_unconfigured_health_shows_onboarding() {
    let health = health_from_json(serde_json::json!({
        "status": "ok",
        "database": "ok",
        "alembic_config": "unconfigured"
    }));
    let backend = Arc::new(MockBackend::new().with_health(Ok(health)));
    let mut shell = AppShell::new(Arc::clone(&backend));

    let screen = shell.check().await;
    assert_eq!(screen.kind(), ScreenKind::Onboarding);

    // Onboarding never touches the migration endpoints
    assert_eq!(backend.call_count(Endpoint::Health), 1);
    assert_eq!(backend.call_count(Endpoint::Migrations), 0);
    assert_eq!(backend.call_count(Endpoint::Status), 0);
}

#[tokio::test]
async fn test_backend_not_configured_string_shows_onboarding() {
    let health = health_from_json(serde_json::json!({
        "status": "healthy",
        "database": "connected",
        "alembic_config": "not configured"
    }));
    let mut shell = AppShell::new(Arc::new(MockBackend::new().with_health(Ok(health))));
    assert_eq!(shell.check().await.kind(), ScreenKind::Onboarding);
}

#[tokio::test]
async fn test_configured_health_loads_once() {
    let health = health_from_json(serde_json::json!({
        "status": "ok",
        "database": "ok",
        "alembic_config": "configured"
    }));
    let backend = Arc::new(
        MockBackend::new()
            .with_health(Ok(health))
            .with_migrations(Ok(vec![record("a1", true, false)]))
            .with_status(Ok(status("a1", 1, 0))),
    );
    let mut shell = AppShell::new(Arc::clone(&backend));

    assert_eq!(shell.check().await.kind(), ScreenKind::Operational);

    let mut page = shell.migrations_page();
    assert!(page.state().is_loading());
    assert!(matches!(page.load().await, PageState::Loaded(_)));

    assert_eq!(backend.call_count(Endpoint::Migrations), 1);
    assert_eq!(backend.call_count(Endpoint::Status), 1);
}

#[tokio::test]
async fn test_connection_error_then_retry() {
    let backend = Arc::new(
        MockBackend::new()
            .with_health(Err(AlembicUiError::Transport(
                "Connection failed: connection refused".to_string(),
            )))
            .with_health(Ok(configured_health())),
    );
    let mut shell = AppShell::new(Arc::clone(&backend));

    match shell.check().await {
        Screen::ConnectionError { message } => assert!(message.contains("connection refused")),
        other => panic!("expected connection error, got {:?}", other),
    }

    assert_eq!(shell.retry().await.kind(), ScreenKind::Operational);
    assert_eq!(backend.call_count(Endpoint::Health), 2);
}

#[tokio::test]
async fn test_non_2xx_health_is_connection_error() {
    let backend = Arc::new(MockBackend::new().with_health(Err(http_error(503, None))));
    let mut shell = AppShell::new(backend);

    assert_eq!(
        shell.check().await,
        &Screen::ConnectionError {
            message: "Health check failed: HTTP 503".to_string()
        }
    );
}

#[tokio::test]
async fn test_check_again_after_configuring() {
    let backend = Arc::new(
        MockBackend::new()
            .with_health(Ok(unconfigured_health()))
            .with_health(Ok(configured_health())),
    );
    let mut shell = AppShell::new(Arc::clone(&backend));

    assert_eq!(shell.check().await.kind(), ScreenKind::Onboarding);
    assert_eq!(shell.check_again().await.kind(), ScreenKind::Operational);
    assert_eq!(backend.call_count(Endpoint::Health), 2);
}

#[tokio::test]
async fn test_shell_events() {
    let backend = Arc::new(
        MockBackend::new()
            .with_health(Ok(unconfigured_health()))
            .with_health(Ok(unconfigured_health())),
    );
    let collector = EventCollector::new();
    let mut shell = AppShell::new(backend);
    shell.add_hook(collector.clone());

    shell.check().await;
    shell.check_again().await;

    assert_eq!(
        collector.events(),
        vec![
            "health_check_started",
            "screen:Onboarding",
            "screen:Checking",
            "health_check_started",
            "screen:Onboarding",
        ]
    );
}

#[tokio::test]
async fn test_page_shares_shell_hooks() {
    let backend = Arc::new(
        MockBackend::new()
            .with_health(Ok(configured_health()))
            .with_migrations(Ok(vec![]))
            .with_status(Ok(status("No migrations applied", 0, 0))),
    );
    let collector = EventCollector::new();
    let mut shell = AppShell::new(backend);
    shell.add_hook(collector.clone());

    shell.check().await;
    let mut page = shell.migrations_page();
    page.load().await;

    assert_eq!(collector.count("load_started"), 1);
    assert_eq!(collector.count("load_completed"), 1);
}
