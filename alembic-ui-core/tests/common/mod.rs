#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use alembic_ui_core::{DashboardEvent, DashboardHook};

/// Collects event names in delivery order
#[derive(Clone, Default)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.events().iter().filter(|e| e.as_str() == name).count()
    }
}

impl DashboardHook for EventCollector {
    fn on_event(&self, event: &DashboardEvent) {
        let name = match event {
            DashboardEvent::HealthCheckStarted => "health_check_started".to_string(),
            DashboardEvent::ScreenChanged { screen } => format!("screen:{:?}", screen),
            DashboardEvent::LoadStarted => "load_started".to_string(),
            DashboardEvent::LoadCompleted { .. } => "load_completed".to_string(),
            DashboardEvent::LoadFailed { .. } => "load_failed".to_string(),
            DashboardEvent::ActionRequested { action } => format!("requested:{}", action),
            DashboardEvent::ActionCancelled { action } => format!("cancelled:{}", action),
            DashboardEvent::ActionCompleted { action, .. } => format!("completed:{}", action),
            DashboardEvent::ActionFailed { action, .. } => format!("failed:{}", action),
        };
        self.events.lock().unwrap().push(name);
    }
}
