//! Interactive terminal dashboard

mod commands;
mod input;
mod prompter;
mod render;
mod spinner;
mod status;

use std::sync::Arc;

use alembic_ui_core::alembic_ui_sdk::AlembicApi;
use alembic_ui_core::{
    ActionOutcome, AppShell, DashboardConfig, MigrationsPage, PageAction, PageState, Prompter,
    Screen, ScreenKind,
};
use log::debug;
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::{CompletionType, Editor};

use crate::error::CliError;
use commands::{help, unknown_command_message, DashboardCommand};
use input::DashboardHelper;
use render::{
    format_target, format_tip, format_welcome_header, input_prompt, render_page, render_screen,
    RESET,
};
use spinner::Spinner;
use status::{clear_status_line, update_status_line, StatusTracker};

pub use commands::SLASH_COMMANDS;
pub use prompter::TerminalPrompter;
pub use status::DashboardStatus;

/// Shell, page and terminal bookkeeping for one session
struct Dashboard {
    shell: AppShell<AlembicApi>,
    page: Option<MigrationsPage<AlembicApi>>,
    tracker: StatusTracker,
    api_base: String,
    server_base: String,
    interactive: bool,
}

impl Dashboard {
    fn new(client: AlembicApi, interactive: bool) -> Self {
        let api_base = client.api_base().to_string();
        let server_base = client.server_base().to_string();
        let shell = AppShell::new(Arc::new(client));
        let tracker = StatusTracker::new();
        shell.add_hook(tracker.clone());

        Self {
            shell,
            page: None,
            tracker,
            api_base,
            server_base,
            interactive,
        }
    }

    /// Probe the backend and show the resulting screen
    async fn check(&mut self) {
        self.page = None;

        if self.interactive {
            let spinner = Spinner::new("Checking configuration...");
            self.shell.check().await;
            spinner.stop().await;
        } else {
            self.shell.check().await;
        }

        print!("{}", render_screen(self.shell.screen(), &self.server_base));

        if let Screen::Operational { .. } = self.shell.screen() {
            self.page = Some(self.shell.migrations_page());
            self.reload().await;
        }
    }

    /// Fetch and show the migrations page
    async fn reload(&mut self) {
        let interactive = self.interactive;
        let Some(page) = self.page.as_mut() else {
            return;
        };

        if interactive {
            let spinner = Spinner::new("Loading migrations...");
            page.load().await;
            spinner.stop().await;
        } else {
            page.load().await;
        }
        print!("{}", render_page(page.state(), page.in_flight()));
    }

    async fn run_action(&mut self, action: PageAction, prompter: &dyn Prompter) {
        let Some(page) = self.page.as_mut() else {
            println!("{}", not_operational_hint(self.shell.screen().kind()));
            return;
        };

        match page.run_action(action, prompter).await {
            ActionOutcome::Unavailable => println!("{}", unavailable_message(action, page)),
            ActionOutcome::Cancelled => {}
            // The action has settled by now, so the page is idle
            ActionOutcome::Completed { .. } | ActionOutcome::Failed { .. } => {
                print!("{}", render_page(page.state(), false));
            }
        }
    }

    async fn retry(&mut self) {
        match self.shell.screen().kind() {
            ScreenKind::ConnectionError | ScreenKind::Checking => self.check().await,
            ScreenKind::Operational => {
                let loaded = self
                    .page
                    .as_ref()
                    .is_some_and(|p| !matches!(p.state(), PageState::Error { .. }));
                if loaded {
                    println!("Nothing to retry. Use /refresh to reload.");
                } else {
                    self.reload_or_check().await;
                }
            }
            ScreenKind::Onboarding => println!("Use /check once Alembic is configured."),
        }
    }

    async fn reload_or_check(&mut self) {
        if self.page.is_some() {
            self.reload().await;
        } else {
            self.check().await;
        }
    }

    async fn refresh(&mut self) {
        if self.page.is_some() {
            self.reload().await;
        } else {
            println!("{}", not_operational_hint(self.shell.screen().kind()));
        }
    }

    fn status_line(&self) {
        update_status_line(self.tracker.status(), &self.api_base);
    }
}

fn not_operational_hint(screen: ScreenKind) -> &'static str {
    match screen {
        ScreenKind::ConnectionError => "The backend is unreachable. Use /retry to connect.",
        ScreenKind::Onboarding => "Alembic is not configured yet. Use /check after configuring it.",
        _ => "Migrations are not loaded yet.",
    }
}

fn unavailable_message(action: PageAction, page: &MigrationsPage<AlembicApi>) -> &'static str {
    if page.in_flight() {
        return "Another action is still running.";
    }
    match (action, page.state()) {
        (_, PageState::Loading) => "Migrations are still loading.",
        (_, PageState::Error { .. }) => "Migrations failed to load. Use /retry first.",
        (PageAction::ApplyPending, PageState::Loaded(_)) => "No pending migrations to apply.",
        (PageAction::RollbackOne, PageState::Loaded(_)) => "No migrations to roll back.",
    }
}

/// Run the interactive dashboard
///
/// This provides a command-line interface with:
/// - The backend screen (connection error, onboarding or migrations)
/// - Slash commands with Tab completion
/// - Up/down arrow history and Ctrl+R reverse search
/// - A persistent status line
///
/// # Errors
///
/// Returns `CliError` which can be:
/// - `Config` - The configuration does not produce a valid client
/// - `Readline` - Input/readline errors
/// - `Io` - Filesystem errors (history loading/saving)
pub async fn run_dashboard(config: DashboardConfig) -> Result<(), CliError> {
    let client = config.client()?;
    let mut dashboard = Dashboard::new(client, true);
    let prompter = TerminalPrompter::new();

    println!("\n{}", format_welcome_header());
    println!("{}", format_target(&dashboard.api_base));
    println!("{}\n", format_tip());

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();
    let mut rl: Editor<DashboardHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(rl_config)?;
    rl.set_helper(Some(DashboardHelper));

    let history_path = dirs::cache_dir()
        .map(|p| p.join("alembic-ui/history.txt"))
        .unwrap_or_else(|| ".alembic-ui/history.txt".into());

    if history_path.exists() {
        rl.load_history(&history_path).ok();
    }

    dashboard.check().await;

    loop {
        dashboard.status_line();

        let readline = rl.readline(input_prompt());
        print!("{}", RESET);

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                let command = DashboardCommand::parse(line);
                debug!("command: {:?}", command);

                match command {
                    DashboardCommand::Quit => break,
                    DashboardCommand::Help => print!("{}", help::full_text()),
                    DashboardCommand::Refresh => dashboard.refresh().await,
                    DashboardCommand::Retry => dashboard.retry().await,
                    DashboardCommand::Check => dashboard.check().await,
                    DashboardCommand::Upgrade => {
                        dashboard.run_action(PageAction::ApplyPending, &prompter).await
                    }
                    DashboardCommand::Downgrade => {
                        dashboard.run_action(PageAction::RollbackOne, &prompter).await
                    }
                    DashboardCommand::Unknown(other) => {
                        eprintln!("{}", unknown_command_message(other))
                    }
                    DashboardCommand::Empty => continue,
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    clear_status_line();

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    rl.save_history(&history_path)?;

    println!("\n👋 Goodbye!\n");
    Ok(())
}

/// Result of a single non-interactive pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnceOutcome {
    /// Migrations loaded
    Operational,
    /// Backend reachable but Alembic not configured
    Onboarding,
    ConnectionError,
    LoadFailed,
}

impl OnceOutcome {
    /// Process exit code for scripts
    pub fn exit_code(&self) -> u8 {
        match self {
            OnceOutcome::Operational | OnceOutcome::Onboarding => 0,
            OnceOutcome::ConnectionError | OnceOutcome::LoadFailed => 1,
        }
    }
}

/// Probe, load and print the current screen once, without prompting
pub async fn run_once(config: DashboardConfig) -> Result<OnceOutcome, CliError> {
    let client = config.client()?;
    let mut dashboard = Dashboard::new(client, false);

    println!("{}", format_target(&dashboard.api_base));
    dashboard.check().await;

    let outcome = match dashboard.shell.screen().kind() {
        ScreenKind::Onboarding => OnceOutcome::Onboarding,
        ScreenKind::Operational => match dashboard.page.as_ref().map(|p| p.state()) {
            Some(PageState::Loaded(_)) => OnceOutcome::Operational,
            _ => OnceOutcome::LoadFailed,
        },
        ScreenKind::ConnectionError | ScreenKind::Checking => OnceOutcome::ConnectionError,
    };
    Ok(outcome)
}
