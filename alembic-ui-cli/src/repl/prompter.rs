//! Terminal confirmation prompts
//!
//! Confirmation defaults to "no": anything but an explicit yes cancels.

use std::io::{stdout, BufRead, Write};

use alembic_ui_core::{ConfirmRequest, Decision, Notice, NoticeLevel, PageAction, Prompter};
use parking_lot::Mutex;

use super::spinner::Spinner;

/// Asks `[y/N]` on stdin and waits for Enter on notices
///
/// A confirmed action shows a spinner until its outcome is acknowledged.
#[derive(Default)]
pub struct TerminalPrompter {
    spinner: Mutex<Option<Spinner>>,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    fn stop_spinner(&self) {
        if let Some(spinner) = self.spinner.lock().take() {
            spinner.finish();
        }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, request: &ConfirmRequest) -> Decision {
        println!("\n{}", format_question(request));
        print!("  [y/N] ");
        let _ = stdout().flush();

        let decision = parse_decision(&read_input());
        match decision {
            Decision::Confirmed => {
                print_confirmation("Confirmed");
                *self.spinner.lock() = Some(Spinner::new(progress_message(request.action)));
            }
            Decision::Cancelled => print_confirmation("Cancelled"),
        }
        decision
    }

    fn acknowledge(&self, notice: &Notice) {
        self.stop_spinner();
        println!("\n{}", format_notice(notice));
        print!("  Press Enter to continue ");
        let _ = stdout().flush();
        read_input();
    }

    fn name(&self) -> &'static str {
        "TerminalPrompter"
    }
}

/// Interpret an answer to a `[y/N]` question
pub fn parse_decision(input: &str) -> Decision {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Decision::Confirmed,
        _ => Decision::Cancelled,
    }
}

/// Spinner text while an action request is running
pub fn progress_message(action: PageAction) -> &'static str {
    match action {
        PageAction::ApplyPending => "Applying migrations...",
        PageAction::RollbackOne => "Rolling back one migration...",
    }
}

/// Destructive questions are shown in red
pub fn format_question(request: &ConfirmRequest) -> String {
    if request.destructive {
        format!("\x1b[31m⚠ {}\x1b[0m", request.message)
    } else {
        format!("\x1b[33m? {}\x1b[0m", request.message)
    }
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("  \x1b[32m✓\x1b[0m {}", notice.message),
        NoticeLevel::Error => format!("  \x1b[31m✖\x1b[0m {}", notice.message),
    }
}

/// Read a line of input
pub fn read_input() -> String {
    let stdin = std::io::stdin();
    let mut line = String::new();
    let _ = stdin.lock().read_line(&mut line);
    line
}

/// Print a confirmation message
pub fn print_confirmation(message: &str) {
    println!("  \x1b[2m{}\x1b[0m", message);
}
