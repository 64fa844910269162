//! Terminal front-end for the alembic-ui migration dashboard
//!
//! This crate provides:
//! - An interactive REPL that shows the backend screen and migration history
//! - Slash commands for refresh, upgrade and downgrade
//! - A terminal confirmation prompter and a persistent status line

mod error;
pub mod repl;

pub use error::CliError;
pub use repl::{run_dashboard, run_once, OnceOutcome, TerminalPrompter};
