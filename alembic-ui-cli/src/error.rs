//! CLI-specific error types

use alembic_ui_core::ConfigError;
use thiserror::Error;

/// Errors that can occur while running the terminal dashboard
///
/// Backend failures never show up here: the shell and the page turn them
/// into screens. These are failures of the terminal itself.
#[derive(Debug, Error)]
pub enum CliError {
    /// Readline/input error
    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// IO error (history file, stdout, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid dashboard configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
