//! Rustyline helper: slash-command completion and input styling

use std::borrow::Cow;

use rustyline::completion::Completer;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper, Result as RustylineResult};

use super::commands::SLASH_COMMANDS;

const INPUT_BG: &str = "\x1b[48;5;236m";

#[derive(Clone, Copy, Debug, Default)]
pub struct DashboardHelper;

/// Slash commands starting with `prefix`
///
/// Only the first word is completed; nothing is offered once the line has
/// a space or does not start with `/`.
pub fn complete_command(prefix: &str) -> Vec<String> {
    if !prefix.starts_with('/') || prefix.contains(char::is_whitespace) {
        return Vec::new();
    }
    SLASH_COMMANDS
        .iter()
        .filter(|cmd| cmd.starts_with(prefix))
        .map(|cmd| cmd.to_string())
        .collect()
}

impl Completer for DashboardHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> RustylineResult<(usize, Vec<Self::Candidate>)> {
        let prefix = line.get(..pos).unwrap_or(line);
        Ok((0, complete_command(prefix)))
    }
}

impl Hinter for DashboardHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        None
    }
}

impl Highlighter for DashboardHelper {
    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(format!("{}\x1b[2K{}", INPUT_BG, prompt))
    }

    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.is_empty() {
            return Cow::Borrowed(line);
        }
        Cow::Owned(format!("{}{}\x1b[0K", INPUT_BG, line))
    }
}

impl Validator for DashboardHelper {
    fn validate(&self, _ctx: &mut ValidationContext<'_>) -> RustylineResult<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for DashboardHelper {}
