/// A parsed line of dashboard input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand<'a> {
    /// Re-fetch the migration list and status
    Refresh,
    /// Apply all pending migrations
    Upgrade,
    /// Roll back one migration
    Downgrade,
    /// Retry after a connection or load error
    Retry,
    /// Probe the backend again (after configuring Alembic)
    Check,
    Help,
    Quit,
    /// Anything else, kept for the error message
    Unknown(&'a str),
    Empty,
}

/// Every slash command, for completion and help
pub const SLASH_COMMANDS: &[&str] = &[
    "/refresh",
    "/upgrade",
    "/downgrade",
    "/retry",
    "/check",
    "/help",
    "/quit",
    "/exit",
];

impl<'a> DashboardCommand<'a> {
    /// Parse an input line
    ///
    /// Only the first word counts; trailing arguments are ignored.
    pub fn parse(input: &'a str) -> Self {
        let Some(word) = input.split_whitespace().next() else {
            return Self::Empty;
        };

        match word {
            "/refresh" | "r" => Self::Refresh,
            "/upgrade" => Self::Upgrade,
            "/downgrade" => Self::Downgrade,
            "/retry" => Self::Retry,
            "/check" => Self::Check,
            "/help" | "?" => Self::Help,
            "/quit" | "/exit" => Self::Quit,
            other => Self::Unknown(other),
        }
    }
}

/// Help text sections for the dashboard
pub mod help {
    /// Header for the help display
    pub const HEADER: &str = "\n📖 Available Commands:\n";

    /// Migration commands section
    pub const MIGRATIONS: &str = "\
Migrations:
  /refresh, r       Reload migration history and status
  /upgrade          Apply all pending migrations (alembic upgrade head)
  /downgrade        Roll back one migration (alembic downgrade -1)
";

    /// Connection commands section
    pub const CONNECTION: &str = "\
Connection:
  /retry            Retry after a connection or load error
  /check            Check the backend configuration again
";

    /// Exit commands section
    pub const EXIT: &str = "\
Exit:
  /help, ?          Show this help message
  /exit, /quit      Exit the dashboard
  Ctrl+D            Exit
";

    /// Keyboard shortcuts section
    pub const KEYBOARD: &str = "\
Keyboard Shortcuts:
  Tab               Complete a slash command
  Up/Down           Navigate command history
  Ctrl+R            Reverse search history
";

    /// Get the complete help text
    pub fn full_text() -> String {
        format!(
            "{}{}\n{}\n{}\n{}",
            HEADER, MIGRATIONS, CONNECTION, EXIT, KEYBOARD
        )
    }
}

/// Message printed for input that is not a command
pub fn unknown_command_message(command: &str) -> String {
    format!(
        "Unknown command: {}. Type /help for available commands.",
        command
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parse_tests {
        use super::*;

        #[test]
        fn parses_refresh_and_alias() {
            assert_eq!(DashboardCommand::parse("/refresh"), DashboardCommand::Refresh);
            assert_eq!(DashboardCommand::parse("r"), DashboardCommand::Refresh);
        }

        #[test]
        fn parses_actions() {
            assert_eq!(DashboardCommand::parse("/upgrade"), DashboardCommand::Upgrade);
            assert_eq!(
                DashboardCommand::parse("/downgrade"),
                DashboardCommand::Downgrade
            );
        }

        #[test]
        fn parses_connection_commands() {
            assert_eq!(DashboardCommand::parse("/retry"), DashboardCommand::Retry);
            assert_eq!(DashboardCommand::parse("/check"), DashboardCommand::Check);
        }

        #[test]
        fn parses_exit_aliases() {
            assert_eq!(DashboardCommand::parse("/quit"), DashboardCommand::Quit);
            assert_eq!(DashboardCommand::parse("/exit"), DashboardCommand::Quit);
        }

        #[test]
        fn ignores_surrounding_whitespace_and_args() {
            assert_eq!(
                DashboardCommand::parse("  /upgrade now "),
                DashboardCommand::Upgrade
            );
        }

        #[test]
        fn empty_input() {
            assert_eq!(DashboardCommand::parse(""), DashboardCommand::Empty);
            assert_eq!(DashboardCommand::parse("   "), DashboardCommand::Empty);
        }

        #[test]
        fn unknown_input() {
            assert_eq!(
                DashboardCommand::parse("/migrate head"),
                DashboardCommand::Unknown("/migrate")
            );
            assert_eq!(
                DashboardCommand::parse("upgrade"),
                DashboardCommand::Unknown("upgrade")
            );
        }

        #[test]
        fn commands_are_case_sensitive() {
            assert_eq!(
                DashboardCommand::parse("/UPGRADE"),
                DashboardCommand::Unknown("/UPGRADE")
            );
        }
    }

    mod help_tests {
        use super::*;

        #[test]
        fn help_lists_every_slash_command() {
            let text = help::full_text();
            for command in SLASH_COMMANDS {
                assert!(text.contains(command), "help is missing {}", command);
            }
        }

        #[test]
        fn unknown_command_mentions_help() {
            let message = unknown_command_message("/nope");
            assert!(message.contains("/nope"));
            assert!(message.contains("/help"));
        }
    }
}
