use super::Mode;
use crate::error::SubmitError;

/// Meta command typed at the prompt, e.g. `:mode manage`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Switch input mode
    Mode(Mode),
    /// Show help
    Help,
    /// Reload fixture collections
    Reload,
    /// Leave the REPL
    Exit,
}

impl ReplCommand {
    /// Parse a line as a meta command
    ///
    /// # Returns
    /// * `Option<Result<Self, SubmitError>>` - `None` if the line is not a
    ///   meta command
    pub fn parse(line: &str) -> Option<Result<Self, SubmitError>> {
        let body = line.trim().strip_prefix(':')?;
        let mut words = body.split_whitespace();
        let name = words.next().unwrap_or_default();
        let argument = words.next();

        let command = match (name, argument) {
            ("mode", Some(arg)) => arg
                .parse::<Mode>()
                .map(ReplCommand::Mode)
                .map_err(|_| SubmitError::InvalidArgument {
                    command: "mode".to_string(),
                    argument: arg.to_string(),
                }),
            ("mode", None) => Err(SubmitError::InvalidArgument {
                command: "mode".to_string(),
                argument: String::new(),
            }),
            ("help" | "h" | "?", _) => Ok(ReplCommand::Help),
            ("reload", _) => Ok(ReplCommand::Reload),
            ("exit" | "quit" | "q", _) => Ok(ReplCommand::Exit),
            (other, _) => Err(SubmitError::UnknownCommand(other.to_string())),
        };
        Some(command)
    }

    /// Help text listing the meta commands
    pub fn help_text() -> &'static str {
        "Commands:\n  \
         :mode convo|manage   Switch input mode\n  \
         :reload              Reload fixture collections\n  \
         :help                Show this help\n  \
         :exit, :quit         Leave\n\n\
         Type @/ for target paths and #/ for operations; Tab completes.\n\
         End a line with \\ to continue on the next line."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_a_command() {
        assert_eq!(ReplCommand::parse("hello"), None);
        assert_eq!(ReplCommand::parse("#/create/card"), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse(":help"), Some(Ok(ReplCommand::Help)));
        assert_eq!(ReplCommand::parse(" :quit "), Some(Ok(ReplCommand::Exit)));
        assert_eq!(ReplCommand::parse(":reload"), Some(Ok(ReplCommand::Reload)));
        assert_eq!(
            ReplCommand::parse(":mode manage"),
            Some(Ok(ReplCommand::Mode(Mode::Manage)))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            ReplCommand::parse(":mode chat"),
            Some(Err(SubmitError::InvalidArgument {
                command: "mode".to_string(),
                argument: "chat".to_string(),
            }))
        );
        assert_eq!(
            ReplCommand::parse(":frobnicate"),
            Some(Err(SubmitError::UnknownCommand("frobnicate".to_string())))
        );
    }
}
