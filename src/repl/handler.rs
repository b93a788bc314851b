//! Line handling for the REPL
//!
//! Meta commands run here; everything else is submitted to the conversation
//! in the current mode.

use tracing::debug;

use crate::chat::{self, ChatLog, Mode, ReplCommand, Submission};
use crate::error::Result;
use crate::formatter::Formatter;

/// What the REPL loop should do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplAction {
    /// Nothing to show
    None,
    /// Print this text
    Print(String),
    /// Reload fixture collections into the store
    Reload,
    /// Leave the REPL
    Exit,
}

/// Interprets submitted lines: meta commands, chat messages and forms
#[derive(Debug)]
pub struct InputHandler {
    mode: Mode,
    chat: ChatLog,
    formatter: Formatter,
}

impl InputHandler {
    /// Create a new handler
    ///
    /// # Arguments
    /// * `mode` - Input mode at startup
    /// * `formatter` - Formatter for generated forms
    pub fn new(mode: Mode, formatter: Formatter) -> Self {
        Self {
            mode,
            chat: ChatLog::new(),
            formatter,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    /// Handle one submitted line
    ///
    /// # Returns
    /// * `Result<ReplAction>` - Action for the loop; submit errors are
    ///   reported and the loop continues
    pub fn handle(&mut self, line: &str) -> Result<ReplAction> {
        if let Some(command) = ReplCommand::parse(line) {
            return Ok(self.run_command(command?));
        }

        match chat::submit(self.mode, line)? {
            Submission::Empty => Ok(ReplAction::None),
            Submission::Message(text) => {
                let reply = self.chat.exchange(text);
                Ok(ReplAction::Print(reply.content.clone()))
            }
            Submission::Form(form) => {
                debug!("Generated form for {}", form.heading());
                Ok(ReplAction::Print(self.formatter.format_form(&form)))
            }
        }
    }

    fn run_command(&mut self, command: ReplCommand) -> ReplAction {
        match command {
            ReplCommand::Mode(mode) => {
                self.mode = mode;
                ReplAction::Print(format!("Switched to {} mode", mode))
            }
            ReplCommand::Help => ReplAction::Print(ReplCommand::help_text().to_string()),
            ReplCommand::Reload => ReplAction::Reload,
            ReplCommand::Exit => ReplAction::Exit,
        }
    }
}
