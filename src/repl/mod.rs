//! REPL (Read-Eval-Print Loop) for symposium
//!
//! This module provides the interactive prompt:
//! - Line editing with reedline
//! - Completion menu for `@/` and `#/` tokens, opened with Tab and kept
//!   open while accepted suggestions open branches
//! - Inline hints and token highlighting
//! - Persistent command history
//! - Multi-line input with a trailing `\`

mod completer;
mod handler;
mod highlighter;
mod hinter;
mod menu;
mod prompt;
mod validator;


use reedline::{
    ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};
use tracing::{debug, warn};

use crate::completion::CompletionEngine;
use crate::config::Config;
use crate::error::{Result, SymposiumError};
use crate::formatter::Formatter;
use crate::store::{self, SnapshotSource};

pub use completer::SymposiumCompleter;
pub use handler::{InputHandler, ReplAction};
pub use highlighter::CommandHighlighter;
pub use hinter::CommandHinter;
pub use menu::BranchMenu;
pub use prompt::SymposiumPrompt;
pub use validator::{LineValidator, join_continuations};

const COMPLETION_MENU: &str = "completion_menu";

/// REPL engine for interactive input
pub struct ReplEngine {
    /// Line editor
    editor: Reedline,

    /// Completion engine; its store is refreshed by `:reload`
    engine: CompletionEngine,

    /// Interprets submitted lines
    handler: InputHandler,

    /// Whether to continue running
    running: bool,
}

impl ReplEngine {
    /// Create a new REPL engine
    ///
    /// # Arguments
    /// * `engine` - Completion engine for the completer and hinter
    /// * `config` - Effective configuration
    ///
    /// # Returns
    /// * `Result<Self>` - New REPL engine or error
    pub fn new(engine: CompletionEngine, config: &Config) -> Result<Self> {
        let menu = BranchMenu::new(
            ColumnarMenu::default()
                .with_name(COMPLETION_MENU)
                .with_columns(config.display.menu_columns),
            engine.clone(),
        );

        let mut keybindings = default_emacs_keybindings();
        keybindings.add_binding(
            KeyModifiers::NONE,
            KeyCode::Tab,
            ReedlineEvent::UntilFound(vec![
                ReedlineEvent::Menu(COMPLETION_MENU.to_string()),
                ReedlineEvent::MenuNext,
            ]),
        );

        let mut editor = Reedline::create()
            .with_completer(Box::new(SymposiumCompleter::new(engine.clone())))
            .with_menu(ReedlineMenu::EngineCompleter(Box::new(menu)))
            .with_edit_mode(Box::new(Emacs::new(keybindings)))
            .with_hinter(Box::new(CommandHinter::new(engine.clone())))
            .with_validator(Box::new(LineValidator::new()))
            .with_highlighter(Box::new(CommandHighlighter::new(
                config.display.syntax_highlighting && config.display.color_output,
            )))
            .with_ansi_colors(config.display.color_output);

        if config.history.persist {
            let history = FileBackedHistory::with_file(
                config.history.max_size,
                config.history.file_path.clone(),
            )
            .map_err(|e| SymposiumError::Generic(format!("History error: {}", e)))?;
            editor = editor.with_history(Box::new(history));
        }

        Ok(Self {
            editor,
            engine,
            handler: InputHandler::new(config.repl.mode, Formatter::from_config(&config.display)),
            running: true,
        })
    }

    /// Read a single submission
    ///
    /// # Returns
    /// * `Result<Option<String>>` - Input with continuations joined, an empty
    ///   string on Ctrl-C, or None on Ctrl-D
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let prompt = SymposiumPrompt::new(self.handler.mode());
        match self.editor.read_line(&prompt)? {
            Signal::Success(buffer) => Ok(Some(join_continuations(&buffer))),
            Signal::CtrlD => Ok(None),
            _ => Ok(Some(String::new())),
        }
    }

    /// Run until `:exit` or Ctrl-D
    ///
    /// # Arguments
    /// * `source` - Source `:reload` loads collections from
    pub async fn run(&mut self, source: &dyn SnapshotSource) -> Result<()> {
        while self.running {
            let Some(line) = self.read_line()? else {
                break;
            };

            match self.handler.handle(&line) {
                Ok(ReplAction::None) => {}
                Ok(ReplAction::Print(text)) => println!("{}", text),
                Ok(ReplAction::Reload) => self.reload(source).await,
                Ok(ReplAction::Exit) => self.running = false,
                Err(e) => eprintln!("{}", e),
            }
        }

        debug!("REPL finished with {} messages", self.handler.chat().len());
        Ok(())
    }

    /// Refresh the store from `source` and report the outcome
    async fn reload(&self, source: &dyn SnapshotSource) {
        match store::refresh(self.engine.store(), source).await {
            Ok(true) => {
                let snapshot = self.engine.store().snapshot();
                println!(
                    "Reloaded {} records from {} collections",
                    snapshot.record_count(),
                    snapshot.collection_names().len()
                );
            }
            Ok(false) => println!("A newer reload finished first"),
            Err(e) => {
                warn!("Reload failed: {}", e);
                eprintln!("Reload failed: {}", e);
            }
        }
    }

    /// Check if REPL is still running
    pub fn is_running(&self) -> bool {
        self.running
    }
}
