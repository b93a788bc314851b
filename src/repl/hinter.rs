//! Hinter for reedline - inline hints from completions, then history

use nu_ansi_term::{Color, Style};
use reedline::{Hinter, History, SearchQuery};

use crate::completion::CompletionEngine;

/// Hinter that finishes the command token at the cursor
pub struct CommandHinter {
    /// Completion engine used for token hints
    engine: CompletionEngine,
    /// Style for hints
    style: Style,
    /// Current hint text
    current_hint: String,
}

impl CommandHinter {
    /// Create a new hinter with the default style
    pub fn new(engine: CompletionEngine) -> Self {
        Self {
            engine,
            style: Style::new().italic().fg(Color::DarkGray),
            current_hint: String::new(),
        }
    }

    /// Remainder of the first completion when it extends the typed token
    fn token_hint(&self, line: &str) -> Option<String> {
        let (trigger, items) = self.engine.complete_at(line, line.len())?;
        let typed = &line[trigger.start..];
        let first = items.first()?;
        let full = format!("{}{}", trigger.prefix, first.path);

        full.strip_prefix(typed)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }

    /// Remainder of the newest history entry starting with `line`
    fn history_hint(line: &str, history: &dyn History) -> Option<String> {
        let item = history
            .search(SearchQuery::last_with_prefix(line.to_string(), None))
            .ok()?
            .into_iter()
            .next()?;

        item.command_line
            .strip_prefix(line)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string)
    }
}

impl Hinter for CommandHinter {
    fn handle(
        &mut self,
        line: &str,
        pos: usize,
        history: &dyn History,
        use_ansi_coloring: bool,
        _cwd: &str,
    ) -> String {
        self.current_hint.clear();

        // Only hint with the cursor at the end of a non-empty line
        if pos != line.len() || line.trim().is_empty() {
            return String::new();
        }

        let Some(hint) = self
            .token_hint(line)
            .or_else(|| Self::history_hint(line, history))
        else {
            return String::new();
        };

        self.current_hint = hint;
        if use_ansi_coloring {
            self.style.paint(&self.current_hint).to_string()
        } else {
            self.current_hint.clone()
        }
    }

    fn complete_hint(&self) -> String {
        self.current_hint.clone()
    }

    /// Next path segment of the hint, including its `/`
    fn next_hint_token(&self) -> String {
        match self.current_hint.find('/') {
            Some(i) => self.current_hint[..=i].to_string(),
            None => self.current_hint.clone(),
        }
    }
}
