//! Prompt showing the current input mode

use std::borrow::Cow;

use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

use crate::chat::Mode;

/// Prompt for the symposium REPL
pub struct SymposiumPrompt {
    /// Input mode shown in the prompt
    mode: Mode,
}

impl SymposiumPrompt {
    /// Create a new prompt
    ///
    /// # Arguments
    /// * `mode` - Current input mode
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

impl Prompt for SymposiumPrompt {
    /// Render the left prompt, e.g. `convo> `
    fn render_prompt_left(&self) -> Cow<'_, str> {
        format!("{}> ", self.mode).into()
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        "".into()
    }

    /// Indicator is part of the left prompt
    fn render_prompt_indicator(&self, _prompt_mode: PromptEditMode) -> Cow<'_, str> {
        "".into()
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        "... ".into()
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };

        format!("({}reverse-search: {}) ", prefix, history_search.term).into()
    }
}
