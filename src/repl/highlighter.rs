//! Highlighter for the prompt line
//!
//! Colors command tokens as they are typed: `@/` targets, `#/` operations and
//! a leading `:` meta command. Everything else keeps the default style.

use nu_ansi_term::{Color, Style};
use reedline::{Highlighter, StyledText};

use crate::completion::Prefix;

/// Kind of one whitespace-delimited run of the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Whitespace,
    Target,
    Operation,
    Meta,
    Text,
}

impl TokenKind {
    fn style(self) -> Style {
        match self {
            TokenKind::Target => Color::Cyan.into(),
            TokenKind::Operation => Color::Magenta.bold(),
            TokenKind::Meta => Color::Yellow.bold(),
            TokenKind::Whitespace | TokenKind::Text => Style::default(),
        }
    }
}

/// Highlighter for `@/` and `#/` tokens
pub struct CommandHighlighter {
    enabled: bool,
}

impl CommandHighlighter {
    /// Create a new highlighter
    ///
    /// # Arguments
    /// * `enabled` - When false the line is returned unstyled
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Split a line into runs of whitespace and non-whitespace
    fn runs(line: &str) -> Vec<&str> {
        let mut runs = Vec::new();
        let mut start = 0;
        let mut in_space = None;

        for (i, ch) in line.char_indices() {
            let space = ch.is_whitespace();
            if in_space.is_some_and(|prev| prev != space) {
                runs.push(&line[start..i]);
                start = i;
            }
            in_space = Some(space);
        }
        if start < line.len() {
            runs.push(&line[start..]);
        }
        runs
    }

    fn classify(run: &str, first: bool) -> TokenKind {
        if run.starts_with(char::is_whitespace) {
            return TokenKind::Whitespace;
        }
        match Prefix::split(run) {
            Some((Prefix::Target, _)) => TokenKind::Target,
            Some((Prefix::Operation, _)) => TokenKind::Operation,
            None if first && run.starts_with(':') => TokenKind::Meta,
            None => TokenKind::Text,
        }
    }
}

impl Default for CommandHighlighter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Highlighter for CommandHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();
        if !self.enabled {
            styled.push((Style::default(), line.to_string()));
            return styled;
        }

        let mut first = true;
        for run in Self::runs(line) {
            let kind = Self::classify(run, first);
            if kind != TokenKind::Whitespace {
                first = false;
            }
            styled.push((kind.style(), run.to_string()));
        }
        styled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_keep_whitespace() {
        assert_eq!(
            CommandHighlighter::runs("  see @/cards/c1  now"),
            vec!["  ", "see", " ", "@/cards/c1", "  ", "now"]
        );
        assert!(CommandHighlighter::runs("").is_empty());
    }

    #[test]
    fn test_classify() {
        assert_eq!(CommandHighlighter::classify("@/lib", false), TokenKind::Target);
        assert_eq!(
            CommandHighlighter::classify("#/create/", false),
            TokenKind::Operation
        );
        assert_eq!(CommandHighlighter::classify(":help", true), TokenKind::Meta);
        assert_eq!(CommandHighlighter::classify(":help", false), TokenKind::Text);
        assert_eq!(CommandHighlighter::classify("mail@/x", false), TokenKind::Text);
    }

    fn plain_text(styled: &StyledText) -> String {
        styled.buffer.iter().map(|(_, text)| text.as_str()).collect()
    }

    #[test]
    fn test_highlight_styles_tokens() {
        let highlighter = CommandHighlighter::new(true);
        let result = highlighter.highlight("open @/lib and #/create/card", 0);

        assert_eq!(plain_text(&result), "open @/lib and #/create/card");
        assert!(!result.render_simple().is_empty());
        assert_eq!(result.buffer[2].0, Style::from(Color::Cyan));
        assert_eq!(result.buffer[6].0, Color::Magenta.bold());
        assert_eq!(result.buffer[0].0, Style::default());
    }

    #[test]
    fn test_meta_command_only_first() {
        let highlighter = CommandHighlighter::new(true);
        let result = highlighter.highlight(" :mode manage", 0);
        assert_eq!(result.buffer[1].0, Color::Yellow.bold());
        assert_eq!(result.buffer[3].0, Style::default());
    }

    #[test]
    fn test_disabled_highlighting() {
        let highlighter = CommandHighlighter::new(false);
        let result = highlighter.highlight("@/cards/c1", 0);
        assert_eq!(result.buffer.len(), 1);
        assert_eq!(result.buffer[0].0, Style::default());
        assert_eq!(plain_text(&result), "@/cards/c1");
    }
}
