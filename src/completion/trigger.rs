//! Trigger detection
//!
//! A completion is active while the text before the cursor ends in a command
//! token: `@/` or `#/` at the start of the buffer or after whitespace,
//! followed by any run of non-whitespace.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::schema::Prefix;
use super::splice::floor_char_boundary;

static TRIGGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(@/|#/)(\S*)$").expect("trigger pattern is valid")
});

/// Command token ending at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub prefix: Prefix,

    /// Path typed after the prefix
    pub path: String,

    /// Byte offset of the prefix in the buffer
    pub start: usize,
}

impl Trigger {
    /// Find the command token the cursor is in, if any
    pub fn detect(buffer: &str, cursor: usize) -> Option<Self> {
        let cursor = floor_char_boundary(buffer, cursor);
        let captures = TRIGGER.captures(&buffer[..cursor])?;
        let prefix = captures.get(1)?;
        let path = captures.get(2)?;

        Some(Self {
            prefix: prefix.as_str().parse().ok()?,
            path: path.as_str().to_string(),
            start: prefix.start(),
        })
    }

    /// Byte range of the whole token
    pub fn span(&self) -> Range<usize> {
        self.start..self.start + self.prefix.as_str().len() + self.path.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_at_start() {
        let trigger = Trigger::detect("@/lib", 5).unwrap();
        assert_eq!(trigger.prefix, Prefix::Target);
        assert_eq!(trigger.path, "lib");
        assert_eq!(trigger.start, 0);
        assert_eq!(trigger.span(), 0..5);
    }

    #[test]
    fn test_detect_after_whitespace() {
        let trigger = Trigger::detect("please #/create/ca", 18).unwrap();
        assert_eq!(trigger.prefix, Prefix::Operation);
        assert_eq!(trigger.path, "create/ca");
        assert_eq!(trigger.start, 7);
    }

    #[test]
    fn test_bare_prefix_triggers() {
        let trigger = Trigger::detect("hi @/", 5).unwrap();
        assert_eq!(trigger.path, "");
    }

    #[test]
    fn test_prefix_inside_word_does_not_trigger() {
        assert_eq!(Trigger::detect("mail@/x", 7), None);
        assert_eq!(Trigger::detect("a#/b", 4), None);
    }

    #[test]
    fn test_whitespace_before_cursor_closes() {
        assert_eq!(Trigger::detect("@/library ", 10), None);
        assert_eq!(Trigger::detect("plain text", 10), None);
    }

    #[test]
    fn test_only_text_before_cursor_counts() {
        let trigger = Trigger::detect("@/library/sch tail", 10).unwrap();
        assert_eq!(trigger.path, "library/");
    }
}
