//! Accepting a suggestion into the input buffer
//!
//! Only the in-progress command token is rewritten. Text before it and after
//! the cursor stays as typed.

use std::ops::Range;

use super::schema::Prefix;

/// Result of splicing an accepted path into a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    /// New buffer contents
    pub buffer: String,

    /// New cursor byte offset
    pub cursor: usize,

    /// Byte range of the old buffer that was replaced
    pub replaced: Range<usize>,

    /// Text written over `replaced`
    pub insertion: String,
}

/// Largest char boundary not after `offset`
pub(crate) fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Start of the whitespace-free run that ends at the end of `text`
pub(crate) fn token_start(text: &str) -> usize {
    text.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Apply an accepted path at the cursor
///
/// The token replaced is the nearest `prefix` before the cursor with no
/// whitespace between it and the cursor. Without such a token the text is
/// inserted at the cursor. A terminal path (no trailing `/`) gets one
/// trailing space, and whitespace right after the cursor is dropped.
///
/// # Arguments
/// * `buffer` - Current input
/// * `cursor` - Cursor byte offset; clamped to the buffer and to a char boundary
/// * `prefix` - Trigger prefix of the token
/// * `path` - Accepted prefix-relative path
pub fn apply(buffer: &str, cursor: usize, prefix: Prefix, path: &str) -> Splice {
    let cursor = floor_char_boundary(buffer, cursor);
    let before = &buffer[..cursor];
    let after = &buffer[cursor..];

    let run = token_start(before);
    let start = before[run..]
        .rfind(prefix.as_str())
        .map_or(cursor, |i| run + i);

    let terminal = !path.ends_with('/');
    let mut insertion = format!("{prefix}{path}");
    let kept_after = if terminal {
        insertion.push(' ');
        after.trim_start()
    } else {
        after
    };
    let end = cursor + (after.len() - kept_after.len());

    let mut spliced = String::with_capacity(start + insertion.len() + kept_after.len());
    spliced.push_str(&buffer[..start]);
    spliced.push_str(&insertion);
    spliced.push_str(kept_after);

    Splice {
        buffer: spliced,
        cursor: start + insertion.len(),
        replaced: start..end,
        insertion,
    }
}
