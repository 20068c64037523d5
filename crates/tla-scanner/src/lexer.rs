//! The lookahead cursor the host parser hands to the scanner, and a
//! string-backed implementation of it.

use std::ops::Range;

/// Whitespace as far as token spans are concerned.
pub(crate) const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// A peekable lookahead cursor owned by the host.
///
/// The scanner consumes codepoints through this trait only. Codepoints
/// advanced with `skip = true` before the token body starts are
/// excluded from the token span; [`InputLexer::mark_end`] pins the
/// span's end, so a scan that consumes lookahead without marking emits
/// a zero-width token.
pub trait InputLexer {
    /// The codepoint under the cursor, or [`None`] at end of input.
    fn peek(&mut self) -> Option<char>;

    /// Consume the codepoint under the cursor.
    ///
    /// With `skip = true` the codepoint is treated as insignificant
    /// leading whitespace and stays out of the token span.
    fn advance(&mut self, skip: bool);

    /// Pin the end of the token span at the current cursor position.
    fn mark_end(&mut self);

    /// 0-based column of the cursor on its line.
    fn column(&self) -> i16;
}

/// An [`InputLexer`] over a source string.
///
/// Hosts embedding the scanner outside a generated parser, the test
/// suite, and the fuzz target all drive scans through this type. A
/// fresh lexer is cheap; re-entering after an emitted token is
/// [`SourceLexer::with_position`] at the end of the previous span.
#[derive(Debug, Clone)]
pub struct SourceLexer<'s> {
    source: &'s str,
    /// Byte offset of the lookahead cursor.
    position: usize,
    token_start: usize,
    token_end: usize,
    column: i16,
}

impl<'s> SourceLexer<'s> {
    /// A lexer at the start of `source`.
    #[must_use]
    pub fn new(source: &'s str) -> Self {
        Self::with_position(source, 0)
    }

    /// A lexer mid-source, with the column recomputed from the
    /// preceding line break.
    ///
    /// # Panics
    ///
    /// Panics if `position` is not a char boundary of `source`.
    #[must_use]
    pub fn with_position(source: &'s str, position: usize) -> Self {
        assert!(source.is_char_boundary(position), "position must lie on a char boundary");
        let line_start = source[..position].rfind('\n').map_or(0, |i| i + 1);
        let column = source[line_start..position].chars().count() as i16;
        Self {
            source,
            position,
            token_start: position,
            token_end: position,
            column,
        }
    }

    /// Byte range of the token delimited so far; empty for zero-width
    /// layout tokens.
    #[must_use]
    pub fn token_range(&self) -> Range<usize> {
        self.token_start..self.token_end
    }

    /// Text of the token delimited so far.
    #[must_use]
    pub fn token_text(&self) -> &'s str {
        &self.source[self.token_range()]
    }

    /// Byte offset of the lookahead cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl InputLexer for SourceLexer<'_> {
    fn peek(&mut self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    fn advance(&mut self, skip: bool) {
        let Some(c) = self.source[self.position..].chars().next() else {
            return;
        };
        let at_token_start = self.position == self.token_start;
        self.position += c.len_utf8();
        self.column = if c == '\n' {
            0
        } else {
            self.column.saturating_add(1)
        };
        if skip && at_token_start {
            // Skipped prefixes move the span start along with the cursor.
            self.token_start = self.position;
            if self.token_end < self.token_start {
                self.token_end = self.token_start;
            }
        }
    }

    fn mark_end(&mut self) {
        self.token_end = self.position;
    }

    fn column(&self) -> i16 {
        self.column
    }
}
