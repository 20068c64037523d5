//! The stateful half of the scanner: the junction-list stack, the
//! driver that dispatches on the host's valid-token mask, and the
//! byte-level state snapshot used for speculative reparse.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{instrument, trace};

use crate::lexer::{is_whitespace, InputLexer};
use crate::lookahead::{next_lookahead, Category, JunctKind};
use crate::token::{TokenType, ValidTokens};

/// Junction lists deeper than this are declined; the depth has to fit
/// the single byte of the serialized header.
pub const MAX_JLIST_DEPTH: usize = u8::MAX as usize;

/// Serialized size of one junction record: a kind byte plus a
/// little-endian column.
const RECORD_SIZE: usize = 3;

/// One open junction list: its bullet kind and the column its bullets
/// are aligned at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunctRecord {
    pub kind: JunctKind,
    /// Always non-negative, and strictly greater than the column of
    /// the enclosing list.
    pub column: i16,
}

/// Errors surfaced by [`Scanner::serialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state buffer too small: need {needed} bytes, got {capacity}")]
    BufferTooSmall { needed: usize, capacity: usize },
}

/// The external scanner instance.
///
/// The only state that survives between [`Scanner::scan`] calls is the
/// stack of open junction lists, innermost on top. Everything else is
/// recomputed from the lookahead on each call, so snapshotting an
/// instance is [`Scanner::serialize`] over a few bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Scanner {
    jlists: Vec<JunctRecord>,
}

impl Scanner {
    /// A scanner with no open junction lists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open junction lists.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.jlists.len()
    }

    /// The open junction lists, outermost first.
    #[must_use]
    pub fn records(&self) -> &[JunctRecord] {
        &self.jlists
    }

    /// Produce at most one token from the lookahead.
    ///
    /// Returns [`None`] when this scanner has nothing to say at the
    /// current position and the grammar's own rules should run. A
    /// declined scan never changes the stack.
    #[instrument(level = "trace", skip(self, lexer))]
    pub fn scan(&mut self, lexer: &mut impl InputLexer, valid: ValidTokens) -> Option<TokenType> {
        if valid.is_error_recovery() {
            // The host is recovering; drain one list per call so the
            // grammar can terminate whatever it is inside of.
            lexer.mark_end();
            return self.dedent("error recovery");
        }
        if valid.contains(TokenType::ExtramodularText) {
            return scan_extramodular(lexer);
        }
        if valid.contains(TokenType::BlockCommentText) {
            return scan_block_comment(lexer);
        }
        self.scan_lookahead(lexer, valid)
    }

    /// Run the operator DFA and dispatch its classification through
    /// the junction-list rules.
    fn scan_lookahead(
        &mut self,
        lexer: &mut impl InputLexer,
        valid: ValidTokens,
    ) -> Option<TokenType> {
        let la = next_lookahead(lexer);
        let layout = match la.category {
            Category::Junct(kind) => self.handle_junct(kind, la.column, valid),
            Category::RightDelimiter => self.handle_right_delimiter(valid),
            Category::UnitStart | Category::ModuleEnd | Category::Eof => self.handle_terminator(),
            Category::Comment => None,
            Category::Other => self.handle_other(la.column),
        };
        if let Some(token) = layout {
            // Layout tokens are zero-width: the end mark stays where
            // the DFA pinned it, before the lookahead, and the host
            // re-scans the triggering lexeme.
            return Some(token);
        }
        match la.token {
            Some(token) if valid.contains(token) => {
                lexer.mark_end();
                Some(token)
            }
            _ => None,
        }
    }

    /// A bullet at `column`: open a nested list, continue the current
    /// one, or close it.
    fn handle_junct(
        &mut self,
        kind: JunctKind,
        column: i16,
        valid: ValidTokens,
    ) -> Option<TokenType> {
        let top = self.jlists.last().copied();
        let top_column = top.map_or(-1, |r| r.column);
        match column.cmp(&top_column) {
            std::cmp::Ordering::Greater => {
                if !valid.contains(TokenType::Indent) {
                    // The grammar is mid-expression; this bullet is an
                    // ordinary infix operator.
                    return None;
                }
                if self.jlists.len() >= MAX_JLIST_DEPTH {
                    return None;
                }
                self.jlists.push(JunctRecord { kind, column });
                trace!(?kind, column, depth = self.jlists.len(), "indent");
                Some(TokenType::Indent)
            }
            std::cmp::Ordering::Equal if top.map(|r| r.kind) == Some(kind) => {
                trace!(?kind, column, "newline");
                Some(TokenType::Newline)
            }
            // An aligned bullet of the other kind, or any outdented
            // bullet, closes the innermost list; the bullet itself is
            // left for the host to re-scan.
            std::cmp::Ordering::Equal | std::cmp::Ordering::Less => self.dedent("junct"),
        }
    }

    /// A right delimiter whose opener predates the innermost list
    /// forces that list closed, but only when the grammar is actually
    /// asking for the close.
    fn handle_right_delimiter(&mut self, valid: ValidTokens) -> Option<TokenType> {
        if valid.contains(TokenType::Dedent) {
            self.dedent("right delimiter")
        } else {
            None
        }
    }

    /// Module terminators, section separators, unit-starting keywords
    /// and EOF close every enclosing list, one per call.
    fn handle_terminator(&mut self) -> Option<TokenType> {
        self.dedent("terminator")
    }

    /// Any other token at or left of the alignment column ends the
    /// list; e.g. the `THEN` closing `IF /\ P /\ Q THEN R`.
    fn handle_other(&mut self, column: i16) -> Option<TokenType> {
        match self.jlists.last() {
            Some(top) if column <= top.column => self.dedent("outdented token"),
            _ => None,
        }
    }

    fn dedent(&mut self, cause: &'static str) -> Option<TokenType> {
        self.jlists.pop().map(|record| {
            trace!(
                kind = ?record.kind,
                column = record.column,
                depth = self.jlists.len(),
                cause,
                "dedent"
            );
            TokenType::Dedent
        })
    }

    /// Snapshot the stack into `buffer`, returning the number of bytes
    /// written: a depth byte, then one record per open list.
    ///
    /// # Errors
    ///
    /// [`StateError::BufferTooSmall`] if the buffer cannot hold the
    /// snapshot; nothing is written. 1024 bytes always suffice.
    pub fn serialize(&self, buffer: &mut [u8]) -> Result<usize, StateError> {
        let needed = 1 + self.jlists.len() * RECORD_SIZE;
        if buffer.len() < needed {
            return Err(StateError::BufferTooSmall {
                needed,
                capacity: buffer.len(),
            });
        }
        buffer[0] = self.jlists.len() as u8;
        for (record, chunk) in self
            .jlists
            .iter()
            .zip(buffer[1..].chunks_exact_mut(RECORD_SIZE))
        {
            chunk[0] = record.kind as u8;
            chunk[1..RECORD_SIZE].copy_from_slice(&record.column.to_le_bytes());
        }
        Ok(needed)
    }

    /// Restore a snapshot produced by [`Scanner::serialize`].
    ///
    /// Total over any input: an empty buffer is the initial state, and
    /// a buffer that under-delivers on its depth byte or carries an
    /// unknown kind byte resets to the initial state.
    pub fn deserialize(&mut self, buffer: &[u8]) {
        self.jlists.clear();
        let Some((&depth, records)) = buffer.split_first() else {
            return;
        };
        let mut chunks = records.chunks_exact(RECORD_SIZE);
        for _ in 0..depth {
            let Some(chunk) = chunks.next() else {
                self.jlists.clear();
                return;
            };
            let kind = match chunk[0] {
                0 => JunctKind::Conjunction,
                1 => JunctKind::Disjunction,
                _ => {
                    self.jlists.clear();
                    return;
                }
            };
            let column = i16::from_le_bytes([chunk[1], chunk[2]]);
            self.jlists.push(JunctRecord { kind, column });
        }
    }
}

/// Consume everything outside a module envelope, stopping at the
/// `----(-)* *MODULE` lookahead or EOF. Leading whitespace is skipped
/// out of the span; the scan declines if nothing else was consumed.
fn scan_extramodular(lexer: &mut impl InputLexer) -> Option<TokenType> {
    while matches!(lexer.peek(), Some(c) if is_whitespace(c)) {
        lexer.advance(true);
    }
    lexer.mark_end();

    let mut consumed_any = false;
    loop {
        match lexer.peek() {
            None => break,
            Some('-') => {
                if at_module_envelope(lexer) {
                    // The end mark still sits before the first dash.
                    break;
                }
                // Not an envelope after all; the dashes are text.
                consumed_any = true;
                lexer.mark_end();
            }
            Some(_) => {
                lexer.advance(false);
                consumed_any = true;
                lexer.mark_end();
            }
        }
    }
    consumed_any.then_some(TokenType::ExtramodularText)
}

/// Consume a candidate module opener. True if the full
/// `----(-)* *MODULE` pattern was present; on false the consumed
/// characters fall back into the surrounding text.
fn at_module_envelope(lexer: &mut impl InputLexer) -> bool {
    let mut dashes = 0usize;
    while lexer.peek() == Some('-') {
        lexer.advance(false);
        dashes += 1;
    }
    if dashes < 4 {
        return false;
    }
    while lexer.peek() == Some(' ') {
        lexer.advance(false);
    }
    "MODULE".chars().all(|expected| {
        if lexer.peek() == Some(expected) {
            lexer.advance(false);
            true
        } else {
            false
        }
    })
}

/// Consume block-comment interior text, stopping before the next `(*`
/// or `*)` so the grammar can handle nesting. Declines on an empty
/// body so the host never spins.
fn scan_block_comment(lexer: &mut impl InputLexer) -> Option<TokenType> {
    lexer.mark_end();
    let mut consumed_any = false;
    while let Some(c) = lexer.peek() {
        lexer.advance(false);
        match (c, lexer.peek()) {
            ('(', Some('*')) | ('*', Some(')')) => break,
            _ => {
                consumed_any = true;
                lexer.mark_end();
            }
        }
    }
    consumed_any.then_some(TokenType::BlockCommentText)
}
