//! External scanner for the context-sensitive corners of TLA+.
//!
//! A grammar-driven TLA+ parser covers most of the language; this
//! crate owns the five lexical jobs a regular tokenizer cannot:
//! text outside module envelopes, block-comment interiors, the
//! synthetic `INDENT`/`NEWLINE`/`DEDENT` tokens around vertically
//! aligned conjunction and disjunction lists, the prefix-conflicting
//! operator families (`=`/`==`/`====`, `-`/`->`/`----`, `>`/`>>_`),
//! and the `----`/`====` module delimiters.
//!
//! The host drives [`Scanner::scan`] with a lookahead cursor (any
//! [`InputLexer`]) and the set of tokens its grammar accepts at the
//! current position; the scanner's only cross-call state is the stack
//! of open junction lists, which [`Scanner::serialize`] snapshots
//! into a handful of bytes for speculative and incremental reparse.

#![warn(clippy::pedantic)]
#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::match_same_arms
)]

pub mod lexer;
mod lookahead;
pub mod scanner;
pub mod token;

pub use lexer::{InputLexer, SourceLexer};
pub use lookahead::JunctKind;
pub use scanner::{JunctRecord, Scanner, StateError, MAX_JLIST_DEPTH};
pub use token::{TokenType, ValidTokens};
