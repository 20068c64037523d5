//! Longest-match recognition of the prefix-overlapping operator set,
//! with a shape classification for the junction-list engine.

use serde::{Deserialize, Serialize};

use crate::lexer::{is_whitespace, InputLexer};
use crate::token::TokenType;

/// Which bullet opened a junction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum JunctKind {
    /// `/\` or `∧`
    Conjunction = 0,
    /// `\/` or `∨`
    Disjunction = 1,
}

/// The shape of the lookahead, as far as junction-list layout cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Category {
    /// A conjunction or disjunction bullet.
    Junct(JunctKind),
    /// A token whose matching opener predates any inner junction list:
    /// `)`, `]`, `}`, `>>`, `>>_`, `->`, `⟶`, `THEN`, `ELSE`, `IN`.
    RightDelimiter,
    /// A keyword starting a new module-level unit, or `----`.
    UnitStart,
    /// `====`.
    ModuleEnd,
    /// `\*` or `(*`; never a layout trigger.
    Comment,
    /// End of input.
    Eof,
    /// Any other recognized shape.
    Other,
}

/// One DFA decision: the operator token to emit if layout declines,
/// the shape for the junction engine, and the start column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Lookahead {
    pub token: Option<TokenType>,
    pub category: Category,
    pub column: i16,
}

impl Lookahead {
    fn operator(token: TokenType, column: i16) -> Self {
        Self {
            token: Some(token),
            category: Category::Other,
            column,
        }
    }

    fn shape(category: Category, column: i16) -> Self {
        Self {
            token: None,
            category,
            column,
        }
    }
}

/// Skip leading whitespace, pin a zero-width span, then run the
/// operator DFA over the lookahead.
///
/// The cursor is left exactly past the matched lexeme whenever
/// `token` is `Some`, so the caller can [`InputLexer::mark_end`] to
/// turn the match into a real span. Consumed lookahead behind a `None`
/// token is discarded by the host along with the declined scan.
pub(crate) fn next_lookahead(lexer: &mut impl InputLexer) -> Lookahead {
    while matches!(lexer.peek(), Some(c) if is_whitespace(c)) {
        lexer.advance(true);
    }
    lexer.mark_end();
    let column = lexer.column();

    let Some(c) = lexer.peek() else {
        return Lookahead::shape(Category::Eof, column);
    };
    lexer.advance(false);

    match c {
        '∧' => Lookahead::shape(Category::Junct(JunctKind::Conjunction), column),
        '∨' => Lookahead::shape(Category::Junct(JunctKind::Disjunction), column),
        '/' => match lexer.peek() {
            Some('\\') => {
                lexer.advance(false);
                Lookahead::shape(Category::Junct(JunctKind::Conjunction), column)
            }
            _ => Lookahead::shape(Category::Other, column),
        },
        '\\' => match lexer.peek() {
            Some('/') => {
                lexer.advance(false);
                Lookahead::shape(Category::Junct(JunctKind::Disjunction), column)
            }
            Some('*') => Lookahead::shape(Category::Comment, column),
            _ => Lookahead::shape(Category::Other, column),
        },
        '(' => match lexer.peek() {
            Some('*') => Lookahead::shape(Category::Comment, column),
            _ => Lookahead::shape(Category::Other, column),
        },
        ')' | ']' | '}' | '⟶' => Lookahead::shape(Category::RightDelimiter, column),
        '=' => lex_equals(lexer, column),
        '-' => lex_dash(lexer, column),
        '>' => lex_greater(lexer, column),
        c if c.is_ascii_alphabetic() => lex_word(lexer, c, column),
        _ => Lookahead::shape(Category::Other, column),
    }
}

/// `=` consumed; decide between `=`, `==`, `=>`, `=<`, `=|` and `====`.
fn lex_equals(lexer: &mut impl InputLexer, column: i16) -> Lookahead {
    match lexer.peek() {
        Some('>') => {
            lexer.advance(false);
            Lookahead::operator(TokenType::AsciiImpliesOp, column)
        }
        Some('<') => {
            lexer.advance(false);
            Lookahead::operator(TokenType::AsciiEqltOp, column)
        }
        Some('|') => {
            lexer.advance(false);
            Lookahead::operator(TokenType::AsciiLdttOp, column)
        }
        Some('=') => {
            lexer.advance(false);
            if lexer.peek() != Some('=') {
                return Lookahead::operator(TokenType::AsciiDefEq, column);
            }
            lexer.advance(false);
            if lexer.peek() != Some('=') {
                // Exactly `===` is accepted by nothing.
                return Lookahead::shape(Category::Other, column);
            }
            while lexer.peek() == Some('=') {
                lexer.advance(false);
            }
            Lookahead {
                token: Some(TokenType::DoubleLine),
                category: Category::ModuleEnd,
                column,
            }
        }
        _ => Lookahead::operator(TokenType::EqOp, column),
    }
}

/// `-` consumed; decide between `-`, `--`, `->`, `-|`, `-+->` and `----`.
fn lex_dash(lexer: &mut impl InputLexer, column: i16) -> Lookahead {
    match lexer.peek() {
        Some('>') => {
            lexer.advance(false);
            Lookahead {
                token: Some(TokenType::RArrow),
                category: Category::RightDelimiter,
                column,
            }
        }
        Some('|') => {
            lexer.advance(false);
            Lookahead::operator(TokenType::AsciiLsttOp, column)
        }
        Some('+') => {
            lexer.advance(false);
            if lexer.peek() == Some('-') {
                lexer.advance(false);
                if lexer.peek() == Some('>') {
                    lexer.advance(false);
                    return Lookahead::operator(TokenType::AsciiPlusArrowOp, column);
                }
            }
            // No other suffix of `-+` forms a token.
            Lookahead::shape(Category::Other, column)
        }
        Some('-') => {
            lexer.advance(false);
            if lexer.peek() != Some('-') {
                return Lookahead::operator(TokenType::MinusMinusOp, column);
            }
            lexer.advance(false);
            if lexer.peek() != Some('-') {
                // Exactly `---` is accepted by nothing.
                return Lookahead::shape(Category::Other, column);
            }
            while lexer.peek() == Some('-') {
                lexer.advance(false);
            }
            Lookahead {
                token: Some(TokenType::SingleLine),
                category: Category::UnitStart,
                column,
            }
        }
        _ => Lookahead::operator(TokenType::Dash, column),
    }
}

/// `>` consumed; decide between `>`, `>=`, `>>` and `>>_`.
fn lex_greater(lexer: &mut impl InputLexer, column: i16) -> Lookahead {
    match lexer.peek() {
        Some('=') => {
            lexer.advance(false);
            Lookahead::operator(TokenType::AsciiGeqOp, column)
        }
        Some('>') => {
            lexer.advance(false);
            let token = if lexer.peek() == Some('_') {
                lexer.advance(false);
                TokenType::RAngleBracketSub
            } else {
                TokenType::RAngleBracket
            };
            Lookahead {
                token: Some(token),
                category: Category::RightDelimiter,
                column,
            }
        }
        _ => Lookahead::operator(TokenType::GtOp, column),
    }
}

/// A letter consumed; read the rest of the word and classify it.
fn lex_word(lexer: &mut impl InputLexer, first: char, column: i16) -> Lookahead {
    let mut word = String::with_capacity(12);
    word.push(first);
    while let Some(c) = lexer.peek() {
        if !c.is_ascii_alphanumeric() && c != '_' {
            break;
        }
        word.push(c);
        lexer.advance(false);
    }
    let category = match word.as_str() {
        "THEN" | "ELSE" | "IN" => Category::RightDelimiter,
        "ASSUME" | "ASSUMPTION" | "AXIOM" | "CONSTANT" | "CONSTANTS" | "COROLLARY"
        | "LEMMA" | "LOCAL" | "PROPOSITION" | "RECURSIVE" | "THEOREM" | "VARIABLE"
        | "VARIABLES" => Category::UnitStart,
        _ => Category::Other,
    };
    Lookahead::shape(category, column)
}
