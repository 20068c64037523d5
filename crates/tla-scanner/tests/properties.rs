//! Property tests over the scanner invariants: snapshot round-trips,
//! stack monotonicity, INDENT/DEDENT balance, longest-match operator
//! recognition, and termination of zero-width DEDENT runs.

use proptest::prelude::*;
use tla_scanner::{Scanner, SourceLexer, TokenType, ValidTokens};

fn dfa_mask() -> ValidTokens {
    ValidTokens::ALL
        .without(TokenType::ExtramodularText)
        .without(TokenType::BlockCommentText)
}

/// Skip whitespace and consume one grammar-owned token: a junction
/// bullet atomically, anything else a codepoint at a time.
fn consume_grammar_token(src: &str, mut pos: usize) -> usize {
    while src[pos..].starts_with(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r')) {
        pos += 1;
    }
    let rest = &src[pos..];
    if rest.starts_with("/\\") || rest.starts_with("\\/") {
        pos + 2
    } else if let Some(c) = rest.chars().next() {
        pos + c.len_utf8()
    } else {
        pos
    }
}

/// Drive a full source through the scanner, checking the per-call
/// invariants, and return the INDENT and DEDENT counts.
fn drive_checked(src: &str) -> (usize, usize) {
    let mut scanner = Scanner::new();
    let mut pos = 0;
    let mut indents = 0;
    let mut dedents = 0;
    loop {
        let depth_before = scanner.depth();
        let mut lexer = SourceLexer::with_position(src, pos);
        match scanner.scan(&mut lexer, dfa_mask()) {
            Some(token) => {
                let range = lexer.token_range();
                assert!(pos <= range.start && range.start <= range.end);
                // Alignment columns strictly increase toward the top.
                let columns: Vec<i16> = scanner.records().iter().map(|r| r.column).collect();
                assert!(
                    columns.windows(2).all(|w| w[0] < w[1]),
                    "stack not monotone: {columns:?}"
                );
                match token {
                    TokenType::Indent => {
                        indents += 1;
                        assert_eq!(scanner.depth(), depth_before + 1);
                        assert_eq!(range.start, range.end);
                        pos = consume_grammar_token(src, range.end);
                    }
                    TokenType::Newline => {
                        assert_eq!(scanner.depth(), depth_before);
                        assert_eq!(range.start, range.end);
                        pos = consume_grammar_token(src, range.end);
                    }
                    TokenType::Dedent => {
                        // Zero-width, but every one shrinks the stack.
                        dedents += 1;
                        assert_eq!(scanner.depth() + 1, depth_before);
                        assert_eq!(range.start, range.end);
                        pos = range.end;
                    }
                    _ => {
                        assert!(range.end > range.start, "operator tokens have a span");
                        pos = range.end;
                    }
                }
            }
            None => {
                assert_eq!(scanner.depth(), depth_before, "declines must not touch state");
                let next = consume_grammar_token(src, pos);
                if next == pos {
                    break;
                }
                pos = next;
            }
        }
    }
    assert_eq!(scanner.depth(), 0, "EOF drains every open list");
    (indents, dedents)
}

fn bullet() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("/\\"), Just("\\/"), Just("∧"), Just("∨")]
}

/// Lines of bulleted items at arbitrary shallow indentation.
fn jlist_source() -> impl Strategy<Value = String> {
    proptest::collection::vec((0usize..6, bullet(), "[A-Za-z]{1,4}"), 1..12).prop_map(|lines| {
        lines
            .into_iter()
            .map(|(indent, bullet, word)| format!("{}{bullet} {word}", " ".repeat(indent)))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// Reference recognizer for the overloaded-prefix operator families:
/// the longest accepted token at the head of `s`, with its length.
fn reference_operator(s: &str) -> Option<(TokenType, usize)> {
    let chars: Vec<char> = s.chars().collect();
    match chars.first()? {
        '=' => {
            let run = chars.iter().take_while(|&&c| c == '=').count();
            match run {
                1 => match chars.get(1) {
                    Some('>') => Some((TokenType::AsciiImpliesOp, 2)),
                    Some('<') => Some((TokenType::AsciiEqltOp, 2)),
                    Some('|') => Some((TokenType::AsciiLdttOp, 2)),
                    _ => Some((TokenType::EqOp, 1)),
                },
                2 => Some((TokenType::AsciiDefEq, 2)),
                3 => None,
                n => Some((TokenType::DoubleLine, n)),
            }
        }
        '-' => {
            let run = chars.iter().take_while(|&&c| c == '-').count();
            match run {
                1 => match chars.get(1) {
                    Some('>') => Some((TokenType::RArrow, 2)),
                    Some('|') => Some((TokenType::AsciiLsttOp, 2)),
                    Some('+') if s.starts_with("-+->") => Some((TokenType::AsciiPlusArrowOp, 4)),
                    Some('+') => None,
                    _ => Some((TokenType::Dash, 1)),
                },
                2 => Some((TokenType::MinusMinusOp, 2)),
                3 => None,
                n => Some((TokenType::SingleLine, n)),
            }
        }
        '>' => match chars.get(1) {
            Some('=') => Some((TokenType::AsciiGeqOp, 2)),
            Some('>') if chars.get(2) == Some(&'_') => Some((TokenType::RAngleBracketSub, 3)),
            Some('>') => Some((TokenType::RAngleBracket, 2)),
            _ => Some((TokenType::GtOp, 1)),
        },
        _ => None,
    }
}

proptest! {
    /// Every reachable stack survives serialize/deserialize.
    #[test]
    fn serialization_round_trips(
        columns in proptest::collection::btree_set(0i16..400, 0..20),
        kinds in proptest::collection::vec(any::<bool>(), 20),
    ) {
        let stack: Vec<(bool, i16)> = kinds.into_iter().zip(columns).collect();
        let mut buffer = vec![stack.len() as u8];
        for &(disjunction, column) in &stack {
            buffer.push(u8::from(disjunction));
            buffer.extend_from_slice(&column.to_le_bytes());
        }

        let mut scanner = Scanner::new();
        scanner.deserialize(&buffer);
        prop_assert_eq!(scanner.depth(), stack.len());

        let mut out = [0u8; 1024];
        let written = scanner.serialize(&mut out).unwrap();
        prop_assert_eq!(&out[..written], &buffer[..]);

        let mut restored = Scanner::new();
        restored.deserialize(&out[..written]);
        prop_assert_eq!(restored, scanner);
    }

    /// Over full runs the stack stays monotone, every DEDENT pops,
    /// operators have real spans, and INDENTs balance DEDENTs once
    /// EOF drains the stack.
    #[test]
    fn junction_runs_balance(src in jlist_source()) {
        let (indents, dedents) = drive_checked(&src);
        prop_assert_eq!(indents, dedents);
    }

    /// The operator recognizer emits exactly the longest accepted
    /// token, checked against an independent table.
    #[test]
    fn longest_match_agrees_with_reference(src in "[=><|+_x-]{0,8}") {
        let mut scanner = Scanner::new();
        let mut lexer = SourceLexer::new(&src);
        let scanned = scanner.scan(&mut lexer, dfa_mask());
        match reference_operator(&src) {
            Some((token, len)) => {
                prop_assert_eq!(scanned, Some(token));
                prop_assert_eq!(lexer.token_range(), 0..len);
            }
            None => prop_assert_eq!(scanned, None),
        }
    }
}
