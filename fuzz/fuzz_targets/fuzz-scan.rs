#![no_main]
use tla_scanner::{Scanner, SourceLexer, TokenType, ValidTokens};

#[macro_use]
extern crate libfuzzer_sys;

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

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let (mask_bytes, rest) = data.split_at(4);
    let Ok(src) = std::str::from_utf8(rest) else {
        return;
    };
    let valid =
        ValidTokens::from_bits_truncate(u32::from_le_bytes(mask_bytes.try_into().unwrap()));

    let mut scanner = Scanner::new();
    let mut pos = 0;
    loop {
        let depth_before = scanner.depth();
        let mut lexer = SourceLexer::with_position(src, pos);
        match scanner.scan(&mut lexer, valid) {
            Some(token) => {
                let columns: Vec<i16> = scanner.records().iter().map(|r| r.column).collect();
                assert!(columns.windows(2).all(|w| w[0] < w[1]));
                if token == TokenType::Dedent {
                    assert_eq!(scanner.depth() + 1, depth_before);
                }
                pos = lexer.token_range().end;
                if matches!(token, TokenType::Indent | TokenType::Newline) {
                    pos = consume_grammar_token(src, pos);
                }
            }
            None => {
                let next = consume_grammar_token(src, pos);
                if next == pos {
                    break;
                }
                pos = next;
            }
        }
    }

    let mut buffer = [0u8; 1024];
    let written = scanner.serialize(&mut buffer).unwrap();
    let mut restored = Scanner::new();
    restored.deserialize(&buffer[..written]);
    assert_eq!(restored, scanner);
});
