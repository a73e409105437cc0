// Chunk: docs/chunks/reference_lexers - Regular expression grammar for embedded layers

//! Regular expression syntax, meant to be layered over string tokens.
//!
//! A newline always returns the lexer to its initial state, which makes
//! `"\n"` a safe separator between fragments in a virtual buffer.

use lite_lex_buffer::TextView;

use crate::lexer::{Lexer, Scan};
use crate::token::{LexerState, TokenKind, TokenKindTable};

pub const LITERAL: TokenKind = TokenKind(0);
pub const METACHAR: TokenKind = TokenKind(1);
pub const ESCAPE: TokenKind = TokenKind(2);
pub const CLASS_BRACKET: TokenKind = TokenKind(3);
pub const CLASS: TokenKind = TokenKind(4);
pub const NEWLINE: TokenKind = TokenKind(5);

const KIND_NAMES: [&str; 6] = [
    "regex.literal",
    "regex.metachar",
    "regex.escape",
    "regex.class.bracket",
    "regex.class",
    "whitespace",
];

pub const IN_CLASS: LexerState = LexerState(1);

const METACHARS: &str = ".*+?|()^${}";

#[derive(Debug, Clone)]
pub struct RegexLexer {
    kinds: TokenKindTable,
}

impl RegexLexer {
    pub fn new() -> Self {
        Self {
            kinds: TokenKindTable::with_names(KIND_NAMES),
        }
    }
}

impl Default for RegexLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for RegexLexer {
    fn scan(&self, text: TextView<'_>, offset: usize, state: LexerState) -> Scan {
        let in_class = state == IN_CLASS;
        let scan = |kind, end, next_state| Scan {
            kind,
            end,
            next_state,
        };

        match text[offset] {
            '\n' => scan(NEWLINE, offset + 1, LexerState::INITIAL),
            '\\' => {
                let end = if text.get(offset + 1).is_some_and(|c| c != '\n') {
                    offset + 2
                } else {
                    offset + 1
                };
                scan(ESCAPE, end, state)
            }
            ']' if in_class => scan(CLASS_BRACKET, offset + 1, LexerState::INITIAL),
            '[' if !in_class => scan(CLASS_BRACKET, offset + 1, IN_CLASS),
            c if !in_class && METACHARS.contains(c) => scan(METACHAR, offset + 1, state),
            _ => {
                let stops = |c: char| {
                    let closes = if in_class {
                        c == ']'
                    } else {
                        c == '[' || METACHARS.contains(c)
                    };
                    c == '\n' || c == '\\' || closes
                };
                let mut end = offset + 1;
                while end < text.len() && !stops(text[end]) {
                    end += 1;
                }
                scan(if in_class { CLASS } else { LITERAL }, end, state)
            }
        }
    }

    fn kinds(&self) -> &TokenKindTable {
        &self.kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenStream;

    fn lex(text: &str) -> Vec<(String, TokenKind)> {
        let lexer = RegexLexer::new();
        let chars: Vec<char> = text.chars().collect();
        TokenStream::start(&lexer, &chars, 0, chars.len(), LexerState::INITIAL)
            .map(|t| (chars[t.start..t.end].iter().collect(), t.kind))
            .collect()
    }

    fn tok(text: &str, kind: TokenKind) -> (String, TokenKind) {
        (text.to_string(), kind)
    }

    #[test]
    fn test_metachar_splits_literals() {
        assert_eq!(
            lex("a.b"),
            vec![tok("a", LITERAL), tok(".", METACHAR), tok("b", LITERAL)]
        );
    }

    #[test]
    fn test_escape_and_class() {
        assert_eq!(
            lex("\\d+[a-z.]x"),
            vec![
                tok("\\d", ESCAPE),
                tok("+", METACHAR),
                tok("[", CLASS_BRACKET),
                tok("a-z.", CLASS),
                tok("]", CLASS_BRACKET),
                tok("x", LITERAL),
            ]
        );
    }

    #[test]
    fn test_newline_leaves_class() {
        let lexer = RegexLexer::new();
        let chars: Vec<char> = "[ab\nc".chars().collect();
        let states: Vec<_> = TokenStream::start(&lexer, &chars, 0, chars.len(), LexerState::INITIAL)
            .map(|t| t.state)
            .collect();
        assert_eq!(states, vec![LexerState::INITIAL, IN_CLASS, IN_CLASS, LexerState::INITIAL]);
    }
}
