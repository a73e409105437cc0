// Chunk: docs/chunks/reference_lexers - C-style reference grammar

//! A small C-like grammar with block comments and double-quoted strings.
//!
//! Comment and string bodies are separate tokens lexed in their own states,
//! so an edit inside them exercises the non-initial resync path.

use lite_lex_buffer::TextView;

use crate::lexer::{Lexer, Scan};
use crate::token::{LexerState, TokenKind, TokenKindTable};

pub const IDENTIFIER: TokenKind = TokenKind(0);
pub const KEYWORD: TokenKind = TokenKind(1);
pub const NUMBER: TokenKind = TokenKind(2);
pub const WHITESPACE: TokenKind = TokenKind(3);
pub const OPERATOR: TokenKind = TokenKind(4);
pub const BAD_CHARACTER: TokenKind = TokenKind(5);
pub const COMMENT_START: TokenKind = TokenKind(6);
pub const COMMENT_BODY: TokenKind = TokenKind(7);
pub const COMMENT_END: TokenKind = TokenKind(8);
pub const QUOTE: TokenKind = TokenKind(9);
pub const STRING: TokenKind = TokenKind(10);

const KIND_NAMES: [&str; 11] = [
    "identifier",
    "keyword",
    "number",
    "whitespace",
    "operator",
    "bad_character",
    "comment.block.start",
    "comment.block",
    "comment.block.end",
    "string.quote",
    "string",
];

pub const NORMAL: LexerState = LexerState::INITIAL;
pub const IN_COMMENT: LexerState = LexerState(1);
pub const IN_STRING: LexerState = LexerState(2);

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "return", "break", "continue", "int", "char", "void",
    "struct", "const", "static",
];

const OPERATORS: &str = "+-*/%=<>!&|^~?:;,.()[]{}";

#[derive(Debug, Clone)]
pub struct CStyleLexer {
    kinds: TokenKindTable,
}

impl CStyleLexer {
    pub fn new() -> Self {
        Self {
            kinds: TokenKindTable::with_names(KIND_NAMES),
        }
    }

    fn scan_normal(&self, text: TextView<'_>, offset: usize) -> Scan {
        let c = text[offset];
        let token = |kind, end| Scan {
            kind,
            end,
            next_state: NORMAL,
        };

        if c.is_alphabetic() || c == '_' {
            let end = run_end(text, offset, |c| c.is_alphanumeric() || c == '_');
            let word = text.slice(offset..end);
            let kind = if KEYWORDS.contains(&word.as_str()) {
                KEYWORD
            } else {
                IDENTIFIER
            };
            return token(kind, end);
        }
        if c.is_ascii_digit() {
            return token(NUMBER, run_end(text, offset, |c| c.is_alphanumeric() || c == '.'));
        }
        if c.is_whitespace() {
            return token(WHITESPACE, run_end(text, offset, char::is_whitespace));
        }
        if c == '/' && text.get(offset + 1) == Some('*') {
            return Scan {
                kind: COMMENT_START,
                end: offset + 2,
                next_state: IN_COMMENT,
            };
        }
        if c == '"' {
            return Scan {
                kind: QUOTE,
                end: offset + 1,
                next_state: IN_STRING,
            };
        }
        if OPERATORS.contains(c) {
            return token(OPERATOR, offset + 1);
        }
        token(BAD_CHARACTER, offset + 1)
    }

    fn scan_comment(&self, text: TextView<'_>, offset: usize) -> Scan {
        if is_comment_end(text, offset) {
            return Scan {
                kind: COMMENT_END,
                end: offset + 2,
                next_state: NORMAL,
            };
        }
        let mut end = offset + 1;
        while end < text.len() && !is_comment_end(text, end) {
            end += 1;
        }
        Scan {
            kind: COMMENT_BODY,
            end,
            next_state: IN_COMMENT,
        }
    }

    fn scan_string(&self, text: TextView<'_>, offset: usize) -> Scan {
        match text[offset] {
            '"' => Scan {
                kind: QUOTE,
                end: offset + 1,
                next_state: NORMAL,
            },
            // Strings do not span lines
            '\n' => Scan {
                kind: WHITESPACE,
                end: offset + 1,
                next_state: NORMAL,
            },
            _ => {
                let mut end = offset;
                while end < text.len() && text[end] != '"' && text[end] != '\n' {
                    if text[end] == '\\' && end + 1 < text.len() && text[end + 1] != '\n' {
                        end += 1;
                    }
                    end += 1;
                }
                Scan {
                    kind: STRING,
                    end,
                    next_state: IN_STRING,
                }
            }
        }
    }
}

impl Default for CStyleLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer for CStyleLexer {
    fn scan(&self, text: TextView<'_>, offset: usize, state: LexerState) -> Scan {
        match state {
            IN_COMMENT => self.scan_comment(text, offset),
            IN_STRING => self.scan_string(text, offset),
            _ => self.scan_normal(text, offset),
        }
    }

    fn kinds(&self) -> &TokenKindTable {
        &self.kinds
    }
}

fn is_comment_end(text: TextView<'_>, offset: usize) -> bool {
    text.get(offset) == Some('*') && text.get(offset + 1) == Some('/')
}

fn run_end(text: TextView<'_>, offset: usize, pred: impl Fn(char) -> bool) -> usize {
    let mut end = offset + 1;
    while end < text.len() && pred(text[end]) {
        end += 1;
    }
    end
}
