// Chunk: docs/chunks/incremental_lexing - Lexer contract and token cursor

//! The lexer contract and the cursor the highlighter drives it through.
//!
//! A [`Lexer`] is a pure function from `(text, offset, state)` to the next
//! token. It holds no cursor of its own; the [`TokenStream`] adds one
//! (`start`/`advance` and the current token's bounds, kind and start state)
//! and guards against lexers that stop making progress.

use std::rc::Rc;

use lite_lex_buffer::TextView;

use crate::token::{LexerState, TokenKind, TokenKindTable};

/// Result of scanning one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scan {
    pub kind: TokenKind,
    /// Exclusive end offset. `end == offset` means the lexer only changed
    /// state and produced no token.
    pub end: usize,
    /// State the lexer is in after the token.
    pub next_state: LexerState,
}

/// A tokenizer for one grammar.
pub trait Lexer {
    /// Scans the token starting at `offset` in `state`.
    ///
    /// `text` is the whole lexing window; the lexer must not report an `end`
    /// past `text.len()`. `offset < text.len()` always holds.
    fn scan(&self, text: TextView<'_>, offset: usize, state: LexerState) -> Scan;

    /// True if lexing may resume in `state` without any preceding context.
    fn is_initial_state(&self, state: LexerState) -> bool {
        state == LexerState::INITIAL
    }

    /// Names of the kinds this lexer produces.
    fn kinds(&self) -> &TokenKindTable;
}

/// Produces fresh lexers for embedded grammars.
pub type LexerFactory = Rc<dyn Fn() -> Box<dyn Lexer>>;

/// One token as produced by a [`TokenStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexedToken {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
    /// State the lexer was in at `start`.
    pub state: LexerState,
}

/// Cursor over the tokens of a text window.
///
/// After [`TokenStream::start`] the stream is positioned on the first token;
/// [`TokenStream::advance`] moves to the next one. Once the window is
/// exhausted [`TokenStream::current`] returns `None`.
pub struct TokenStream<'a> {
    lexer: &'a dyn Lexer,
    window: TextView<'a>,
    /// Where the next scan starts, and in which state.
    offset: usize,
    state: LexerState,
    current: Option<LexedToken>,
}

impl<'a> TokenStream<'a> {
    /// Starts lexing `text[start..end]` in `initial_state`.
    ///
    /// Offsets reported by the stream are relative to `text`, not to the
    /// window.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > text.len()`, and on any of the
    /// conditions listed for [`TokenStream::advance`].
    pub fn start(
        lexer: &'a dyn Lexer,
        text: impl Into<TextView<'a>>,
        start: usize,
        end: usize,
        initial_state: LexerState,
    ) -> Self {
        let text: TextView<'_> = text.into();
        assert!(
            start <= end && end <= text.len(),
            "lexing window {start}..{end} is outside text of length {}",
            text.len()
        );
        let mut stream = Self {
            lexer,
            window: text.prefix(end),
            offset: start,
            state: initial_state,
            current: None,
        };
        stream.advance();
        stream
    }

    /// Moves to the next token.
    ///
    /// # Panics
    ///
    /// Panics when the lexer is not progressing: a zero-width scan that keeps
    /// the state, or a chain of zero-width scans long enough that a state must
    /// have repeated. Also panics when a scan ends before its start or past
    /// the window.
    pub fn advance(&mut self) {
        let mut zero_width_steps = 0u32;
        loop {
            if self.offset >= self.window.len() {
                self.current = None;
                return;
            }

            let scan = self.lexer.scan(self.window, self.offset, self.state);
            assert!(
                scan.end >= self.offset && scan.end <= self.window.len(),
                "lexer returned end {} for a token at {} in a window of length {}",
                scan.end,
                self.offset,
                self.window.len()
            );

            if scan.end == self.offset {
                zero_width_steps += 1;
                assert!(
                    scan.next_state != self.state && zero_width_steps <= u32::from(LexerState::MAX) + 1,
                    "lexer is not progressing at offset {} in state {}",
                    self.offset,
                    self.state.0
                );
                self.state = scan.next_state;
                continue;
            }

            self.current = Some(LexedToken {
                start: self.offset,
                end: scan.end,
                kind: scan.kind,
                state: self.state,
            });
            self.offset = scan.end;
            self.state = scan.next_state;
            return;
        }
    }

    pub fn current(&self) -> Option<LexedToken> {
        self.current
    }

    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        self.current.map(|token| token.kind)
    }

    pub fn token_start(&self) -> Option<usize> {
        self.current.map(|token| token.start)
    }

    pub fn token_end(&self) -> Option<usize> {
        self.current.map(|token| token.end)
    }

    /// State at the start of the current token.
    pub fn state(&self) -> Option<LexerState> {
        self.current.map(|token| token.state)
    }

    /// True if the current token starts in a resumable state.
    pub fn is_initial(&self) -> bool {
        self.current
            .is_some_and(|token| self.lexer.is_initial_state(token.state))
    }
}

impl Iterator for TokenStream<'_> {
    type Item = LexedToken;

    fn next(&mut self) -> Option<LexedToken> {
        let token = self.current?;
        self.advance();
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits text into single-char tokens; `#` toggles state 1 with a
    /// zero-width transition before it.
    struct CharLexer {
        kinds: TokenKindTable,
    }

    impl CharLexer {
        fn new() -> Self {
            Self {
                kinds: TokenKindTable::with_names(["char", "hash"]),
            }
        }
    }

    impl Lexer for CharLexer {
        fn scan(&self, text: TextView<'_>, offset: usize, state: LexerState) -> Scan {
            if text[offset] == '#' && state == LexerState::INITIAL {
                return Scan {
                    kind: TokenKind(0),
                    end: offset,
                    next_state: LexerState(1),
                };
            }
            let kind = if text[offset] == '#' { TokenKind(1) } else { TokenKind(0) };
            Scan {
                kind,
                end: offset + 1,
                next_state: LexerState::INITIAL,
            }
        }

        fn kinds(&self) -> &TokenKindTable {
            &self.kinds
        }
    }

    /// Never advances and never changes state.
    struct StuckLexer(TokenKindTable);

    impl Lexer for StuckLexer {
        fn scan(&self, _text: TextView<'_>, offset: usize, state: LexerState) -> Scan {
            Scan {
                kind: TokenKind(0),
                end: offset,
                next_state: state,
            }
        }

        fn kinds(&self) -> &TokenKindTable {
            &self.0
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn stream_reports_tokens_and_states() {
        let lexer = CharLexer::new();
        let text = chars("a#b");
        let tokens: Vec<_> = TokenStream::start(&lexer, &text, 0, 3, LexerState::INITIAL).collect();
        assert_eq!(
            tokens,
            vec![
                LexedToken { start: 0, end: 1, kind: TokenKind(0), state: LexerState(0) },
                LexedToken { start: 1, end: 2, kind: TokenKind(1), state: LexerState(1) },
                LexedToken { start: 2, end: 3, kind: TokenKind(0), state: LexerState(0) },
            ]
        );
    }

    #[test]
    fn stream_respects_window() {
        let lexer = CharLexer::new();
        let text = chars("abcdef");
        let mut stream = TokenStream::start(&lexer, &text, 2, 4, LexerState::INITIAL);
        assert_eq!(stream.token_start(), Some(2));
        assert!(stream.is_initial());
        stream.advance();
        assert_eq!(stream.token_end(), Some(4));
        stream.advance();
        assert!(stream.at_end());
        assert_eq!(stream.token_kind(), None);
    }

    #[test]
    fn empty_window_is_at_end() {
        let lexer = CharLexer::new();
        let text = chars("abc");
        assert!(TokenStream::start(&lexer, &text, 3, 3, LexerState::INITIAL).at_end());
    }

    #[test]
    #[should_panic(expected = "lexer is not progressing")]
    fn stalled_lexer_panics() {
        let lexer = StuckLexer(TokenKindTable::with_names(["x"]));
        let text = chars("abc");
        TokenStream::start(&lexer, &text, 0, 3, LexerState::INITIAL);
    }
}
