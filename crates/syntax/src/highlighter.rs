// Chunk: docs/chunks/syntax_highlighting - Core syntax highlighter with incremental updates
// Chunk: docs/chunks/incremental_lexing - Resync-based incremental relexing

//! Lexer-driven highlighter with incremental relexing.
//!
//! The [`Highlighter`] owns one lexer and the [`IntervalIndex`] of its tokens.
//! After an edit it relexes only the region whose tokens can have changed:
//!
//! 1. Step back from the edit to a token that started in an initial state,
//!    so lexing can restart there without context.
//! 2. Relex forward, confirming stored tokens that come out identical
//!    (catch-up). This stops at the first stored token reaching past the
//!    edit offset, or at the first mismatch.
//! 3. Keep lexing into a scratch list until a token past the edit starts in
//!    an initial state at the same shifted offset, with the same datum, as a
//!    stored token. From there the old tail is reused as is.
//! 4. Shift the reused tail by the length delta and splice the scratch list
//!    in. One shift plus one splice per edit.
//!
//! The result is always identical to tokenizing the new text from scratch.
//! Constructs that never return to an initial state (an unterminated block
//! comment) make step 3 run to the end of the text, which stays correct but
//! costs a relex of the rest of the buffer.

use std::ops::Range;
use std::rc::Rc;

use lite_lex_buffer::{Span, Style, TextView};
use tracing::{debug, trace};

use crate::attributes::AttributeCache;
use crate::config::HighlighterConfig;
use crate::edit::EditEvent;
use crate::error::HighlightError;
use crate::interval_index::{Interval, IntervalIndex};
use crate::iterator::{SegmentIterator, TokenIterator};
use crate::lexer::{LexedToken, Lexer, TokenStream};
use crate::source::TokenSource;
use crate::theme::{ColorScheme, SyntaxTheme};
use crate::token::{LexerState, TokenDatum, TokenKind, TokenKindTable};

/// The single splice an update performed on the index: `old_count`
/// intervals at slot `start` were replaced by `new_count` intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexChange {
    pub start: usize,
    pub old_count: usize,
    pub new_count: usize,
}

impl IndexChange {
    pub fn is_empty(&self) -> bool {
        self.old_count == 0 && self.new_count == 0
    }
}

/// What an incremental update did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Offsets (in the new text) whose tokens changed.
    pub repaint: Range<usize>,
    pub change: IndexChange,
}

/// Incremental highlighter for one grammar.
pub struct Highlighter {
    lexer: Box<dyn Lexer>,
    index: IntervalIndex,
    /// Length of the text the index currently describes
    text_len: usize,
    config: HighlighterConfig,
    attributes: AttributeCache,
    /// Edit counter for sampling debug assertions (debug builds only).
    #[cfg(debug_assertions)]
    debug_edit_count: u64,
}

impl Highlighter {
    pub fn new(lexer: Box<dyn Lexer>, scheme: Rc<dyn ColorScheme>, config: HighlighterConfig) -> Self {
        Self {
            lexer,
            index: IntervalIndex::new(),
            text_len: 0,
            config,
            attributes: AttributeCache::new(scheme),
            #[cfg(debug_assertions)]
            debug_edit_count: 0,
        }
    }

    /// Creates a highlighter with the Catppuccin theme and default config.
    pub fn with_lexer(lexer: Box<dyn Lexer>) -> Self {
        Self::new(
            lexer,
            Rc::new(SyntaxTheme::catppuccin_mocha()),
            HighlighterConfig::default(),
        )
    }

    // ==================== Accessors ====================

    pub fn index(&self) -> &IntervalIndex {
        &self.index
    }

    pub fn intervals(&self) -> Vec<Interval> {
        self.index.intervals()
    }

    pub fn lexer(&self) -> &dyn Lexer {
        &*self.lexer
    }

    pub fn kinds(&self) -> &TokenKindTable {
        self.lexer.kinds()
    }

    pub fn config(&self) -> &HighlighterConfig {
        &self.config
    }

    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Resolved style of `kind` under the current color scheme.
    pub fn attributes(&self, kind: TokenKind) -> Style {
        self.attributes.get(kind, self.lexer.kinds())
    }

    pub fn set_color_scheme(&mut self, scheme: Rc<dyn ColorScheme>) {
        self.attributes.set_scheme(scheme);
    }

    /// Iterator positioned on the interval containing `offset`.
    pub fn segments(&self, offset: usize) -> Result<SegmentIterator<'_>, HighlightError> {
        let position = if offset == self.text_len {
            self.index.len()
        } else {
            self.index.locate(offset)?
        };
        Ok(SegmentIterator::new(
            &self.index,
            self.lexer.kinds(),
            &self.attributes,
            position,
        ))
    }

    // ==================== Updates ====================

    /// Tokenizes `text` from scratch, replacing the whole index.
    pub fn set_text<'t>(&mut self, text: impl Into<TextView<'t>>) -> IndexChange {
        let text: TextView<'_> = text.into();
        let intervals: Vec<Interval> =
            TokenStream::start(&*self.lexer, text, 0, text.len(), LexerState::INITIAL)
                .map(|token| self.interval_for(token))
                .collect();

        let old_count = self.index.len();
        self.index.clear();
        self.index.splice(0..0, &intervals);
        self.text_len = text.len();
        debug!(len = text.len(), tokens = intervals.len(), "full relex");

        IndexChange {
            start: 0,
            old_count,
            new_count: intervals.len(),
        }
    }

    /// Updates the index after `event` turned the previous text into `text`.
    ///
    /// Fails without touching the index if the event does not fit the
    /// previous text or `text` does not have the post-edit length.
    ///
    /// # Panics
    ///
    /// Panics if the lexer stops making progress.
    pub fn apply_edit<'t>(
        &mut self,
        text: impl Into<TextView<'t>>,
        event: EditEvent,
    ) -> Result<EditOutcome, HighlightError> {
        let text: TextView<'_> = text.into();
        let old_len = self.text_len;
        if event.old_end() > old_len {
            return Err(HighlightError::EditOutOfRange {
                offset: event.offset,
                end: event.old_end(),
                len: old_len,
            });
        }
        let expected = old_len - event.old_len + event.new_len;
        if text.len() != expected {
            return Err(HighlightError::LengthMismatch {
                expected,
                actual: text.len(),
            });
        }

        if self.index.is_empty() {
            let change = self.set_text(text);
            return Ok(EditOutcome {
                repaint: 0..text.len(),
                change,
            });
        }

        let count = self.index.len();
        let start_index = self.resync_index(event.offset)?;

        let (first, mut scratch, tail) = {
            let restart_state = if start_index == 0 {
                LexerState::INITIAL
            } else {
                self.index.datum(start_index).state()
            };
            let mut stream = TokenStream::start(
                &*self.lexer,
                text,
                self.index.start(start_index),
                text.len(),
                restart_state,
            );

            // Catch-up: confirm stored intervals the relex reproduces exactly.
            let mut first = start_index;
            while first < count && self.index.end(first) <= event.offset {
                match stream.current() {
                    Some(token) if self.interval_for(token) == self.index.interval(first) => {
                        first += 1;
                        stream.advance();
                    }
                    _ => break,
                }
            }

            // Relex into scratch until the old tail lines up again.
            let new_end = event.new_end();
            let mut scratch = Vec::new();
            let mut tail = None;
            while let Some(token) = stream.current() {
                let interval = self.interval_for(token);
                if token.start >= new_end && interval.datum.is_initial() {
                    let old_start = event.unshift_new(token.start);
                    if old_start < old_len {
                        let idx = self.index.locate(old_start)?;
                        if self.index.start(idx) == old_start && self.index.datum(idx) == interval.datum {
                            tail = Some(idx);
                            break;
                        }
                    }
                }
                scratch.push(interval);
                stream.advance();
            }
            (first, scratch, tail)
        };

        // Intervals past the old edit range that came out identical stay in
        // the reused tail instead of being replaced by equal copies.
        let mut tail_index = tail.unwrap_or(count);
        while tail_index > first && self.index.start(tail_index - 1) >= event.old_end() {
            let stored = self.index.interval(tail_index - 1);
            let shifted = Interval::new(
                event.shift_old(stored.start),
                event.shift_old(stored.end),
                stored.datum,
            );
            if scratch.last() != Some(&shifted) {
                break;
            }
            scratch.pop();
            tail_index -= 1;
        }

        self.index.shift(tail_index, event.delta());
        self.index.splice(first..tail_index, &scratch);
        self.text_len = text.len();
        self.assert_index_consistent();

        let repaint_start = scratch.first().map_or(event.offset, |i| i.start).min(event.offset);
        let repaint_end = scratch.last().map_or(event.offset, |i| i.end).max(event.new_end());
        let change = IndexChange {
            start: first,
            old_count: tail_index - first,
            new_count: scratch.len(),
        };
        trace!(
            offset = event.offset,
            old_len = event.old_len,
            new_len = event.new_len,
            start_index,
            first,
            reused_tail = tail.is_some(),
            relexed = scratch.len(),
            "incremental relex"
        );

        Ok(EditOutcome {
            repaint: repaint_start..repaint_end,
            change,
        })
    }

    /// Slot to restart lexing from for an edit at `offset`.
    ///
    /// Starts at the token holding the character before the edit (it may grow
    /// into the edit), steps back `resync_margin` tokens for lexers that look
    /// ahead past a token's end, then further back to an initial state.
    fn resync_index(&self, offset: usize) -> Result<usize, HighlightError> {
        let anchor = offset.saturating_sub(1).min(self.text_len - 1);
        let located = self.index.locate(anchor)?;
        let mut start_index = located.saturating_sub(self.config.resync_margin);
        while start_index > 0 && !self.index.datum(start_index).is_initial() {
            start_index -= 1;
        }
        Ok(start_index)
    }

    fn interval_for(&self, token: LexedToken) -> Interval {
        let initial = self.lexer.is_initial_state(token.state);
        Interval::new(
            token.start,
            token.end,
            TokenDatum::new(token.kind, token.state, initial),
        )
    }

    /// Every 64th edit, checks that the index still tiles the text.
    #[cfg(debug_assertions)]
    fn assert_index_consistent(&mut self) {
        self.debug_edit_count += 1;
        if self.debug_edit_count % 64 == 0 {
            self.index.assert_contiguous(self.text_len);
        }
    }

    #[cfg(not(debug_assertions))]
    fn assert_index_consistent(&mut self) {}

    // ==================== Rendering ====================

    /// Styled spans for `text[range]`, adjacent equal styles merged.
    pub fn styled_spans<'t>(
        &self,
        text: impl Into<TextView<'t>>,
        range: Range<usize>,
    ) -> Result<Vec<Span>, HighlightError> {
        let it = self.segments(range.start)?;
        let text: TextView<'_> = text.into();
        let chars = text.to_vec(range.clone());
        Ok(styled_spans(it, range, &chars))
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("text_len", &self.text_len)
            .field("tokens", &self.index.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl TokenSource for Highlighter {
    type Iter<'a> = SegmentIterator<'a>;

    fn set_text(&mut self, text: TextView<'_>) {
        Highlighter::set_text(self, text);
    }

    fn on_edit(&mut self, text: TextView<'_>, event: EditEvent) -> Result<Range<usize>, HighlightError> {
        self.apply_edit(text, event).map(|outcome| outcome.repaint)
    }

    fn iterator(&self, offset: usize) -> Result<SegmentIterator<'_>, HighlightError> {
        self.segments(offset)
    }

    fn set_color_scheme(&mut self, scheme: Rc<dyn ColorScheme>) {
        Highlighter::set_color_scheme(self, scheme);
    }

    fn text_len(&self) -> usize {
        self.text_len
    }
}

/// Styled spans over `range`, whose characters are `chars`, adjacent equal
/// styles merged. Text not covered by any token is unstyled.
pub(crate) fn styled_spans(mut it: impl TokenIterator, range: Range<usize>, chars: &[char]) -> Vec<Span> {
    let text = |start: usize, end: usize| -> String {
        chars[start - range.start..end - range.start].iter().collect()
    };

    let mut spans = Vec::new();
    let mut covered = range.start;
    while covered < range.end && !it.at_end() {
        let start = it.start().max(covered);
        let end = it.end().min(range.end);
        if start < end {
            spans.push(Span::new(text(start, end), it.attributes()));
            covered = end;
        }
        it.advance();
    }
    if covered < range.end {
        spans.push(Span::plain(text(covered, range.end)));
    }
    merge_spans(spans)
}

/// Merges adjacent spans that have the same style.
fn merge_spans(spans: Vec<Span>) -> Vec<Span> {
    let mut result: Vec<Span> = Vec::with_capacity(spans.len());

    for span in spans {
        if let Some(last) = result.last_mut() {
            if last.style == span.style {
                last.text.push_str(&span.text);
                continue;
            }
        }
        result.push(span);
    }

    result
}
