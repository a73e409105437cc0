// Chunk: docs/chunks/incremental_lexing - Token cursors over interval indexes

//! Token iterators.
//!
//! A [`TokenIterator`] is a bidirectional cursor, not a `std::iter::Iterator`:
//! consumers step forward and backward over token boundaries while reading
//! bounds, kind and attributes of the current token. Iterators borrow the
//! highlighter they came from, so any edit ends their lifetime.

use std::fmt;
use std::ops::Range;

use lite_lex_buffer::Style;

use crate::attributes::AttributeCache;
use crate::interval_index::IntervalIndex;
use crate::token::{TokenKind, TokenKindTable};

/// Cursor over highlighted tokens.
///
/// Accessors panic when called on an iterator that is [`at_end`](Self::at_end).
pub trait TokenIterator {
    fn start(&self) -> usize;
    fn end(&self) -> usize;
    /// Kind id, relative to the grammar that produced the token.
    fn kind(&self) -> TokenKind;
    fn kind_name(&self) -> &str;
    fn attributes(&self) -> Style;
    fn advance(&mut self);
    fn retreat(&mut self);
    fn at_end(&self) -> bool;
}

/// Iterates the intervals of one [`IntervalIndex`].
///
/// Position `len` is the one-past-last sentinel. Retreating from the first
/// interval also lands on the sentinel; advancing from it stays there.
#[derive(Clone, Copy)]
pub struct SegmentIterator<'a> {
    index: &'a IntervalIndex,
    kinds: &'a TokenKindTable,
    attributes: &'a AttributeCache,
    position: usize,
}

impl<'a> SegmentIterator<'a> {
    pub(crate) fn new(
        index: &'a IntervalIndex,
        kinds: &'a TokenKindTable,
        attributes: &'a AttributeCache,
        position: usize,
    ) -> Self {
        debug_assert!(position <= index.len());
        Self {
            index,
            kinds,
            attributes,
            position,
        }
    }

    /// Slot of the current interval in the index.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl fmt::Debug for SegmentIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentIterator")
            .field("position", &self.position)
            .field("len", &self.index.len())
            .finish_non_exhaustive()
    }
}

impl TokenIterator for SegmentIterator<'_> {
    fn start(&self) -> usize {
        self.index.start(self.position)
    }

    fn end(&self) -> usize {
        self.index.end(self.position)
    }

    fn kind(&self) -> TokenKind {
        self.index.kind(self.position)
    }

    fn kind_name(&self) -> &str {
        self.kinds.name(self.kind())
    }

    fn attributes(&self) -> Style {
        self.attributes.get(self.kind(), self.kinds)
    }

    fn advance(&mut self) {
        if self.position < self.index.len() {
            self.position += 1;
        }
    }

    fn retreat(&mut self) {
        self.position = match self.position {
            0 => self.index.len(),
            p if p == self.index.len() => p.saturating_sub(1),
            p => p - 1,
        };
    }

    fn at_end(&self) -> bool {
        self.position >= self.index.len()
    }
}

/// Clips another iterator to `span`.
///
/// Bounds are clamped to the span, and the iterator reports [`at_end`]
/// as soon as the inner one leaves it in either direction.
///
/// [`at_end`]: TokenIterator::at_end
#[derive(Debug, Clone)]
pub struct LimitedRange<I> {
    inner: I,
    span: Range<usize>,
}

impl<I: TokenIterator> LimitedRange<I> {
    pub fn new(inner: I, span: Range<usize>) -> Self {
        Self { inner, span }
    }

    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl<I: TokenIterator> TokenIterator for LimitedRange<I> {
    fn start(&self) -> usize {
        self.inner.start().max(self.span.start)
    }

    fn end(&self) -> usize {
        self.inner.end().min(self.span.end)
    }

    fn kind(&self) -> TokenKind {
        self.inner.kind()
    }

    fn kind_name(&self) -> &str {
        self.inner.kind_name()
    }

    fn attributes(&self) -> Style {
        self.inner.attributes()
    }

    fn advance(&mut self) {
        self.inner.advance();
    }

    fn retreat(&mut self) {
        self.inner.retreat();
    }

    fn at_end(&self) -> bool {
        self.inner.at_end()
            || self.inner.end() <= self.span.start
            || self.inner.start() >= self.span.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval_index::Interval;
    use crate::theme::SyntaxTheme;
    use crate::token::{LexerState, TokenDatum};
    use std::rc::Rc;

    struct Fixture {
        index: IntervalIndex,
        kinds: TokenKindTable,
        attributes: AttributeCache,
    }

    fn fixture() -> Fixture {
        let kinds = TokenKindTable::with_names(["identifier", "comment", "string"]);
        let mut index = IntervalIndex::new();
        for (start, end, kind) in [(0, 2, 0), (2, 5, 1), (5, 9, 2), (9, 10, 0)] {
            let datum = TokenDatum::new(TokenKind(kind), LexerState::INITIAL, true);
            index.push(Interval::new(start, end, datum));
        }
        Fixture {
            index,
            kinds,
            attributes: AttributeCache::new(Rc::new(SyntaxTheme::catppuccin_mocha())),
        }
    }

    fn bounds(it: &mut impl TokenIterator) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        while !it.at_end() {
            out.push((it.start(), it.end()));
            it.advance();
        }
        out
    }

    #[test]
    fn segments_walk_forward_and_back() {
        let f = fixture();
        let mut it = SegmentIterator::new(&f.index, &f.kinds, &f.attributes, 1);
        assert_eq!(it.kind_name(), "comment");
        assert!(it.attributes().italic);
        it.retreat();
        assert_eq!((it.start(), it.end()), (0, 2));
        it.retreat();
        assert!(it.at_end());
        it.retreat();
        assert_eq!(it.start(), 9);
    }

    #[test]
    fn segments_debug_shows_position() {
        let f = fixture();
        let it = SegmentIterator::new(&f.index, &f.kinds, &f.attributes, 1);
        assert_eq!(format!("{it:?}"), "SegmentIterator { position: 1, len: 4, .. }");
        let limited = LimitedRange::new(it, 3..7);
        assert_eq!(
            format!("{limited:?}"),
            "LimitedRange { inner: SegmentIterator { position: 1, len: 4, .. }, span: 3..7 }"
        );
    }

    #[test]
    fn sentinel_advance_stays_at_end() {
        let f = fixture();
        let mut it = SegmentIterator::new(&f.index, &f.kinds, &f.attributes, 4);
        assert!(it.at_end());
        it.advance();
        assert!(it.at_end());
    }

    #[test]
    fn limited_range_clamps_bounds() {
        let f = fixture();
        let inner = SegmentIterator::new(&f.index, &f.kinds, &f.attributes, 1);
        let mut limited = LimitedRange::new(inner, 3..7);
        assert_eq!(bounds(&mut limited), vec![(3, 5), (5, 7)]);
    }

    #[test]
    fn limited_range_stops_when_retreating_out() {
        let f = fixture();
        let inner = SegmentIterator::new(&f.index, &f.kinds, &f.attributes, 2);
        let mut limited = LimitedRange::new(inner, 3..7);
        limited.retreat();
        assert!(!limited.at_end());
        limited.retreat();
        assert!(limited.at_end());
    }

    #[test]
    fn limited_range_outside_span_is_at_end() {
        let f = fixture();
        let inner = SegmentIterator::new(&f.index, &f.kinds, &f.attributes, 3);
        assert!(LimitedRange::new(inner, 0..9).at_end());
    }
}
