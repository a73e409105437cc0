// Chunk: docs/chunks/layered_highlighting - Virtual buffers for embedded grammars

//! One embedded grammar's private buffer and highlighter.
//!
//! A [`Mapper`] concatenates the text of every outer token assigned to its
//! layer, in document order, each fragment preceded by the layer's
//! separator:
//!
//! ```text
//! outer:   x = "a.b"; y = "c+"
//! virtual: \na.b\nc+
//! ```
//!
//! The nested highlighter tokenizes that buffer incrementally like any other
//! text. The separator itself is never exposed: iteration is clipped to the
//! fragment spans recorded in [`MappedRange`]s.

use lite_lex_buffer::GapBuffer;
use tracing::trace;

use crate::config::HighlighterConfig;
use crate::edit::EditEvent;
use crate::error::HighlightError;
use crate::highlighter::Highlighter;
use crate::layered::LayerDescriptor;
use crate::theme::ColorScheme;
use crate::token::TokenKind;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MapperId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RangeId(usize);

/// A fragment of a virtual buffer mirroring one outer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MappedRange {
    pub mapper: MapperId,
    /// Outer token kind the mapping was created for
    pub outer_kind: TokenKind,
    /// Fragment bounds in the virtual buffer, separator excluded
    pub start: usize,
    pub end: usize,
}

/// Owner of all [`MappedRange`]s, addressed by [`RangeId`].
///
/// Released ids are recycled, so a stale id is a logic error that panics on
/// access.
#[derive(Debug, Default)]
pub(crate) struct RangeArena {
    ranges: Vec<Option<MappedRange>>,
    free: Vec<RangeId>,
}

impl RangeArena {
    pub fn alloc(&mut self, range: MappedRange) -> RangeId {
        match self.free.pop() {
            Some(id) => {
                self.ranges[id.0] = Some(range);
                id
            }
            None => {
                self.ranges.push(Some(range));
                RangeId(self.ranges.len() - 1)
            }
        }
    }

    pub fn release(&mut self, id: RangeId) -> MappedRange {
        let range = self.ranges[id.0]
            .take()
            .unwrap_or_else(|| panic!("mapped range {id:?} released twice"));
        self.free.push(id);
        range
    }

    pub fn get(&self, id: RangeId) -> &MappedRange {
        self.ranges[id.0]
            .as_ref()
            .unwrap_or_else(|| panic!("mapped range {id:?} is dangling"))
    }

    fn get_mut(&mut self, id: RangeId) -> &mut MappedRange {
        self.ranges[id.0]
            .as_mut()
            .unwrap_or_else(|| panic!("mapped range {id:?} is dangling"))
    }

    pub fn live_count(&self) -> usize {
        self.ranges.len() - self.free.len()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
        self.free.clear();
    }
}

pub(crate) struct Mapper {
    descriptor: LayerDescriptor,
    separator: Vec<char>,
    buffer: GapBuffer,
    nested: Highlighter,
    /// Ranges in document order, which is also virtual buffer order
    order: Vec<RangeId>,
}

impl Mapper {
    pub fn new(descriptor: LayerDescriptor, scheme: Rc<dyn ColorScheme>, config: HighlighterConfig) -> Self {
        let nested = Highlighter::new(descriptor.create_lexer(), scheme, config);
        Self {
            separator: descriptor.separator().chars().collect(),
            descriptor,
            buffer: GapBuffer::new(),
            nested,
            order: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> &LayerDescriptor {
        &self.descriptor
    }

    pub fn nested(&self) -> &Highlighter {
        &self.nested
    }

    pub fn nested_mut(&mut self) -> &mut Highlighter {
        &mut self.nested
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn order(&self) -> &[RangeId] {
        &self.order
    }

    pub fn fragment(&self, range: &MappedRange) -> String {
        self.buffer.slice(range.start, range.end)
    }

    /// Replaces the whole buffer; `order` lists the ranges `content` holds.
    pub fn rebuild(&mut self, content: &[char], order: Vec<RangeId>) {
        self.buffer.clear();
        self.buffer.replace(0, 0, content);
        self.order = order;
        self.nested.set_text(self.buffer.view());
    }

    /// Inserts `separator + text` at virtual offset `at`, which must be 0 or
    /// the end of an existing fragment.
    ///
    /// Returns the new range and whether the nested relex spilled outside
    /// the inserted text.
    pub fn insert(
        &mut self,
        arena: &mut RangeArena,
        id: MapperId,
        at: usize,
        text: &[char],
        outer_kind: TokenKind,
    ) -> Result<(RangeId, bool), HighlightError> {
        let position = self.order.partition_point(|&r| arena.get(r).start < at);
        let mut inserted = Vec::with_capacity(self.separator.len() + text.len());
        inserted.extend_from_slice(&self.separator);
        inserted.extend_from_slice(text);

        self.shift_from(arena, position, inserted.len() as isize);
        let start = at + self.separator.len();
        let range = arena.alloc(MappedRange {
            mapper: id,
            outer_kind,
            start,
            end: start + text.len(),
        });
        self.order.insert(position, range);

        let spilled = self.edit(at, 0, &inserted)?;
        Ok((range, spilled))
    }

    /// Replaces the fragment of `range` with `text`.
    ///
    /// Returns whether the nested relex spilled outside the fragment. An
    /// unchanged fragment leaves the buffer untouched.
    pub fn replace(&mut self, arena: &mut RangeArena, range: RangeId, text: &[char]) -> Result<bool, HighlightError> {
        let MappedRange { start, end, .. } = *arena.get(range);
        if self.buffer.range_eq(start..end, text) {
            return Ok(false);
        }

        let position = self.position_of(arena, range);
        self.shift_from(arena, position + 1, text.len() as isize - (end - start) as isize);
        arena.get_mut(range).end = start + text.len();
        self.edit(start, end - start, text)
    }

    /// Deletes the fragment of `range` with its leading separator and
    /// releases the range.
    pub fn remove(&mut self, arena: &mut RangeArena, range: RangeId) -> Result<bool, HighlightError> {
        let position = self.position_of(arena, range);
        let removed = arena.release(range);
        self.order.remove(position);

        let from = removed.start - self.separator.len();
        let len = removed.end - from;
        self.shift_from(arena, position, -(len as isize));
        self.edit(from, len, &[])
    }

    fn position_of(&self, arena: &RangeArena, range: RangeId) -> usize {
        let start = arena.get(range).start;
        let position = self.order.partition_point(|&r| arena.get(r).start < start);
        debug_assert_eq!(self.order.get(position), Some(&range));
        position
    }

    fn shift_from(&self, arena: &mut RangeArena, position: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        for &id in &self.order[position..] {
            let range = arena.get_mut(id);
            range.start = range.start.wrapping_add_signed(delta);
            range.end = range.end.wrapping_add_signed(delta);
        }
    }

    /// Applies one buffer edit and relexes the nested highlighter.
    fn edit(&mut self, offset: usize, old_len: usize, inserted: &[char]) -> Result<bool, HighlightError> {
        self.buffer.replace(offset, old_len, inserted);
        let event = EditEvent::new(offset, old_len, inserted.len());
        let outcome = self.nested.apply_edit(self.buffer.view(), event)?;

        let spilled = outcome.repaint.start < offset || outcome.repaint.end > event.new_end();
        trace!(
            offset,
            old_len,
            new_len = inserted.len(),
            repaint = ?outcome.repaint,
            spilled,
            "virtual buffer edit"
        );
        Ok(spilled)
    }

    /// Panics unless the buffer is exactly `separator + fragment` per range.
    pub fn assert_consistent(&self, arena: &RangeArena) {
        let mut expected = 0;
        for &id in &self.order {
            let range = arena.get(id);
            assert_eq!(
                range.start,
                expected + self.separator.len(),
                "fragment {id:?} is not preceded by exactly one separator"
            );
            assert!(
                self.buffer.range_eq(expected..range.start, &self.separator),
                "separator before fragment {id:?} was overwritten"
            );
            expected = range.end;
        }
        assert_eq!(expected, self.buffer.len(), "virtual buffer has trailing text");
        self.nested.index().assert_contiguous(self.buffer.len());
    }
}

impl std::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapper")
            .field("descriptor", &self.descriptor)
            .field("ranges", &self.order.len())
            .field("len", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexers::RegexLexer;
    use crate::theme::SyntaxTheme;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn mapper() -> Mapper {
        Mapper::new(
            LayerDescriptor::for_lexer::<RegexLexer>("\n"),
            Rc::new(SyntaxTheme::plain()),
            HighlighterConfig::default(),
        )
    }

    const KIND: TokenKind = TokenKind(10);

    #[test]
    fn insert_keeps_document_order() {
        let mut arena = RangeArena::default();
        let mut m = mapper();
        let (b, _) = m.insert(&mut arena, MapperId(0), 0, &chars("b+"), KIND).unwrap();
        let (a, _) = m.insert(&mut arena, MapperId(0), 0, &chars("a."), KIND).unwrap();
        let end_of_b = arena.get(b).end;
        let (c, spilled) = m.insert(&mut arena, MapperId(0), end_of_b, &chars("[c]"), KIND).unwrap();

        assert_eq!(m.text(), "\na.\nb+\n[c]");
        assert_eq!(m.order(), &[a, b, c]);
        assert_eq!(m.fragment(arena.get(b)), "b+");
        assert!(!spilled);
        m.assert_consistent(&arena);
    }

    #[test]
    fn replace_shifts_later_fragments() {
        let mut arena = RangeArena::default();
        let mut m = mapper();
        let (a, _) = m.insert(&mut arena, MapperId(0), 0, &chars("a"), KIND).unwrap();
        let (b, _) = m.insert(&mut arena, MapperId(0), 2, &chars("b"), KIND).unwrap();

        m.replace(&mut arena, a, &chars("x.y")).unwrap();
        assert_eq!(m.text(), "\nx.y\nb");
        assert_eq!(m.fragment(arena.get(b)), "b");
        m.assert_consistent(&arena);
    }

    #[test]
    fn replace_with_same_text_is_a_no_op() {
        let mut arena = RangeArena::default();
        let mut m = mapper();
        let (a, _) = m.insert(&mut arena, MapperId(0), 0, &chars("a.b"), KIND).unwrap();
        let tokens = m.nested().intervals();
        assert!(!m.replace(&mut arena, a, &chars("a.b")).unwrap());
        assert_eq!(m.nested().intervals(), tokens);
    }

    #[test]
    fn remove_deletes_separator_too() {
        let mut arena = RangeArena::default();
        let mut m = mapper();
        let (a, _) = m.insert(&mut arena, MapperId(0), 0, &chars("a"), KIND).unwrap();
        let (b, _) = m.insert(&mut arena, MapperId(0), 2, &chars("b"), KIND).unwrap();

        m.remove(&mut arena, a).unwrap();
        assert_eq!(m.text(), "\nb");
        assert_eq!(arena.get(b).start, 1);
        assert_eq!(arena.live_count(), 1);
        m.assert_consistent(&arena);
    }

    #[test]
    fn arena_recycles_ids() {
        let mut arena = RangeArena::default();
        let range = MappedRange { mapper: MapperId(0), outer_kind: KIND, start: 1, end: 2 };
        let first = arena.alloc(range);
        arena.release(first);
        assert_eq!(arena.alloc(range), first);
        assert_eq!(arena.live_count(), 1);
    }
}
