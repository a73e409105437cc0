// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing
// Chunk: docs/chunks/offset_replace - Offset-based replace for edit notifications

//! TextBuffer is the main public API for text editing operations.
//!
//! It combines a gap buffer (for efficient character storage) with a line index
//! (for line access and offset/position conversion). Edits are expressed as
//! character-offset replacements, the shape the highlighter's edit
//! notification uses.
//!
//! Each mutation returns `DirtyLines` indicating which lines changed.

use std::ops::Range;

use crate::gap_buffer::GapBuffer;
use crate::line_index::LineIndex;
use crate::text_view::TextView;
use crate::types::{DirtyLines, Position};

/// A text buffer with line tracking and dirty line reporting.
#[derive(Debug, Default)]
pub struct TextBuffer {
    buffer: GapBuffer,
    line_index: LineIndex,
    /// Mutation counter for sampling debug assertions (debug builds only).
    #[cfg(debug_assertions)]
    debug_mutation_count: u64,
}

impl TextBuffer {
    /// Creates a new empty text buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a text buffer initialized with the given content.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Self {
        let mut line_index = LineIndex::new();
        line_index.rebuild(content.chars());

        Self {
            buffer: GapBuffer::from_str(content),
            line_index,
            #[cfg(debug_assertions)]
            debug_mutation_count: 0,
        }
    }

    // ==================== Accessors ====================

    /// Returns the total number of characters in the buffer.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the entire buffer content as a String.
    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    /// Returns the characters in `range` (clamped to the buffer).
    pub fn slice(&self, range: Range<usize>) -> String {
        self.buffer.slice(range.start, range.end)
    }

    /// Returns the character at `offset`.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.buffer.char_at(offset)
    }

    /// Borrows the whole content for lexing, wherever the gap sits.
    pub fn view(&self) -> TextView<'_> {
        self.buffer.view()
    }

    /// Returns the number of lines in the buffer.
    ///
    /// Always at least 1 (even for an empty buffer).
    pub fn line_count(&self) -> usize {
        self.line_index.line_count()
    }

    /// Returns the character range of a line, excluding its newline.
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let start = self.line_index.line_start(line)?;
        let end = self.line_index.line_end(line, self.len())?;
        Some(start..end)
    }

    /// Returns the content of a line (without the newline).
    ///
    /// Returns an empty string if the line is out of bounds.
    pub fn line_content(&self, line: usize) -> String {
        self.line_range(line)
            .map(|range| self.slice(range))
            .unwrap_or_default()
    }

    /// Converts a character offset to a (line, column) position.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        let offset = offset.min(self.len());
        let line = self.line_index.line_at_offset(offset);
        let start = self.line_index.line_start(line).unwrap_or(0);
        Position::new(line, offset - start)
    }

    /// Converts a (line, column) position to a character offset, clamping
    /// the column to the line length and the line to the last line.
    pub fn position_to_offset(&self, pos: Position) -> usize {
        let line = pos.line.min(self.line_count() - 1);
        match self.line_range(line) {
            Some(range) => range.start + pos.col.min(range.len()),
            None => self.len(),
        }
    }

    /// Returns the lines touched by the character range `range`.
    pub fn dirty_lines_for(&self, range: Range<usize>) -> DirtyLines {
        if range.start > range.end || range.start > self.len() {
            return DirtyLines::None;
        }
        let first = self.line_index.line_at_offset(range.start);
        let last = self.line_index.line_at_offset(range.end.min(self.len()));
        DirtyLines::lines(first, last)
    }

    // ==================== Mutations ====================

    /// Replaces `old_len` characters at `offset` with `text`.
    ///
    /// The range is clamped to the buffer. When the edit adds or removes line
    /// breaks everything from the edited line down is dirty; otherwise only
    /// the edited line is.
    pub fn replace(&mut self, offset: usize, old_len: usize, text: &str) -> DirtyLines {
        let offset = offset.min(self.len());
        let old_len = old_len.min(self.len() - offset);
        if old_len == 0 && text.is_empty() {
            return DirtyLines::None;
        }

        let line = self.line_index.line_at_offset(offset);
        let inserted: Vec<char> = text.chars().collect();
        self.buffer.replace(offset, old_len, &inserted);
        let lines_changed = self.line_index.apply_edit(offset, old_len, &inserted);

        self.assert_line_index_consistent();
        if lines_changed {
            DirtyLines::FromLineToEnd(line)
        } else {
            DirtyLines::Single(line)
        }
    }

    /// Inserts `text` at `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> DirtyLines {
        self.replace(offset, 0, text)
    }

    /// Deletes the characters in `range`.
    pub fn delete(&mut self, range: Range<usize>) -> DirtyLines {
        let len = range.end.saturating_sub(range.start);
        self.replace(range.start, len, "")
    }

    /// Replaces the whole content.
    pub fn set_content(&mut self, content: &str) -> DirtyLines {
        self.buffer = GapBuffer::from_str(content);
        self.line_index.rebuild(content.chars());
        DirtyLines::FromLineToEnd(0)
    }

    /// Every 64th mutation, rebuilds the line index from scratch and compares.
    #[cfg(debug_assertions)]
    fn assert_line_index_consistent(&mut self) {
        self.debug_mutation_count += 1;
        if self.debug_mutation_count % 64 != 0 {
            return;
        }
        let mut expected = LineIndex::new();
        expected.rebuild(self.buffer.chars());
        assert_eq!(
            self.line_index.line_starts(),
            expected.line_starts(),
            "line index diverged after {} mutations (len {})",
            self.debug_mutation_count,
            self.buffer.len(),
        );
    }

    #[cfg(not(debug_assertions))]
    fn assert_line_index_consistent(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_lines() {
        let buf = TextBuffer::from_str("one\ntwo\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_content(1), "two");
        assert_eq!(buf.line_content(2), "");
        assert_eq!(buf.line_content(9), "");
    }

    #[test]
    fn test_replace_within_line_dirties_single_line() {
        let mut buf = TextBuffer::from_str("let x = 1;\nlet y = 2;");
        let dirty = buf.replace(19, 1, "42");
        assert_eq!(dirty, DirtyLines::Single(1));
        assert_eq!(buf.content(), "let x = 1;\nlet y = 42;");
    }

    #[test]
    fn test_replace_with_newline_dirties_to_end() {
        let mut buf = TextBuffer::from_str("ab");
        let dirty = buf.insert(1, "\n");
        assert_eq!(dirty, DirtyLines::FromLineToEnd(0));
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_content(1), "b");
    }

    #[test]
    fn test_noop_replace_is_clean() {
        let mut buf = TextBuffer::from_str("abc");
        assert_eq!(buf.replace(1, 0, ""), DirtyLines::None);
        assert_eq!(buf.delete(2..2), DirtyLines::None);
    }

    #[test]
    fn test_delete_clamps_to_end() {
        let mut buf = TextBuffer::from_str("abc");
        buf.delete(1..10);
        assert_eq!(buf.content(), "a");
    }

    #[test]
    fn test_offset_position_round_trip() {
        let buf = TextBuffer::from_str("ab\ncde\n");
        assert_eq!(buf.offset_to_position(4), Position::new(1, 1));
        assert_eq!(buf.offset_to_position(7), Position::new(2, 0));
        assert_eq!(buf.position_to_offset(Position::new(1, 1)), 4);
        assert_eq!(buf.position_to_offset(Position::new(1, 99)), 6);
        assert_eq!(buf.position_to_offset(Position::new(9, 0)), 7);
    }

    #[test]
    fn test_dirty_lines_for_range() {
        let buf = TextBuffer::from_str("a\nb\nc");
        assert_eq!(buf.dirty_lines_for(0..1), DirtyLines::Single(0));
        assert_eq!(buf.dirty_lines_for(0..4), DirtyLines::Range { from: 0, to: 3 });
        assert_eq!(buf.dirty_lines_for(2..2), DirtyLines::Single(1));
        assert_eq!(buf.dirty_lines_for(9..10), DirtyLines::None);
    }

    #[test]
    fn test_view_reflects_edits() {
        let mut buf = TextBuffer::from_str("x = \"a\"");
        buf.replace(5, 1, "a.b");
        let view = buf.view();
        assert_eq!(view.slice(0..view.len()), "x = \"a.b\"");
        assert_eq!(view.get(6), Some('.'));
        assert_eq!(view.len(), buf.len());
    }

    #[test]
    fn test_set_content_resets_lines() {
        let mut buf = TextBuffer::from_str("a\nb");
        assert_eq!(buf.set_content("single"), DirtyLines::FromLineToEnd(0));
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.content(), "single");
    }
}
