// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing
// Chunk: docs/chunks/offset_replace - Offset-based replace for edit notifications

//! Gap buffer implementation for efficient text editing.
//!
//! A gap buffer is a character array with a movable gap at the edit position.
//! Replacements at the gap are O(edit size); moving the gap is O(gap_distance)
//! but amortizes well for typical editing patterns (locality of edits).
//!
//! All positions are character offsets, which is also the unit the lexers and
//! the interval index work in.

use std::ops::Range;

use crate::text_view::TextView;

const INITIAL_GAP_SIZE: usize = 64;
const GAP_GROWTH_FACTOR: usize = 2;

/// A gap buffer for efficient text storage and manipulation.
///
/// The buffer stores characters with a "gap" - an empty region that can be moved
/// to any position. Operations at the gap position are cheap, making it ideal for
/// text editing where insertions and deletions are localized.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// The underlying storage. Contains [pre-gap content | gap | post-gap content].
    data: Vec<char>,
    /// Index where the gap starts (first unused position).
    gap_start: usize,
    /// Index where the gap ends (first used position after gap).
    gap_end: usize,
}

impl GapBuffer {
    /// Creates a new empty gap buffer.
    pub fn new() -> Self {
        Self {
            data: vec!['\0'; INITIAL_GAP_SIZE],
            gap_start: 0,
            gap_end: INITIAL_GAP_SIZE,
        }
    }

    /// Creates a gap buffer initialized with the given text.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Self {
        let mut data: Vec<char> = text.chars().collect();
        let len = data.len();
        let capacity = len + INITIAL_GAP_SIZE;
        data.resize(capacity, '\0');

        Self {
            data,
            gap_start: len,
            gap_end: capacity,
        }
    }

    /// Returns the logical length of the buffer (excluding the gap).
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    /// Returns true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current gap size.
    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Returns the current gap position in logical coordinates.
    pub fn gap_position(&self) -> usize {
        self.gap_start
    }

    /// Moves the gap to the specified logical position.
    ///
    /// This is O(distance) where distance is the absolute difference between
    /// the current gap position and the target position.
    pub fn move_gap_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());

        if pos < self.gap_start {
            // Move gap left: shift content from [pos..gap_start] to [gap_end - shift..gap_end]
            let shift = self.gap_start - pos;
            self.data.copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
        } else if pos > self.gap_start {
            // Move gap right: shift content from [gap_end..gap_end + shift] to [gap_start..]
            let shift = pos - self.gap_start;
            self.data.copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Ensures the gap is at least the specified size.
    ///
    /// Grows the gap in place so that the gap position is preserved:
    /// `replace` relies on the gap staying where `move_gap_to` left it.
    fn ensure_gap(&mut self, min_size: usize) {
        if self.gap_len() >= min_size {
            return;
        }

        let needed = min_size - self.gap_len();
        let growth = needed.max(self.data.len() * GAP_GROWTH_FACTOR);

        let old_gap_end = self.gap_end;
        let old_len = self.data.len();
        let post_gap_len = old_len - old_gap_end;

        let new_size = old_len + growth;
        self.data.resize(new_size, '\0');

        if post_gap_len > 0 {
            let new_post_gap_start = new_size - post_gap_len;
            self.data.copy_within(old_gap_end..old_len, new_post_gap_start);
        }

        self.gap_end = new_size - post_gap_len;
    }

    /// Replaces `old_len` characters at `offset` with `text`.
    ///
    /// The range is clamped to the buffer. Returns the number of characters
    /// actually removed. Afterwards the gap sits right after the inserted text,
    /// so a run of adjacent edits (typing) stays O(1) per character.
    pub fn replace(&mut self, offset: usize, old_len: usize, text: &[char]) -> usize {
        let offset = offset.min(self.len());
        let removed = old_len.min(self.len() - offset);

        self.move_gap_to(offset);
        // Deleting forward from the gap just widens it.
        self.gap_end += removed;

        self.ensure_gap(text.len());
        self.data[self.gap_start..self.gap_start + text.len()].copy_from_slice(text);
        self.gap_start += text.len();
        removed
    }

    /// Inserts a string at the given logical position.
    pub fn insert_str(&mut self, offset: usize, s: &str) {
        let chars: Vec<char> = s.chars().collect();
        self.replace(offset, 0, &chars);
    }

    /// Removes the characters in `range`, clamped to the buffer.
    pub fn delete_range(&mut self, range: Range<usize>) {
        let start = range.start.min(self.len());
        let end = range.end.clamp(start, self.len());
        self.replace(start, end - start, &[]);
    }

    /// Removes all content, keeping the allocation.
    pub fn clear(&mut self) {
        self.gap_start = 0;
        self.gap_end = self.data.len();
    }

    /// Returns the character at the given logical position.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.len() {
            return None;
        }
        let physical = if pos < self.gap_start {
            pos
        } else {
            pos + self.gap_len()
        };
        Some(self.data[physical])
    }

    /// Returns an iterator over all characters in the buffer.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.data[..self.gap_start]
            .iter()
            .chain(self.data[self.gap_end..].iter())
            .copied()
    }

    /// Borrows the content on both sides of the gap without moving it.
    pub fn view(&self) -> TextView<'_> {
        TextView::new(&self.data[..self.gap_start], &self.data[self.gap_end..])
    }

    /// Returns the content of a range as a String.
    ///
    /// The range is in logical coordinates and clamped to the buffer.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let start = start.min(self.len());
        let end = end.min(self.len());
        if start >= end {
            return String::new();
        }
        (start..end).filter_map(|i| self.char_at(i)).collect()
    }

    /// Returns true if the characters in `range` equal `text`.
    pub fn range_eq(&self, range: Range<usize>, text: &[char]) -> bool {
        range.len() == text.len()
            && range.end <= self.len()
            && range.zip(text).all(|(i, ch)| self.char_at(i) == Some(*ch))
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for ch in self.chars() {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}
