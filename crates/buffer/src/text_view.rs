// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing

//! A borrowed, read-only view of buffer text that may be split in two.
//!
//! A gap buffer holds its content as the run before the gap and the run
//! after it. [`TextView`] indexes across both halves by character offset,
//! so lexers can scan the buffer in place without first moving the gap out
//! of the way. A plain `&[char]` converts into a view with an empty back
//! half.

use std::ops::{Index, Range};

/// Character text made of a front and a back slice.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextView<'a> {
    front: &'a [char],
    back: &'a [char],
}

impl<'a> TextView<'a> {
    pub fn new(front: &'a [char], back: &'a [char]) -> Self {
        Self { front, back }
    }

    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the character at `offset`, if any.
    pub fn get(&self, offset: usize) -> Option<char> {
        match offset.checked_sub(self.front.len()) {
            None => Some(self.front[offset]),
            Some(back) => self.back.get(back).copied(),
        }
    }

    /// The first `end` characters (clamped to the view).
    pub fn prefix(&self, end: usize) -> TextView<'a> {
        let end = end.min(self.len());
        if end <= self.front.len() {
            TextView::new(&self.front[..end], &[])
        } else {
            TextView::new(self.front, &self.back[..end - self.front.len()])
        }
    }

    /// The two slices holding `range`, clamped to the view.
    pub fn slices(&self, range: Range<usize>) -> (&'a [char], &'a [char]) {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        let split = self.front.len();
        let front = &self.front[start.min(split)..end.min(split)];
        let back = &self.back[start.saturating_sub(split)..end.saturating_sub(split)];
        (front, back)
    }

    /// Characters in `range`, clamped to the view.
    pub fn chars(&self, range: Range<usize>) -> impl Iterator<Item = char> + 'a {
        let (front, back) = self.slices(range);
        front.iter().chain(back).copied()
    }

    /// Copies `range` into a `String`.
    pub fn slice(&self, range: Range<usize>) -> String {
        self.chars(range).collect()
    }

    /// Copies `range` into a `Vec<char>`.
    pub fn to_vec(&self, range: Range<usize>) -> Vec<char> {
        let (front, back) = self.slices(range);
        let mut out = Vec::with_capacity(front.len() + back.len());
        out.extend_from_slice(front);
        out.extend_from_slice(back);
        out
    }

    /// Returns true if the characters in `range` equal `text`.
    pub fn range_eq(&self, range: Range<usize>, text: &[char]) -> bool {
        if range.end > self.len() || range.len() != text.len() {
            return false;
        }
        let (front, back) = self.slices(range);
        front == &text[..front.len()] && back == &text[front.len()..]
    }
}

impl Index<usize> for TextView<'_> {
    type Output = char;

    fn index(&self, offset: usize) -> &char {
        match offset.checked_sub(self.front.len()) {
            None => &self.front[offset],
            Some(back) => &self.back[back],
        }
    }
}

impl<'a> From<&'a [char]> for TextView<'a> {
    fn from(text: &'a [char]) -> Self {
        TextView::new(text, &[])
    }
}

impl<'a> From<&'a Vec<char>> for TextView<'a> {
    fn from(text: &'a Vec<char>) -> Self {
        TextView::new(text, &[])
    }
}

impl<'a, const N: usize> From<&'a [char; N]> for TextView<'a> {
    fn from(text: &'a [char; N]) -> Self {
        TextView::new(text, &[])
    }
}
