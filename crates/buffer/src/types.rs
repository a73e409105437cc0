// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing
// Chunk: docs/chunks/offset_replace - Line-granular dirty ranges for offset edits

use std::cmp::Ordering;

/// Position in the buffer as (line, column) where both are 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line.cmp(&other.line).then(self.col.cmp(&other.col))
    }
}

/// Information about which lines were dirtied by a mutation or a re-lex.
///
/// The highlighter reports a character range; the buffer widens it to
/// whole lines so the render loop can redraw line by line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirtyLines {
    /// No lines changed.
    None,
    /// A single line changed (most edits within a line).
    Single(usize),
    /// A range of lines changed [from, to).
    Range { from: usize, to: usize },
    /// Everything from a line to the end of the buffer changed.
    /// Used when the line structure itself changed.
    FromLineToEnd(usize),
}

impl DirtyLines {
    /// Builds the smallest value covering lines `first..=last`.
    pub fn lines(first: usize, last: usize) -> Self {
        match last.cmp(&first) {
            Ordering::Less => DirtyLines::None,
            Ordering::Equal => DirtyLines::Single(first),
            Ordering::Greater => DirtyLines::Range {
                from: first,
                to: last + 1,
            },
        }
    }

    /// Returns true if no lines were dirtied.
    pub fn is_none(&self) -> bool {
        matches!(self, DirtyLines::None)
    }

    /// Returns the starting line of the dirty region, if any.
    pub fn start_line(&self) -> Option<usize> {
        match self {
            DirtyLines::None => None,
            DirtyLines::Single(line) | DirtyLines::FromLineToEnd(line) => Some(*line),
            DirtyLines::Range { from, .. } => Some(*from),
        }
    }

    /// Returns the exclusive end line, or `None` for open-ended and empty values.
    fn end_line(&self) -> Option<usize> {
        match self {
            DirtyLines::Single(line) => Some(line + 1),
            DirtyLines::Range { to, .. } => Some(*to),
            DirtyLines::None | DirtyLines::FromLineToEnd(_) => None,
        }
    }

    /// Merges another dirty region into this one, producing the smallest
    /// region that covers both.
    pub fn merge(&mut self, other: DirtyLines) {
        let (Some(a), Some(b)) = (self.start_line(), other.start_line()) else {
            if self.is_none() {
                *self = other;
            }
            return;
        };
        let from = a.min(b);
        *self = match (self.end_line(), other.end_line()) {
            (Some(x), Some(y)) => DirtyLines::lines(from, x.max(y) - 1),
            _ => DirtyLines::FromLineToEnd(from),
        };
    }
}
