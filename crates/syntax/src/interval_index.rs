// Chunk: docs/chunks/incremental_lexing - Compact token interval index

//! Ordered, gap-free token intervals.
//!
//! Storage is three parallel arrays (start, end, datum) of 32-bit values,
//! 12 bytes per token. The arrays grow by half their length at a time so a
//! large file does not pay for a doubling it will never fill.
//!
//! Invariant: `start(0) == 0`, `start(i) == end(i - 1)` and every interval is
//! non-empty. The highlighter maintains this across edits with one
//! [`IntervalIndex::shift`] of the reused tail followed by one
//! [`IntervalIndex::splice`] of freshly lexed intervals.

use std::ops::Range;

use crate::error::HighlightError;
use crate::token::{TokenDatum, TokenKind};

const MIN_CAPACITY: usize = 16;

/// One token interval `[start, end)` with its datum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    pub datum: TokenDatum,
}

impl Interval {
    pub fn new(start: usize, end: usize, datum: TokenDatum) -> Self {
        Self { start, end, datum }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

fn to_u32(offset: usize) -> u32 {
    u32::try_from(offset).unwrap_or_else(|_| panic!("offset {offset} exceeds interval index range"))
}

#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    starts: Vec<u32>,
    ends: Vec<u32>,
    data: Vec<TokenDatum>,
}

impl IntervalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Length of the text the intervals cover.
    pub fn covered_len(&self) -> usize {
        self.ends.last().map_or(0, |&end| end as usize)
    }

    pub fn start(&self, index: usize) -> usize {
        self.starts[index] as usize
    }

    pub fn end(&self, index: usize) -> usize {
        self.ends[index] as usize
    }

    pub fn datum(&self, index: usize) -> TokenDatum {
        self.data[index]
    }

    pub fn kind(&self, index: usize) -> TokenKind {
        self.data[index].kind()
    }

    pub fn interval(&self, index: usize) -> Interval {
        Interval::new(self.start(index), self.end(index), self.datum(index))
    }

    /// Snapshot of all intervals in order.
    pub fn intervals(&self) -> Vec<Interval> {
        (0..self.len()).map(|i| self.interval(i)).collect()
    }

    pub fn clear(&mut self) {
        self.starts.clear();
        self.ends.clear();
        self.data.clear();
    }

    /// Returns the index of the interval with `start <= offset < end`.
    pub fn locate(&self, offset: usize) -> Result<usize, HighlightError> {
        let len = self.covered_len();
        if offset >= len {
            return Err(HighlightError::OffsetOutOfRange { offset, len });
        }
        let offset = offset as u32;
        Ok(self.ends.partition_point(|&end| end <= offset))
    }

    /// Appends one interval at the end.
    pub fn push(&mut self, interval: Interval) {
        self.reserve(1);
        self.starts.push(to_u32(interval.start));
        self.ends.push(to_u32(interval.end));
        self.data.push(interval.datum);
    }

    /// Replaces the intervals in `range` with `intervals`.
    ///
    /// Offsets of the intervals after `range` are left alone; callers shift
    /// them first if the text length changed.
    pub fn splice(&mut self, range: Range<usize>, intervals: &[Interval]) {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "splice range {range:?} is outside index of length {}",
            self.len()
        );
        self.reserve(intervals.len().saturating_sub(range.len()));
        self.starts
            .splice(range.clone(), intervals.iter().map(|i| to_u32(i.start)));
        self.ends
            .splice(range.clone(), intervals.iter().map(|i| to_u32(i.end)));
        self.data.splice(range, intervals.iter().map(|i| i.datum));
    }

    /// Adds `delta` to both bounds of every interval at or after `from`.
    pub fn shift(&mut self, from: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let delta = delta as i64;
        for (start, end) in self.starts[from..].iter_mut().zip(&mut self.ends[from..]) {
            *start = to_u32((i64::from(*start) + delta) as usize);
            *end = to_u32((i64::from(*end) + delta) as usize);
        }
    }

    /// Grows capacity by half the current length once `additional` no longer fits.
    fn reserve(&mut self, additional: usize) {
        let needed = self.starts.len() + additional;
        if needed <= self.starts.capacity() {
            return;
        }
        let grown = (self.starts.len() + self.starts.len() / 2).max(MIN_CAPACITY);
        let extra = grown.max(needed) - self.starts.len();
        self.starts.reserve_exact(extra);
        self.ends.reserve_exact(extra);
        self.data.reserve_exact(extra);
    }

    /// Panics unless the intervals tile `0..text_len` exactly.
    pub fn assert_contiguous(&self, text_len: usize) {
        let mut expected_start = 0usize;
        for i in 0..self.len() {
            let (start, end) = (self.start(i), self.end(i));
            assert_eq!(
                start, expected_start,
                "interval {i} starts at {start} but the previous one ended at {expected_start}"
            );
            assert!(start < end, "interval {i} is empty or reversed ({start}..{end})");
            expected_start = end;
        }
        assert_eq!(
            expected_start, text_len,
            "intervals cover {expected_start} characters of a {text_len}-character text"
        );
    }

    #[cfg(test)]
    pub(crate) fn capacity(&self) -> usize {
        self.starts.capacity()
    }
}
