// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing
// Chunk: docs/chunks/offset_replace - Incremental line index update for range replacement

//! Line index for tracking line boundaries in the text buffer.
//!
//! Maintains an array of line start offsets for O(1) line count and O(log n)
//! offset-to-line lookup. Supports incremental updates when a character range
//! is replaced.

/// Tracks line boundaries in a text buffer.
///
/// The line index maintains a list of character offsets where each line starts.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Character offsets where each line starts. line_starts[0] = 0 always.
    /// Each entry points to the first character of that line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new line index with a single empty line.
    pub fn new() -> Self {
        Self {
            line_starts: vec![0],
        }
    }

    /// Rebuilds the line index from the given content.
    ///
    /// This is O(n) where n is the content length, but should only be needed
    /// for bulk operations like loading a file.
    pub fn rebuild<I>(&mut self, content: I)
    where
        I: IntoIterator<Item = char>,
    {
        self.line_starts.clear();
        self.line_starts.push(0);

        let mut offset = 0;
        for ch in content {
            offset += 1;
            if ch == '\n' {
                self.line_starts.push(offset);
            }
        }
    }

    /// Returns the number of lines in the buffer.
    ///
    /// A buffer always has at least one line (even if empty).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the character offset where the given line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Returns the character offset of the end of the given line.
    ///
    /// For all lines except the last, this points to the newline character.
    /// For the last line, this equals `total_len`.
    pub fn line_end(&self, line: usize, total_len: usize) -> Option<usize> {
        if line >= self.line_count() {
            return None;
        }

        if line + 1 < self.line_count() {
            Some(self.line_starts[line + 1] - 1)
        } else {
            Some(total_len)
        }
    }

    /// Returns the line number containing the given character offset.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        }
    }

    /// Updates the index after `old_len` characters at `offset` were replaced
    /// by `inserted`.
    ///
    /// Lines starting inside the removed range lose their creating newline and
    /// are dropped; newlines in `inserted` add line starts; the rest shift by
    /// the length delta. Returns true if the line structure changed.
    pub fn apply_edit(&mut self, offset: usize, old_len: usize, inserted: &[char]) -> bool {
        let old_end = offset + old_len;
        let delta = inserted.len() as isize - old_len as isize;

        // Lines starting at or before `offset` keep their start.
        let first_affected = self.line_starts.partition_point(|&start| start <= offset);
        // A line start X was created by the newline at X - 1; if that newline
        // sat in [offset, old_end) the line is gone.
        let first_kept = self.line_starts.partition_point(|&start| start <= old_end);

        let added: Vec<usize> = inserted
            .iter()
            .enumerate()
            .filter(|(_, ch)| **ch == '\n')
            .map(|(i, _)| offset + i + 1)
            .collect();

        let removed = first_kept - first_affected;
        let changed = removed > 0 || !added.is_empty();

        for start in &mut self.line_starts[first_kept..] {
            *start = (*start as isize + delta) as usize;
        }
        self.line_starts.splice(first_affected..first_kept, added);
        changed
    }

    /// Returns the raw line_starts array (for debug validation).
    #[cfg(any(debug_assertions, test))]
    pub fn line_starts(&self) -> &[usize] {
        &self.line_starts
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}
