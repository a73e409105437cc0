// Chunk: docs/chunks/incremental_lexing - Edit notifications in character offsets

//! Edit notifications delivered by the buffer integration.
//!
//! The highlighter only needs to know where an edit happened and how long the
//! replaced and replacing text were; the new text itself is read from the
//! buffer after the edit.

/// One logical buffer edit: `old_len` characters at `offset` were replaced
/// by `new_len` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditEvent {
    /// Character offset where the edit starts
    pub offset: usize,
    /// Length of the replaced text
    pub old_len: usize,
    /// Length of the replacing text
    pub new_len: usize,
}

impl EditEvent {
    pub fn new(offset: usize, old_len: usize, new_len: usize) -> Self {
        Self {
            offset,
            old_len,
            new_len,
        }
    }

    /// End of the replaced range, in pre-edit coordinates.
    pub fn old_end(&self) -> usize {
        self.offset + self.old_len
    }

    /// End of the replacing text, in post-edit coordinates.
    pub fn new_end(&self) -> usize {
        self.offset + self.new_len
    }

    /// How far text after the edit moved.
    pub fn delta(&self) -> isize {
        self.new_len as isize - self.old_len as isize
    }

    /// Maps a pre-edit offset at or after `old_end()` to post-edit coordinates.
    pub fn shift_old(&self, old_offset: usize) -> usize {
        debug_assert!(old_offset >= self.old_end());
        old_offset - self.old_len + self.new_len
    }

    /// Maps a post-edit offset at or after `new_end()` to pre-edit coordinates.
    pub fn unshift_new(&self, new_offset: usize) -> usize {
        debug_assert!(new_offset >= self.new_end());
        new_offset - self.new_len + self.old_len
    }
}

/// Creates an EditEvent for inserting `text` at `offset`.
pub fn insert_event(offset: usize, text: &str) -> EditEvent {
    EditEvent::new(offset, 0, text.chars().count())
}

/// Creates an EditEvent for deleting the characters in `start..end`.
pub fn delete_event(start: usize, end: usize) -> EditEvent {
    EditEvent::new(start, end.saturating_sub(start), 0)
}

/// Creates an EditEvent for replacing `old_len` characters at `offset` with `text`.
pub fn replace_event(offset: usize, old_len: usize, text: &str) -> EditEvent {
    EditEvent::new(offset, old_len, text.chars().count())
}
