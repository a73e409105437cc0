// Chunk: docs/chunks/incremental_lexing - Caller-facing highlighter errors

use thiserror::Error;

/// Errors a caller can provoke by handing the highlighter inconsistent input.
///
/// Broken internal invariants (a lexer that stops progressing, a corrupted
/// interval index) are not represented here; they panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HighlightError {
    #[error("offset {offset} is outside the tokenized text (length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("edit {offset}..{end} is outside the previous text (length {len})")]
    EditOutOfRange { offset: usize, end: usize, len: usize },

    #[error("text has length {actual} but the edit implies {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("lexer has no token kind named {name:?}")]
    UnknownTokenKind { name: String },
}
