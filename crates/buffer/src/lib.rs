// Chunk: docs/chunks/text_buffer - Text buffer data structure with gap buffer backing
// Chunk: docs/chunks/buffer_view_trait - Styling types shared by renderer and highlighter

//! lite-lex-buffer: the character storage the highlighter tokenizes.
//!
//! This crate provides a gap buffer-backed text buffer with offset-based
//! editing and dirty line reporting, plus the style types token attributes
//! resolve to.
//!
//! # Overview
//!
//! - [`GapBuffer`]: raw character storage, also used for the private
//!   virtual buffers of embedded grammars
//! - [`TextBuffer`]: a `GapBuffer` plus a line index, edited with
//!   character-offset replacements
//! - [`TextView`]: borrowed text on both sides of the gap, for lexing in place
//! - [`Style`], [`Span`], [`StyledLine`]: rendering attributes
//!
//! # Example
//!
//! ```
//! use lite_lex_buffer::{DirtyLines, TextBuffer};
//!
//! let mut buffer = TextBuffer::from_str("let x = 1;");
//! assert_eq!(buffer.replace(8, 1, "42"), DirtyLines::Single(0));
//! assert_eq!(buffer.content(), "let x = 42;");
//!
//! // Line breaks dirty everything below the edit
//! assert_eq!(buffer.insert(4, "\n"), DirtyLines::FromLineToEnd(0));
//! assert_eq!(buffer.line_count(), 2);
//! ```

mod gap_buffer;
mod line_index;
mod style;
mod text_buffer;
mod text_view;
mod types;

pub use gap_buffer::GapBuffer;
pub use style::{Color, NamedColor, Span, Style, StyledLine, UnderlineStyle};
pub use text_buffer::TextBuffer;
pub use text_view::TextView;
pub use types::{DirtyLines, Position};
