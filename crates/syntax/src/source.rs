// Chunk: docs/chunks/layered_highlighting - Token source capability shared by plain and layered highlighters

//! The capability a document needs from a highlighter.
//!
//! [`Highlighter`](crate::Highlighter) and
//! [`LayeredHighlighter`](crate::LayeredHighlighter) both implement
//! [`TokenSource`]; consumers pick one at construction and stay generic over
//! the choice.

use std::ops::Range;
use std::rc::Rc;

use lite_lex_buffer::TextView;

use crate::edit::EditEvent;
use crate::error::HighlightError;
use crate::iterator::TokenIterator;
use crate::theme::ColorScheme;

pub trait TokenSource {
    type Iter<'a>: TokenIterator
    where
        Self: 'a;

    /// Tokenizes `text` from scratch.
    fn set_text(&mut self, text: TextView<'_>);

    /// Brings the tokens up to date with `text`, which is the buffer content
    /// after `event`. Returns the offsets whose tokens changed.
    fn on_edit(&mut self, text: TextView<'_>, event: EditEvent) -> Result<Range<usize>, HighlightError>;

    /// Iterator positioned on the token containing `offset`.
    ///
    /// `offset == text_len()` yields an iterator that is already at its end.
    fn iterator(&self, offset: usize) -> Result<Self::Iter<'_>, HighlightError>;

    fn set_color_scheme(&mut self, scheme: Rc<dyn ColorScheme>);

    fn text_len(&self) -> usize;
}
