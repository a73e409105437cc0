// Chunk: docs/chunks/highlighted_document - Buffer plus token source, kept in lockstep

//! A text buffer wired to a token source.
//!
//! [`HighlightedDocument`] stands where the editor's buffer integration
//! would: every mutation is applied to the [`TextBuffer`], delivered to the
//! token source as exactly one edit notification, and reported once to the
//! repaint listener with the offsets whose tokens changed.

use std::ops::Range;
use std::rc::Rc;

use lite_lex_buffer::{DirtyLines, StyledLine, TextBuffer};
use tracing::warn;

use crate::edit::EditEvent;
use crate::error::HighlightError;
use crate::highlighter::styled_spans;
use crate::source::TokenSource;
use crate::theme::ColorScheme;

/// Receives the character range to redraw after each edit.
pub trait RepaintListener {
    fn repaint(&mut self, range: Range<usize>);
}

impl<F: FnMut(Range<usize>)> RepaintListener for F {
    fn repaint(&mut self, range: Range<usize>) {
        self(range)
    }
}

pub struct HighlightedDocument<S> {
    buffer: TextBuffer,
    source: S,
    listener: Option<Box<dyn RepaintListener>>,
}

impl<S: TokenSource> HighlightedDocument<S> {
    /// Creates a document holding `content`, tokenized by `source`.
    pub fn new(mut source: S, content: &str) -> Self {
        let buffer = TextBuffer::from_str(content);
        source.set_text(buffer.view());
        Self {
            buffer,
            source,
            listener: None,
        }
    }

    pub fn set_repaint_listener(&mut self, listener: impl RepaintListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn content(&self) -> String {
        self.buffer.content()
    }

    pub fn set_color_scheme(&mut self, scheme: Rc<dyn ColorScheme>) {
        self.source.set_color_scheme(scheme);
        let len = self.buffer.len();
        self.notify(0..len);
    }

    /// Replaces `old_len` characters at `offset` with `text`.
    ///
    /// Returns the lines to redraw: those the text change touched merged
    /// with those whose tokens changed.
    pub fn replace(&mut self, offset: usize, old_len: usize, text: &str) -> Result<DirtyLines, HighlightError> {
        let len = self.buffer.len();
        if offset + old_len > len {
            return Err(HighlightError::EditOutOfRange {
                offset,
                end: offset + old_len,
                len,
            });
        }
        if old_len == 0 && text.is_empty() {
            return Ok(DirtyLines::None);
        }

        let event = EditEvent::new(offset, old_len, text.chars().count());
        let mut dirty = self.buffer.replace(offset, old_len, text);
        let repaint = match self.source.on_edit(self.buffer.view(), event) {
            Ok(repaint) => repaint,
            Err(err) => {
                warn!(%err, offset, "incremental update rejected, retokenizing");
                self.source.set_text(self.buffer.view());
                0..self.buffer.len()
            }
        };

        dirty.merge(self.buffer.dirty_lines_for(repaint.clone()));
        self.notify(repaint);
        Ok(dirty)
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<DirtyLines, HighlightError> {
        self.replace(offset, 0, text)
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<DirtyLines, HighlightError> {
        let len = range.end.saturating_sub(range.start);
        self.replace(range.start, len, "")
    }

    /// Replaces the whole content and retokenizes it.
    pub fn set_content(&mut self, content: &str) -> DirtyLines {
        let dirty = self.buffer.set_content(content);
        self.source.set_text(self.buffer.view());
        let len = self.buffer.len();
        self.notify(0..len);
        dirty
    }

    fn notify(&mut self, range: Range<usize>) {
        if let Some(listener) = self.listener.as_mut() {
            listener.repaint(range);
        }
    }

    /// Styled spans of one line, adjacent equal styles merged.
    ///
    /// Returns an empty line if `line` is out of bounds.
    pub fn styled_line(&self, line: usize) -> Result<StyledLine, HighlightError> {
        let Some(range) = self.buffer.line_range(line) else {
            return Ok(StyledLine::empty());
        };
        let chars = self.buffer.view().to_vec(range.clone());
        let it = self.source.iterator(range.start)?;
        Ok(StyledLine::new(styled_spans(it, range, &chars)))
    }
}

impl<S> std::fmt::Debug for HighlightedDocument<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightedDocument")
            .field("len", &self.buffer.len())
            .field("lines", &self.buffer.line_count())
            .finish_non_exhaustive()
    }
}
