// Chunk: docs/chunks/incremental_lexing - Incremental lexer-driven syntax highlighting
// Chunk: docs/chunks/layered_highlighting - Embedded grammars layered over outer tokens

//! lite-lex-syntax: incremental, layered lexer-based syntax highlighting.
//!
//! A [`Highlighter`] keeps every token of a text in an [`IntervalIndex`] and
//! re-lexes only the neighbourhood of each edit, stopping as soon as the
//! lexer resynchronizes with the tokens already stored. A
//! [`LayeredHighlighter`] lexes selected outer tokens (string literals, say)
//! a second time with an embedded grammar and merges both token streams.
//!
//! # Overview
//!
//! - [`Lexer`]: the grammar contract, one token per `scan` over a
//!   [`TextView`] read in place from the buffer
//! - [`Highlighter`]: primary highlighter, `set_text` and `apply_edit`
//! - [`LayeredHighlighter`], [`LayerDescriptor`]: embedded grammars
//! - [`TokenSource`], [`TokenIterator`]: the read side shared by both
//! - [`HighlightedDocument`]: a text buffer kept in lockstep with a source
//! - [`LanguageRegistry`]: file extension to language lookup
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use lite_lex_syntax::{HighlightedDocument, LanguageRegistry, SyntaxTheme, TokenIterator, TokenSource};
//!
//! let source = "re = \"a+b\";";
//! let text: Vec<char> = source.chars().collect();
//! let registry = LanguageRegistry::new();
//! let highlighter = registry
//!     .highlighter_for_extension("c", &text, Rc::new(SyntaxTheme::catppuccin_mocha()))
//!     .expect("c is registered")?;
//!
//! let mut doc = HighlightedDocument::new(highlighter, source);
//! assert_eq!(doc.source().iterator(7)?.kind_name(), "regex.metachar");
//!
//! doc.insert(8, "*")?;
//! assert_eq!(doc.source().iterator(8)?.kind_name(), "regex.metachar");
//! assert_eq!(doc.styled_line(0)?.text(), "re = \"a+*b\";");
//! # Ok::<(), lite_lex_syntax::HighlightError>(())
//! ```

mod attributes;
mod config;
mod document;
mod edit;
mod error;
mod highlighter;
mod interval_index;
mod iterator;
pub mod layered;
mod lexer;
pub mod lexers;
mod registry;
mod source;
mod theme;
mod token;

pub use attributes::AttributeCache;
pub use config::{HighlighterConfig, DEFAULT_RESYNC_MARGIN};
pub use document::{HighlightedDocument, RepaintListener};
pub use edit::{delete_event, insert_event, replace_event, EditEvent};
pub use error::HighlightError;
pub use highlighter::{EditOutcome, Highlighter, IndexChange};
pub use interval_index::{Interval, IntervalIndex};
pub use iterator::{LimitedRange, SegmentIterator, TokenIterator};
pub use layered::{LayerDescriptor, LayeredHighlighter, LayeredIterator};
pub use lexer::{LexedToken, Lexer, LexerFactory, Scan, TokenStream};
pub use lexers::{CStyleLexer, RegexLexer};
pub use lite_lex_buffer::TextView;
pub use registry::{LanguageConfig, LanguageRegistry};
pub use source::TokenSource;
pub use theme::{ColorScheme, SyntaxTheme};
pub use token::{LexerState, TokenDatum, TokenKind, TokenKindTable};
