// Chunk: docs/chunks/reference_lexers - Reference grammars

//! Reference lexers.
//!
//! Real grammars live with the editor's language support. These two are
//! small enough to reason about in tests and demos: a C-like outer grammar
//! and a regular expression grammar to layer over its strings.

pub mod c_style;
pub mod regex;

pub use c_style::CStyleLexer;
pub use regex::RegexLexer;
