// Chunk: docs/chunks/incremental_lexing - Per-highlighter attribute memoization

//! Memoized token kind to style resolution.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use lite_lex_buffer::Style;
use rustc_hash::FxHashMap;

use crate::theme::ColorScheme;
use crate::token::{TokenKind, TokenKindTable};

/// Caches `TokenKind -> Style` lookups for one highlighter.
///
/// Iterators only hold `&Highlighter`, so the cache fills through a
/// `RefCell`. Each highlighter owns its own cache; replacing the scheme
/// clears it.
pub struct AttributeCache {
    scheme: Rc<dyn ColorScheme>,
    styles: RefCell<FxHashMap<TokenKind, Style>>,
}

impl AttributeCache {
    pub fn new(scheme: Rc<dyn ColorScheme>) -> Self {
        Self {
            scheme,
            styles: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn scheme(&self) -> &Rc<dyn ColorScheme> {
        &self.scheme
    }

    pub fn set_scheme(&mut self, scheme: Rc<dyn ColorScheme>) {
        self.scheme = scheme;
        self.styles.get_mut().clear();
    }

    pub fn get(&self, kind: TokenKind, kinds: &TokenKindTable) -> Style {
        if let Some(style) = self.styles.borrow().get(&kind) {
            return *style;
        }
        let style = self.scheme.attributes_for(kinds.name(kind));
        self.styles.borrow_mut().insert(kind, style);
        style
    }

    pub fn cached_len(&self) -> usize {
        self.styles.borrow().len()
    }
}

impl fmt::Debug for AttributeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeCache")
            .field("cached", &self.cached_len())
            .finish_non_exhaustive()
    }
}
