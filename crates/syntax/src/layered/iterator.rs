// Chunk: docs/chunks/layered_highlighting - Composite iteration over outer and embedded tokens

use lite_lex_buffer::Style;

use crate::error::HighlightError;
use crate::iterator::{LimitedRange, SegmentIterator, TokenIterator};
use crate::layered::LayeredHighlighter;
use crate::token::TokenKind;

/// Inner tokens of one mapped outer token.
struct Embedded<'a> {
    tokens: LimitedRange<SegmentIterator<'a>>,
    background: Option<Style>,
}

/// Walks outer tokens, descending into embedded tokens wherever an outer
/// token is mapped to a layer.
///
/// Embedded token offsets are translated back to document offsets, and
/// their attributes are overlaid on the outer token's (then on the layer
/// background, if any).
pub struct LayeredIterator<'a> {
    owner: &'a LayeredHighlighter,
    outer: SegmentIterator<'a>,
    inner: Option<Embedded<'a>>,
}

impl<'a> LayeredIterator<'a> {
    pub(crate) fn new(owner: &'a LayeredHighlighter, offset: usize) -> Result<Self, HighlightError> {
        let outer = owner.primary().segments(offset)?;
        let mut it = Self {
            owner,
            outer,
            inner: None,
        };
        if !it.outer.at_end() {
            let delta = offset - it.outer.start();
            it.inner = it.open_embedded(|span| span.start + delta);
        }
        Ok(it)
    }

    /// True while positioned on an embedded token.
    pub fn is_embedded(&self) -> bool {
        self.inner.is_some()
    }

    /// Opens the embedded tokens of the current outer token, positioned at
    /// the virtual offset `pick` chooses within the fragment span.
    fn open_embedded(&self, pick: impl FnOnce(&std::ops::Range<usize>) -> usize) -> Option<Embedded<'a>> {
        if self.outer.at_end() {
            return None;
        }
        let owner: &'a LayeredHighlighter = self.owner;
        let (mapper, range) = owner.mapping_at(self.outer.position())?;
        let span = range.start..range.end;
        let offset = pick(&span);
        let segments = mapper
            .nested()
            .segments(offset)
            .unwrap_or_else(|err| panic!("virtual buffer out of sync with its mapping: {err}"));

        let tokens = LimitedRange::new(segments, span);
        if tokens.at_end() {
            return None;
        }
        Some(Embedded {
            tokens,
            background: mapper.descriptor().background(),
        })
    }

    fn to_document(&self, embedded: &Embedded<'_>, virtual_offset: usize) -> usize {
        self.outer.start() + (virtual_offset - embedded.tokens.span().start)
    }
}

impl TokenIterator for LayeredIterator<'_> {
    fn start(&self) -> usize {
        match &self.inner {
            Some(inner) => self.to_document(inner, inner.tokens.start()),
            None => self.outer.start(),
        }
    }

    fn end(&self) -> usize {
        match &self.inner {
            Some(inner) => self.to_document(inner, inner.tokens.end()),
            None => self.outer.end(),
        }
    }

    fn kind(&self) -> TokenKind {
        match &self.inner {
            Some(inner) => inner.tokens.kind(),
            None => self.outer.kind(),
        }
    }

    fn kind_name(&self) -> &str {
        match &self.inner {
            Some(inner) => inner.tokens.kind_name(),
            None => self.outer.kind_name(),
        }
    }

    fn attributes(&self) -> Style {
        let outer = self.outer.attributes();
        let Some(inner) = &self.inner else {
            return outer;
        };
        let merged = outer.overlay(&inner.tokens.attributes());
        match &inner.background {
            Some(background) => merged.overlay(background),
            None => merged,
        }
    }

    fn advance(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            inner.tokens.advance();
            if !inner.tokens.at_end() {
                return;
            }
        }
        self.inner = None;
        self.outer.advance();
        self.inner = self.open_embedded(|span| span.start);
    }

    fn retreat(&mut self) {
        if let Some(inner) = self.inner.as_mut() {
            inner.tokens.retreat();
            if !inner.tokens.at_end() {
                return;
            }
        }
        self.inner = None;
        self.outer.retreat();
        self.inner = self.open_embedded(|span| span.end - 1);
    }

    fn at_end(&self) -> bool {
        self.outer.at_end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlighter::Highlighter;
    use crate::layered::LayerDescriptor;
    use crate::lexers::{c_style, CStyleLexer, RegexLexer};
    use crate::theme::{ColorScheme, SyntaxTheme};
    use std::rc::Rc;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn layered(text: &str) -> LayeredHighlighter {
        let scheme = Rc::new(SyntaxTheme::catppuccin_mocha());
        let primary = Highlighter::with_lexer(Box::new(CStyleLexer::new()));
        let mut hl = LayeredHighlighter::new(primary, scheme);
        let regex = LayerDescriptor::for_lexer::<RegexLexer>("\n");
        hl.register_layer(c_style::STRING, &regex, &chars(text));
        hl
    }

    fn walk(hl: &LayeredHighlighter, offset: usize) -> Vec<(usize, usize, String)> {
        let mut it = hl.layered_iterator(offset).unwrap();
        let mut out = Vec::new();
        while !it.at_end() {
            out.push((it.start(), it.end(), it.kind_name().to_string()));
            it.advance();
        }
        out
    }

    fn token(start: usize, end: usize, name: &str) -> (usize, usize, String) {
        (start, end, name.to_string())
    }

    #[test]
    fn descends_into_mapped_string() {
        let hl = layered("x = \"a.b\";");
        assert_eq!(
            walk(&hl, 4),
            vec![
                token(4, 5, "string.quote"),
                token(5, 6, "regex.literal"),
                token(6, 7, "regex.metachar"),
                token(7, 8, "regex.literal"),
                token(8, 9, "string.quote"),
                token(9, 10, "operator"),
            ]
        );
    }

    #[test]
    fn starts_mid_fragment() {
        let hl = layered("x = \"a.b\"");
        let it = hl.layered_iterator(6).unwrap();
        assert!(it.is_embedded());
        assert_eq!((it.start(), it.end(), it.kind_name()), (6, 7, "regex.metachar"));
    }

    #[test]
    fn retreat_walks_back_through_fragment() {
        let hl = layered("\"a.b\" y");
        let mut it = hl.layered_iterator(6).unwrap();
        assert_eq!(it.kind_name(), "identifier");
        let mut seen = Vec::new();
        for _ in 0..5 {
            it.retreat();
            seen.push((it.start(), it.kind_name().to_string()));
        }
        assert_eq!(
            seen,
            vec![
                (5, "whitespace".to_string()),
                (4, "string.quote".to_string()),
                (3, "regex.literal".to_string()),
                (2, "regex.metachar".to_string()),
                (1, "regex.literal".to_string()),
            ]
        );
        it.retreat();
        assert_eq!(it.start(), 0);
        it.retreat();
        assert!(it.at_end());
    }

    #[test]
    fn embedded_attributes_overlay_outer() {
        let hl = layered("\"a.b\"");
        let mut it = hl.layered_iterator(2).unwrap();
        let theme = SyntaxTheme::catppuccin_mocha();
        let expected = theme
            .attributes_for("string")
            .overlay(&theme.attributes_for("regex.metachar"));
        assert_eq!(it.attributes(), expected);
        it.advance();
        assert_eq!(it.attributes().fg, theme.attributes_for("regex.literal").fg);
    }

    #[test]
    fn layer_background_wins() {
        let scheme = Rc::new(SyntaxTheme::catppuccin_mocha());
        let primary = Highlighter::with_lexer(Box::new(CStyleLexer::new()));
        let mut hl = LayeredHighlighter::new(primary, scheme);
        let regex = LayerDescriptor::for_lexer::<RegexLexer>("\n")
            .with_background(SyntaxTheme::layer_background());
        hl.register_layer(c_style::STRING, &regex, &chars("\"ab\""));

        let it = hl.layered_iterator(1).unwrap();
        assert_eq!(it.attributes().bg, SyntaxTheme::layer_background().bg);
    }

    #[test]
    fn iterator_at_text_end() {
        let hl = layered("\"a\"");
        assert!(hl.layered_iterator(3).unwrap().at_end());
        assert!(hl.layered_iterator(4).is_err());
    }
}
