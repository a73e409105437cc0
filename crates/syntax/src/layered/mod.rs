// Chunk: docs/chunks/layered_highlighting - Embedded grammars layered over outer tokens

//! Layered highlighting: embedded grammars inside outer tokens.
//!
//! A [`LayeredHighlighter`] wraps a primary [`Highlighter`]. Outer token kinds
//! registered with [`LayeredHighlighter::register_layer`] are tokenized a
//! second time by the layer's own lexer, over a private virtual buffer that
//! holds every such token's text (see [`mapper`]).
//!
//! The outer index carries a side table parallel to its slots. Each entry is
//! an optional id into an arena of mapped ranges owned by this highlighter, so
//! removing a mapping is a slot clear plus an arena release and no reference
//! cycles exist between slots, ranges and mappers.
//!
//! After every splice of the outer index the slots that were replaced are
//! reconciled one by one:
//!
//! - no mapping, kind has a layer: insert the text into the layer's buffer
//! - mapping for the same layer and kind: replace the fragment text
//! - mapping for another layer or kind: remove it, then insert
//! - mapping but the kind has no layer: remove it
//!
//! An edit outside every layered token never touches a virtual buffer.

pub(crate) mod mapper;
mod iterator;

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use lite_lex_buffer::{Style, TextView};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::edit::EditEvent;
use crate::error::HighlightError;
use crate::highlighter::{Highlighter, IndexChange};
use crate::lexer::{Lexer, LexerFactory};
use crate::source::TokenSource;
use crate::theme::ColorScheme;
use crate::token::TokenKind;

pub use iterator::LayeredIterator;
use mapper::{MappedRange, Mapper, MapperId, RangeArena, RangeId};

#[derive(Clone)]
struct LayerSpec {
    factory: LexerFactory,
    separator: String,
    background: Option<Style>,
}

/// Describes one embedded grammar: how to create its lexer, the separator
/// placed between fragments in its virtual buffer, and an optional
/// background drawn under its tokens.
///
/// Descriptors compare by identity. Registering clones of one descriptor
/// for several outer kinds shares a single virtual buffer between them.
#[derive(Clone)]
pub struct LayerDescriptor(Rc<LayerSpec>);

impl LayerDescriptor {
    /// The separator must return the embedded lexer to an initial state, or
    /// fragments will not resync independently.
    pub fn new(factory: LexerFactory, separator: &str) -> Self {
        Self(Rc::new(LayerSpec {
            factory,
            separator: separator.to_string(),
            background: None,
        }))
    }

    pub fn for_lexer<L: Lexer + Default + 'static>(separator: &str) -> Self {
        Self::new(Rc::new(|| Box::new(L::default()) as Box<dyn Lexer>), separator)
    }

    /// Sets the background style. Call before cloning: a descriptor shared
    /// with others gets a fresh identity.
    pub fn with_background(mut self, background: Style) -> Self {
        Rc::make_mut(&mut self.0).background = Some(background);
        self
    }

    pub fn separator(&self) -> &str {
        &self.0.separator
    }

    pub fn background(&self) -> Option<Style> {
        self.0.background
    }

    pub fn create_lexer(&self) -> Box<dyn Lexer> {
        (self.0.factory)()
    }

    /// True if both descriptors are the same layer.
    pub fn same_layer(&self, other: &LayerDescriptor) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for LayerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerDescriptor")
            .field("separator", &self.0.separator)
            .field("background", &self.0.background)
            .finish_non_exhaustive()
    }
}

/// A primary highlighter plus embedded-grammar layers.
pub struct LayeredHighlighter {
    primary: Highlighter,
    layers: FxHashMap<TokenKind, MapperId>,
    mappers: Vec<Mapper>,
    ranges: RangeArena,
    /// Parallel to the outer index: the mapping of each slot, if any
    slots: Vec<Option<RangeId>>,
    scheme: Rc<dyn ColorScheme>,
}

impl LayeredHighlighter {
    /// Wraps `primary`. Embedded highlighters inherit `scheme` and the
    /// primary's configuration.
    pub fn new(primary: Highlighter, scheme: Rc<dyn ColorScheme>) -> Self {
        let slots = vec![None; primary.index().len()];
        let mut layered = Self {
            primary,
            layers: FxHashMap::default(),
            mappers: Vec::new(),
            ranges: RangeArena::default(),
            slots,
            scheme: scheme.clone(),
        };
        layered.primary.set_color_scheme(scheme);
        layered
    }

    pub fn primary(&self) -> &Highlighter {
        &self.primary
    }

    pub fn text_len(&self) -> usize {
        self.primary.text_len()
    }

    /// Lexes outer tokens of `outer_kind` with `descriptor`'s grammar from now
    /// on, and retokenizes `text` from scratch.
    pub fn register_layer<'t>(
        &mut self,
        outer_kind: TokenKind,
        descriptor: &LayerDescriptor,
        text: impl Into<TextView<'t>>,
    ) {
        let id = match self
            .mappers
            .iter()
            .position(|m| m.descriptor().same_layer(descriptor))
        {
            Some(index) => MapperId(index),
            None => {
                let config = self.primary.config().clone();
                self.mappers
                    .push(Mapper::new(descriptor.clone(), self.scheme.clone(), config));
                MapperId(self.mappers.len() - 1)
            }
        };
        self.layers.insert(outer_kind, id);
        debug!(
            kind = self.primary.kinds().name(outer_kind),
            mapper = id.0,
            "registered layer"
        );
        self.set_text(text);
    }

    /// [`register_layer`](Self::register_layer) by the outer lexer's kind name.
    pub fn register_layer_by_name<'t>(
        &mut self,
        kind_name: &str,
        descriptor: &LayerDescriptor,
        text: impl Into<TextView<'t>>,
    ) -> Result<(), HighlightError> {
        let kind = self
            .primary
            .kinds()
            .get(kind_name)
            .ok_or_else(|| HighlightError::UnknownTokenKind {
                name: kind_name.to_string(),
            })?;
        self.register_layer(kind, descriptor, text);
        Ok(())
    }

    /// Tokenizes `text` from scratch and rebuilds every virtual buffer.
    pub fn set_text<'t>(&mut self, text: impl Into<TextView<'t>>) {
        let text: TextView<'_> = text.into();
        self.primary.set_text(text);
        self.ranges.clear();
        self.slots.clear();
        self.slots.resize(self.primary.index().len(), None);

        let mut contents: Vec<Vec<char>> = vec![Vec::new(); self.mappers.len()];
        let mut orders: Vec<Vec<RangeId>> = vec![Vec::new(); self.mappers.len()];
        let index = self.primary.index();
        for slot in 0..index.len() {
            let kind = index.kind(slot);
            let Some(&mapper) = self.layers.get(&kind) else {
                continue;
            };
            let content = &mut contents[mapper.0];
            content.extend(self.mappers[mapper.0].descriptor().separator().chars());
            let start = content.len();
            content.extend(text.chars(index.start(slot)..index.end(slot)));
            let id = self.ranges.alloc(MappedRange {
                mapper,
                outer_kind: kind,
                start,
                end: content.len(),
            });
            self.slots[slot] = Some(id);
            orders[mapper.0].push(id);
        }

        for ((mapper, content), order) in self.mappers.iter_mut().zip(contents).zip(orders) {
            mapper.rebuild(&content, order);
        }
    }

    /// Updates the outer tokens and every affected virtual buffer after
    /// `event`. Returns the outer offsets to repaint.
    pub fn apply_edit<'t>(
        &mut self,
        text: impl Into<TextView<'t>>,
        event: EditEvent,
    ) -> Result<Range<usize>, HighlightError> {
        let text: TextView<'_> = text.into();
        let outcome = self.primary.apply_edit(text, event)?;
        let spilled = self.apply_change(outcome.change, text)?;
        if spilled {
            debug!(offset = event.offset, "embedded relex spilled, repainting everything");
            return Ok(0..text.len());
        }
        Ok(outcome.repaint)
    }

    fn apply_change(&mut self, change: IndexChange, text: TextView<'_>) -> Result<bool, HighlightError> {
        let kept = change.old_count.min(change.new_count);
        let mut spilled = false;

        for slot in change.start + kept..change.start + change.old_count {
            if let Some(id) = self.slots[slot].take() {
                spilled |= self.remove_mapping(id)?;
            }
        }
        self.slots.splice(
            change.start + kept..change.start + change.old_count,
            std::iter::repeat(None).take(change.new_count - kept),
        );
        debug_assert_eq!(self.slots.len(), self.primary.index().len());

        for slot in change.start..change.start + change.new_count {
            spilled |= self.update_mapping_for_token(slot, text)?;
        }
        Ok(spilled)
    }

    /// Reconciles the mapping of outer `slot` with its current kind and text.
    fn update_mapping_for_token(&mut self, slot: usize, text: TextView<'_>) -> Result<bool, HighlightError> {
        let index = self.primary.index();
        let kind = index.kind(slot);
        let span = index.start(slot)..index.end(slot);
        let layer = self.layers.get(&kind).copied();
        if layer.is_none() && self.slots[slot].is_none() {
            return Ok(false);
        }
        let token_text = text.to_vec(span);

        let mut spilled = false;
        if let Some(id) = self.slots[slot] {
            let existing = *self.ranges.get(id);
            if layer == Some(existing.mapper) && existing.outer_kind == kind {
                return self.mappers[existing.mapper.0].replace(&mut self.ranges, id, &token_text);
            }
            self.slots[slot] = None;
            spilled |= self.remove_mapping(id)?;
        }

        if let Some(mapper) = layer {
            let at = self.slots[..slot]
                .iter()
                .rev()
                .flatten()
                .map(|&id| self.ranges.get(id))
                .find(|range| range.mapper == mapper)
                .map_or(0, |range| range.end);
            let (id, insert_spilled) =
                self.mappers[mapper.0].insert(&mut self.ranges, mapper, at, &token_text, kind)?;
            self.slots[slot] = Some(id);
            spilled |= insert_spilled;
        }
        Ok(spilled)
    }

    fn remove_mapping(&mut self, id: RangeId) -> Result<bool, HighlightError> {
        let mapper = self.ranges.get(id).mapper;
        self.mappers[mapper.0].remove(&mut self.ranges, id)
    }

    pub fn set_color_scheme(&mut self, scheme: Rc<dyn ColorScheme>) {
        for mapper in &mut self.mappers {
            mapper.nested_mut().set_color_scheme(scheme.clone());
        }
        self.primary.set_color_scheme(scheme.clone());
        self.scheme = scheme;
    }

    /// Composite iterator positioned at `offset`.
    pub fn layered_iterator(&self, offset: usize) -> Result<LayeredIterator<'_>, HighlightError> {
        LayeredIterator::new(self, offset)
    }

    pub(crate) fn mapping_at(&self, slot: usize) -> Option<(&Mapper, &MappedRange)> {
        let range = self.ranges.get(self.slots[slot]?);
        Some((&self.mappers[range.mapper.0], range))
    }

    // ==================== Inspection ====================

    pub fn mapper_count(&self) -> usize {
        self.mappers.len()
    }

    /// Number of outer tokens currently mirrored into a virtual buffer.
    pub fn mapped_range_count(&self) -> usize {
        self.ranges.live_count()
    }

    fn mapper_for(&self, layer: &LayerDescriptor) -> Option<&Mapper> {
        self.mappers.iter().find(|m| m.descriptor().same_layer(layer))
    }

    /// Full virtual buffer text of `layer`, separators included.
    pub fn virtual_text(&self, layer: &LayerDescriptor) -> Option<String> {
        self.mapper_for(layer).map(Mapper::text)
    }

    /// Fragments of `layer`'s virtual buffer in document order.
    pub fn mapped_texts(&self, layer: &LayerDescriptor) -> Vec<String> {
        self.mapper_for(layer).map_or_else(Vec::new, |mapper| {
            mapper
                .order()
                .iter()
                .map(|&id| mapper.fragment(self.ranges.get(id)))
                .collect()
        })
    }

    /// Embedded highlighter of `layer`.
    pub fn nested(&self, layer: &LayerDescriptor) -> Option<&Highlighter> {
        self.mapper_for(layer).map(Mapper::nested)
    }

    /// Panics unless every slot's mapping matches its kind and `text`, and
    /// every virtual buffer matches its fragments.
    pub fn assert_layers_consistent<'t>(&self, text: impl Into<TextView<'t>>) {
        let text: TextView<'_> = text.into();
        let index = self.primary.index();
        assert_eq!(self.slots.len(), index.len(), "side table length diverged");
        let mut mapped = 0;
        for slot in 0..index.len() {
            let kind = index.kind(slot);
            let layer = self.layers.get(&kind).copied();
            match (self.mapping_at(slot), layer) {
                (None, None) => {}
                (Some((mapper, range)), Some(expected)) => {
                    assert_eq!(range.mapper, expected, "slot {slot} is mapped by the wrong layer");
                    assert_eq!(range.outer_kind, kind, "slot {slot} mapping has a stale kind");
                    let outer = text.slice(index.start(slot)..index.end(slot));
                    assert_eq!(mapper.fragment(range), outer, "slot {slot} fragment is stale");
                    mapped += 1;
                }
                (Some(_), None) => panic!("slot {slot} is mapped but its kind has no layer"),
                (None, Some(_)) => panic!("slot {slot} has a layer but no mapping"),
            }
        }
        assert_eq!(mapped, self.ranges.live_count(), "arena holds orphaned ranges");
        for mapper in &self.mappers {
            mapper.assert_consistent(&self.ranges);
        }
    }
}

impl fmt::Debug for LayeredHighlighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredHighlighter")
            .field("primary", &self.primary)
            .field("mappers", &self.mappers)
            .field("mapped", &self.ranges.live_count())
            .finish_non_exhaustive()
    }
}

impl TokenSource for LayeredHighlighter {
    type Iter<'a> = LayeredIterator<'a>;

    fn set_text(&mut self, text: TextView<'_>) {
        LayeredHighlighter::set_text(self, text);
    }

    fn on_edit(&mut self, text: TextView<'_>, event: EditEvent) -> Result<Range<usize>, HighlightError> {
        self.apply_edit(text, event)
    }

    fn iterator(&self, offset: usize) -> Result<LayeredIterator<'_>, HighlightError> {
        self.layered_iterator(offset)
    }

    fn set_color_scheme(&mut self, scheme: Rc<dyn ColorScheme>) {
        LayeredHighlighter::set_color_scheme(self, scheme);
    }

    fn text_len(&self) -> usize {
        self.primary.text_len()
    }
}
