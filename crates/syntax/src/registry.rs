// Chunk: docs/chunks/language_registry - Extension to lexer mapping

//! Language registry mapping file extensions to lexers and their layers.
//!
//! A [`LanguageConfig`] names the primary lexer for a language and the
//! embedded grammars layered over some of its token kinds. The registry hands
//! out configs by extension or by language name, and a config builds a ready
//! [`LayeredHighlighter`].

use std::fmt;
use std::rc::Rc;

use lite_lex_buffer::TextView;
use rustc_hash::FxHashMap;

use crate::config::HighlighterConfig;
use crate::error::HighlightError;
use crate::highlighter::Highlighter;
use crate::layered::{LayerDescriptor, LayeredHighlighter};
use crate::lexer::{Lexer, LexerFactory};
use crate::lexers::{CStyleLexer, RegexLexer};
use crate::theme::{ColorScheme, SyntaxTheme};

/// Configuration for a single language.
#[derive(Clone)]
pub struct LanguageConfig {
    /// Canonical language name, e.g. "c".
    pub name: &'static str,
    /// Creates the primary lexer.
    pub factory: LexerFactory,
    /// Outer token kind names and the grammar layered over each.
    pub layers: Vec<(&'static str, LayerDescriptor)>,
}

impl LanguageConfig {
    pub fn new(name: &'static str, factory: LexerFactory) -> Self {
        Self {
            name,
            factory,
            layers: Vec::new(),
        }
    }

    /// Layers `descriptor` over outer tokens named `kind_name`.
    pub fn with_layer(mut self, kind_name: &'static str, descriptor: LayerDescriptor) -> Self {
        self.layers.push((kind_name, descriptor));
        self
    }

    /// Builds a highlighter for `text` with every layer registered.
    ///
    /// Fails with [`HighlightError::UnknownTokenKind`] if a layer names a kind
    /// the primary lexer never produces.
    pub fn highlighter<'t>(
        &self,
        text: impl Into<TextView<'t>>,
        scheme: Rc<dyn ColorScheme>,
        config: HighlighterConfig,
    ) -> Result<LayeredHighlighter, HighlightError> {
        let text: TextView<'_> = text.into();
        let primary = Highlighter::new((self.factory)(), scheme.clone(), config);
        let mut highlighter = LayeredHighlighter::new(primary, scheme);
        if self.layers.is_empty() {
            highlighter.set_text(text);
        }
        for (kind_name, descriptor) in &self.layers {
            highlighter.register_layer_by_name(kind_name, descriptor, text)?;
        }
        Ok(highlighter)
    }
}

impl fmt::Debug for LanguageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kinds: Vec<&str> = self.layers.iter().map(|(kind, _)| *kind).collect();
        f.debug_struct("LanguageConfig")
            .field("name", &self.name)
            .field("layers", &kinds)
            .finish_non_exhaustive()
    }
}

/// Registry of supported languages, keyed by file extension.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    configs: FxHashMap<&'static str, LanguageConfig>,
}

impl LanguageRegistry {
    /// Creates a registry with no languages.
    pub fn empty() -> Self {
        Self {
            configs: FxHashMap::default(),
        }
    }

    /// Creates a registry with the bundled languages.
    ///
    /// C sources get the C-style lexer with regular expression highlighting
    /// inside string literals. All string literals of a file share one
    /// virtual buffer.
    pub fn new() -> Self {
        let mut registry = Self::empty();

        let regex_layer = LayerDescriptor::for_lexer::<RegexLexer>("\n")
            .with_background(SyntaxTheme::layer_background());
        let c = LanguageConfig::new("c", Rc::new(|| Box::new(CStyleLexer::new()) as Box<dyn Lexer>))
            .with_layer("string", regex_layer);
        registry.register(&["c", "h"], c);

        let regex = LanguageConfig::new("regex", Rc::new(|| Box::new(RegexLexer::new()) as Box<dyn Lexer>));
        registry.register(&["re", "regex"], regex);

        registry
    }

    /// Adds `config` under each of `extensions` (given without the dot),
    /// replacing earlier registrations.
    pub fn register(&mut self, extensions: &[&'static str], config: LanguageConfig) {
        for ext in extensions {
            self.configs.insert(*ext, config.clone());
        }
    }

    /// Returns the language configuration for a file extension.
    ///
    /// The extension can be with or without a leading dot (e.g., ".c" or "c").
    pub fn config_for_extension(&self, ext: &str) -> Option<&LanguageConfig> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        self.configs.get(ext)
    }

    /// Returns an iterator over all supported extensions.
    pub fn supported_extensions(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().copied()
    }

    /// Returns the language configuration for a language name.
    ///
    /// Names are matched case-insensitively after trimming. Common aliases
    /// resolve to the registered extension; anything else is tried as an
    /// extension directly.
    pub fn config_for_language_name(&self, name: &str) -> Option<&LanguageConfig> {
        let name = name.trim().to_lowercase();
        let ext = match name.as_str() {
            "c" => "c",
            "regex" | "regexp" | "re" => "re",
            other => other,
        };
        self.config_for_extension(ext)
    }

    /// Builds a highlighter for `text` using the language registered for `ext`.
    ///
    /// Returns `None` for unknown extensions.
    pub fn highlighter_for_extension<'t>(
        &self,
        ext: &str,
        text: impl Into<TextView<'t>>,
        scheme: Rc<dyn ColorScheme>,
    ) -> Option<Result<LayeredHighlighter, HighlightError>> {
        let config = self.config_for_extension(ext)?;
        Some(config.highlighter(text, scheme, HighlighterConfig::default()))
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iterator::TokenIterator;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn scheme() -> Rc<dyn ColorScheme> {
        Rc::new(SyntaxTheme::catppuccin_mocha())
    }

    #[test]
    fn test_c_extensions() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.config_for_extension("c").map(|c| c.name), Some("c"));
        assert_eq!(registry.config_for_extension("h").map(|c| c.name), Some("c"));
    }

    #[test]
    fn test_unknown_extension() {
        let registry = LanguageRegistry::new();
        assert!(registry.config_for_extension("xyz").is_none());
        assert!(registry.config_for_extension("txt").is_none());
    }

    #[test]
    fn test_extension_with_and_without_dot() {
        let registry = LanguageRegistry::new();
        assert!(registry.config_for_extension(".c").is_some());
        assert!(registry.config_for_extension("c").is_some());
    }

    #[test]
    fn test_supported_extensions() {
        let registry = LanguageRegistry::new();
        let mut exts: Vec<&str> = registry.supported_extensions().collect();
        exts.sort_unstable();
        assert_eq!(exts, vec!["c", "h", "re", "regex"]);
        assert_eq!(LanguageRegistry::empty().supported_extensions().count(), 0);
    }

    #[test]
    fn test_language_name_lookup() {
        let registry = LanguageRegistry::new();
        assert_eq!(registry.config_for_language_name("C").map(|c| c.name), Some("c"));
        assert_eq!(
            registry.config_for_language_name("  Regex ").map(|c| c.name),
            Some("regex")
        );
        assert_eq!(
            registry.config_for_language_name("regexp").map(|c| c.name),
            Some("regex")
        );
        assert!(registry.config_for_language_name("cobol").is_none());
        assert!(registry.config_for_language_name("").is_none());
    }

    #[test]
    fn test_c_highlighter_layers_strings() {
        let registry = LanguageRegistry::new();
        let text = chars("p = \"a+\";");
        let hl = registry
            .highlighter_for_extension("c", &text, scheme())
            .unwrap()
            .unwrap();
        assert_eq!(hl.mapper_count(), 1);
        assert_eq!(hl.mapped_range_count(), 1);

        let it = hl.layered_iterator(6).unwrap();
        assert_eq!(it.kind_name(), "regex.metachar");
        assert_eq!(it.attributes().bg, SyntaxTheme::layer_background().bg);
    }

    #[test]
    fn test_plain_language_has_no_layers() {
        let registry = LanguageRegistry::new();
        let text = chars("a[bc]");
        let hl = registry
            .highlighter_for_extension(".re", &text, scheme())
            .unwrap()
            .unwrap();
        assert_eq!(hl.mapper_count(), 0);
        assert_eq!(hl.text_len(), 5);
        assert_eq!(hl.primary().index().len(), 4);
    }

    #[test]
    fn test_unknown_layer_kind_is_an_error() {
        let config = LanguageConfig::new("c", Rc::new(|| Box::new(CStyleLexer::new()) as Box<dyn Lexer>))
            .with_layer("heredoc", LayerDescriptor::for_lexer::<RegexLexer>("\n"));
        let err = config
            .highlighter(&chars("x"), scheme(), HighlighterConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            HighlightError::UnknownTokenKind {
                name: "heredoc".to_string()
            }
        );
    }

    #[test]
    fn test_configs_share_layer_descriptor() {
        let registry = LanguageRegistry::new();
        let c = registry.config_for_extension("c").unwrap();
        let h = registry.config_for_extension("h").unwrap();
        assert!(c.layers[0].1.same_layer(&h.layers[0].1));
    }
}
