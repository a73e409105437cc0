// Chunk: docs/chunks/syntax_highlighting - Catppuccin Mocha theme for syntax highlighting
// Chunk: docs/chunks/incremental_lexing - Token kind names resolve through a color scheme

//! Color schemes mapping token kind names to styles.
//!
//! [`SyntaxTheme`] maps dotted kind names ("comment", "string.quote",
//! "regex.metachar") to styles using the Catppuccin Mocha palette. Lookups
//! fall back through progressively shorter prefixes, so a lexer can use a
//! precise name and still pick up the general style.

use lite_lex_buffer::{Style, UnderlineStyle};
use rustc_hash::FxHashMap;

/// Resolves a token kind name to its visual attributes.
///
/// Implementations must be pure: the highlighter caches results per kind
/// until the scheme is replaced.
pub trait ColorScheme {
    fn attributes_for(&self, kind_name: &str) -> Style;
}

/// Catppuccin Mocha palette.
mod catppuccin {
    use lite_lex_buffer::Color;

    const fn rgb(hex: u32) -> Color {
        Color::Rgb {
            r: (hex >> 16) as u8,
            g: (hex >> 8) as u8,
            b: hex as u8,
        }
    }

    // Accent colors
    pub const MAUVE: Color = rgb(0xcba6f7);
    pub const BLUE: Color = rgb(0x89b4fa);
    pub const SAPPHIRE: Color = rgb(0x74c7ec);
    pub const GREEN: Color = rgb(0xa6e3a1);
    pub const TEAL: Color = rgb(0x94e2d5);
    pub const PINK: Color = rgb(0xf5c2e7);
    pub const PEACH: Color = rgb(0xfab387);
    pub const YELLOW: Color = rgb(0xf9e2af);
    pub const RED: Color = rgb(0xf38ba8);
    pub const LAVENDER: Color = rgb(0xb4befe);
    pub const SKY: Color = rgb(0x89dceb);

    // Surface/text colors
    pub const OVERLAY0: Color = rgb(0x6c7086);
    pub const SUBTEXT0: Color = rgb(0xa6adc8);
    pub const SURFACE0: Color = rgb(0x313244);
}

/// A mapping from token kind names to visual styles.
#[derive(Debug, Clone)]
pub struct SyntaxTheme {
    styles: FxHashMap<&'static str, Style>,
}

impl SyntaxTheme {
    /// An empty theme: every kind renders unstyled.
    pub fn plain() -> Self {
        Self {
            styles: FxHashMap::default(),
        }
    }

    /// Creates the Catppuccin Mocha syntax theme.
    pub fn catppuccin_mocha() -> Self {
        use catppuccin::*;

        let fg = |fg| Style {
            fg,
            ..Style::default()
        };
        let italic = |fg| Style {
            fg,
            italic: true,
            ..Style::default()
        };

        let entries = [
            ("keyword", fg(MAUVE)),
            ("function", fg(BLUE)),
            ("type", fg(YELLOW)),
            ("string", fg(GREEN)),
            ("string.quote", fg(TEAL)),
            ("escape", fg(PINK)),
            ("constant", fg(PEACH)),
            ("number", fg(PEACH)),
            ("comment", italic(OVERLAY0)),
            ("property", fg(LAVENDER)),
            ("label", italic(SAPPHIRE)),
            ("punctuation", fg(SUBTEXT0)),
            ("operator", fg(SKY)),
            // Embedded regular expressions
            ("regex.literal", fg(GREEN)),
            ("regex.metachar", fg(PEACH)),
            ("regex.escape", fg(PINK)),
            ("regex.class", fg(YELLOW)),
            ("regex.class.bracket", fg(SKY)),
            (
                "bad_character",
                Style {
                    fg: RED,
                    underline: UnderlineStyle::Curly,
                    underline_color: Some(RED),
                    ..Style::default()
                },
            ),
        ];

        let mut theme = Self::plain();
        for (name, style) in entries {
            theme.set(name, style);
        }
        theme
    }

    /// Background used for embedded-language layers under this theme.
    pub fn layer_background() -> Style {
        Style {
            bg: catppuccin::SURFACE0,
            ..Style::default()
        }
    }

    pub fn set(&mut self, name: &'static str, style: Style) {
        self.styles.insert(name, style);
    }

    /// Returns the style for a kind name, if defined.
    ///
    /// First tries an exact match, then progressively shorter prefixes
    /// ("comment.block.start" tries "comment.block" then "comment").
    pub fn style_for(&self, name: &str) -> Option<&Style> {
        if let Some(style) = self.styles.get(name) {
            return Some(style);
        }

        let mut prefix = name;
        while let Some(dot_pos) = prefix.rfind('.') {
            prefix = &prefix[..dot_pos];
            if let Some(style) = self.styles.get(prefix) {
                return Some(style);
            }
        }

        None
    }
}

impl Default for SyntaxTheme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

impl ColorScheme for SyntaxTheme {
    fn attributes_for(&self, kind_name: &str) -> Style {
        self.style_for(kind_name).copied().unwrap_or_default()
    }
}
