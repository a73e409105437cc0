// Chunk: docs/chunks/buffer_view_trait - Styling types shared by renderer and highlighter
// Chunk: docs/chunks/layered_highlighting - Style overlay for embedded tokens
//!
//! Text styling types.
//!
//! Text styling is terminal-grade:
//! - [`Color`]: Named (16 ANSI), indexed (256), and RGB
//! - [`Style`]: Full attributes (fg/bg, bold, italic, underline variants, etc.)
//! - [`Span`]: A run of text with uniform styling
//! - [`StyledLine`]: A sequence of spans comprising a single line
//!
//! Token kinds resolve to a [`Style`] through a color scheme; embedded tokens
//! resolve their own style and [`Style::overlay`] it onto the outer one.

// =============================================================================
// Color Types
// =============================================================================

/// The 16 standard ANSI colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

/// Color representation.
///
/// - Default (let the renderer/theme decide)
/// - Named ANSI colors (16 colors)
/// - Indexed (256-color palette)
/// - True color RGB (24-bit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Default foreground/background.
    #[default]
    Default,
    /// Named ANSI colors (0-15).
    Named(NamedColor),
    /// 256-color palette index.
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Returns `self` unless it is `Default`, in which case `base` shows through.
    fn or(self, base: Color) -> Color {
        match self {
            Color::Default => base,
            color => color,
        }
    }
}

/// Underline rendering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderlineStyle {
    /// No underline.
    #[default]
    None,
    /// Single straight underline.
    Single,
    /// Double straight underline.
    Double,
    /// Curly/wavy underline (often used for spelling errors).
    Curly,
    /// Dotted underline.
    Dotted,
    /// Dashed underline.
    Dashed,
}

// =============================================================================
// Style
// =============================================================================

/// Text styling attributes.
///
/// The default style is unstyled text: default colors, no attributes.
///
/// # Example
///
/// ```
/// use lite_lex_buffer::{Color, NamedColor, Style};
///
/// let outer = Style { fg: Color::Named(NamedColor::Green), ..Style::default() };
/// let inner = Style { bold: true, ..Style::default() };
///
/// let merged = outer.overlay(&inner);
/// assert_eq!(merged.fg, Color::Named(NamedColor::Green));
/// assert!(merged.bold);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Bold weight.
    pub bold: bool,
    /// Italic slant.
    pub italic: bool,
    /// Dim/faint intensity.
    pub dim: bool,
    /// Underline style.
    pub underline: UnderlineStyle,
    /// Underline color (None = use fg color).
    pub underline_color: Option<Color>,
    /// Strikethrough line.
    pub strikethrough: bool,
    /// Inverse video (swap fg/bg at render time).
    pub inverse: bool,
    /// Hidden text (don't render glyphs).
    pub hidden: bool,
}

impl Style {
    /// Returns this style with `top` layered over it.
    ///
    /// Colors of `top` win unless they are `Color::Default`; flags are or-ed;
    /// the underline style of `top` wins unless it is `None`.
    pub fn overlay(&self, top: &Style) -> Style {
        Style {
            fg: top.fg.or(self.fg),
            bg: top.bg.or(self.bg),
            bold: self.bold || top.bold,
            italic: self.italic || top.italic,
            dim: self.dim || top.dim,
            underline: match top.underline {
                UnderlineStyle::None => self.underline,
                underline => underline,
            },
            underline_color: top.underline_color.or(self.underline_color),
            strikethrough: self.strikethrough || top.strikethrough,
            inverse: self.inverse || top.inverse,
            hidden: self.hidden || top.hidden,
        }
    }
}

// =============================================================================
// Span and StyledLine
// =============================================================================

/// A contiguous run of text with uniform styling.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    /// The text content of this span.
    pub text: String,
    /// The style applied to this text.
    pub style: Style,
}

impl Span {
    /// Creates a new span with the given text and style.
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Creates an unstyled span (default style).
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Style::default())
    }
}

/// A line as the renderer sees it: a sequence of styled spans.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledLine {
    /// The spans comprising this line.
    pub spans: Vec<Span>,
}

impl StyledLine {
    /// Creates a new styled line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans }
    }

    /// Creates a line with a single unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            spans: vec![Span::plain(text)],
        }
    }

    /// Creates an empty line.
    pub fn empty() -> Self {
        Self { spans: vec![] }
    }

    /// Returns true if the line has no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the concatenated text of all spans.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Returns the total character count across all spans.
    pub fn char_count(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::Named(NamedColor::Red);
    const BLUE: Color = Color::Rgb { r: 0, g: 0, b: 255 };

    #[test]
    fn test_style_default_is_plain() {
        let style = Style::default();
        assert_eq!(style.fg, Color::Default);
        assert_eq!(style.bg, Color::Default);
        assert!(!style.bold);
        assert_eq!(style.underline, UnderlineStyle::None);
        assert!(style.underline_color.is_none());
    }

    #[test]
    fn test_overlay_top_colors_win() {
        let base = Style { fg: RED, bg: RED, ..Style::default() };
        let top = Style { fg: BLUE, ..Style::default() };
        let merged = base.overlay(&top);
        assert_eq!(merged.fg, BLUE);
        assert_eq!(merged.bg, RED);
    }

    #[test]
    fn test_overlay_flags_are_ored() {
        let base = Style { italic: true, ..Style::default() };
        let top = Style { bold: true, ..Style::default() };
        let merged = base.overlay(&top);
        assert!(merged.bold && merged.italic);
    }

    #[test]
    fn test_overlay_underline() {
        let base = Style {
            underline: UnderlineStyle::Curly,
            underline_color: Some(RED),
            ..Style::default()
        };
        assert_eq!(base.overlay(&Style::default()), base);

        let top = Style { underline: UnderlineStyle::Single, ..Style::default() };
        let merged = base.overlay(&top);
        assert_eq!(merged.underline, UnderlineStyle::Single);
        assert_eq!(merged.underline_color, Some(RED));
    }

    #[test]
    fn test_styled_line_text_and_count() {
        let line = StyledLine::new(vec![Span::plain("héllo"), Span::new(" wörld", Style::default())]);
        assert_eq!(line.text(), "héllo wörld");
        assert_eq!(line.char_count(), 11);
        assert!(StyledLine::empty().is_empty());
    }
}
