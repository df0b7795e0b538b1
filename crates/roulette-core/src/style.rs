#![forbid(unsafe_code)]

//! Colors, text styles and the theme tables.
//!
//! A [`Theme`] is plain data handed to the session at construction: the
//! option palette, the light and pointer colors, and the glyph tables used
//! by the lights column and the debug gauge. Nothing here is global.

/// A terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default color.
    #[default]
    Reset,
    /// One of the 256 indexed colors (0-15 are the ANSI colors).
    Indexed(u8),
    /// 24-bit color.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Build an RGB color from a `0xRRGGBB` literal.
    #[must_use]
    pub const fn hex(rgb: u32) -> Self {
        Self::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }
}

/// Foreground, background and bold for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Bold weight.
    pub bold: bool,
    /// Faint weight.
    pub dim: bool,
}

impl Style {
    /// The unstyled default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
            bold: false,
            dim: false,
        }
    }

    /// Set the foreground color.
    #[must_use]
    pub const fn fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Set the background color.
    #[must_use]
    pub const fn bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Enable bold.
    #[must_use]
    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Enable faint text.
    #[must_use]
    pub const fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    /// True when this style emits no escape sequences.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == Self::new()
    }
}

const PALETTE: [Color; 18] = [
    Color::hex(0x3d59a1),
    Color::hex(0xf7768e),
    Color::hex(0x0db9d7),
    Color::hex(0xff9e64),
    Color::hex(0xb4f9f8),
    Color::hex(0x9d7cd8),
    Color::hex(0x394b70),
    Color::hex(0xbb9af7),
    Color::hex(0xff007c),
    Color::hex(0x7dcfff),
    Color::hex(0x2ac3de),
    Color::hex(0xe0af68),
    Color::hex(0x89ddff),
    Color::hex(0x9ece6a),
    Color::hex(0x73daca),
    Color::hex(0x41a6b5),
    Color::hex(0x7aa2f7),
    Color::hex(0x1abc9c),
];

const GAUGE: [&str; 17] = [
    "██", "▇▇", "▆▆", "▅▅", "▄▄", "▃▃", "▂▂", "▁▁", "__", "▁▁", "▂▂", "▃▃", "▄▄", "▅▅", "▆▆", "▇▇",
    "██",
];

/// Colors and glyphs for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Option backgrounds, cycled by option index.
    pub palette: Vec<Color>,
    /// Text and border color drawn on top of option backgrounds.
    pub option_fg: Color,
    /// Color of the lights column.
    pub light: Color,
    /// Color of the pointer glyph.
    pub pointer: Color,
    /// Color of the precondition error message.
    pub error: Color,
    /// Light glyph while lit.
    pub light_on: &'static str,
    /// Light glyph while dark.
    pub light_off: &'static str,
    /// Pointer glyph, padded to its column width.
    pub pointer_glyph: &'static str,
    /// Debug gauge glyphs, from empty to full and back.
    pub gauge: Vec<&'static str>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: PALETTE.to_vec(),
            option_fg: Color::Indexed(0),
            light: Color::hex(0xe0af68),
            pointer: Color::Indexed(7),
            error: Color::hex(0xf7768e),
            light_on: "✦",
            light_off: "✧",
            pointer_glyph: " ▶ ",
            gauge: GAUGE.to_vec(),
        }
    }
}

impl Theme {
    /// Background for option `index`; an empty palette falls back to `Reset`.
    #[must_use]
    pub fn option_color(&self, index: usize) -> Color {
        if self.palette.is_empty() {
            return Color::Reset;
        }
        self.palette[index % self.palette.len()]
    }

    /// Light glyph for the current flicker state.
    #[must_use]
    pub fn light_glyph(&self, lit: bool) -> &'static str {
        if lit { self.light_on } else { self.light_off }
    }

    /// Style for the precondition error message.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::new().fg(self.error)
    }
}
