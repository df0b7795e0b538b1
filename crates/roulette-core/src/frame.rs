#![forbid(unsafe_code)]

//! Frame = styled lines for one render pass.
//!
//! `Model::view` writes [`Line`]s into a [`Frame`]; the presenter encodes
//! them. Widths are display widths (`unicode-width`), so wide glyphs and
//! emoji options line up.
//!
//! The placement helpers mirror what the wheel needs and nothing more:
//! centering a line in a width, centering a block in a height, and joining
//! blocks side by side with vertical centering.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::style::Style;

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Span {
    /// Text content.
    pub text: String,
    /// Style of the whole run.
    pub style: Style,
}

impl Span {
    /// Unstyled text.
    #[must_use]
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::new(),
        }
    }

    /// Styled text.
    #[must_use]
    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Display width in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// One terminal row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    /// Spans left to right.
    pub spans: Vec<Span>,
}

impl From<Span> for Line {
    fn from(span: Span) -> Self {
        Self { spans: vec![span] }
    }
}

impl From<Vec<Span>> for Line {
    fn from(spans: Vec<Span>) -> Self {
        Self { spans }
    }
}

impl Line {
    /// An empty line.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// `width` unstyled spaces.
    #[must_use]
    pub fn blank(width: usize) -> Self {
        if width == 0 {
            return Self::empty();
        }
        Span::raw(" ".repeat(width)).into()
    }

    /// Display width in cells.
    #[must_use]
    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    /// Append a span.
    pub fn push(&mut self, span: Span) {
        self.spans.push(span);
    }

    /// Append every span of `other`.
    pub fn append(&mut self, other: Line) {
        self.spans.extend(other.spans);
    }

    /// Text without styles.
    #[must_use]
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Right-pad with spaces up to `width`.
    #[must_use]
    pub fn padded(mut self, width: usize) -> Self {
        let w = self.width();
        if w < width {
            self.push(Span::raw(" ".repeat(width - w)));
        }
        self
    }
}

/// The render target handed to `Model::view`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<Line>,
}

impl Frame {
    /// An empty frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line.
    pub fn push(&mut self, line: impl Into<Line>) {
        self.lines.push(line.into());
    }

    /// Append several lines.
    pub fn extend(&mut self, lines: impl IntoIterator<Item = Line>) {
        self.lines.extend(lines);
    }

    /// All lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Widest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.lines.iter().map(Line::width).max().unwrap_or(0)
    }

    /// The frame as plain text, one `\n` between rows.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.lines
            .iter()
            .map(Line::plain)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Cut `text` to at most `width` display cells.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(ch);
    }
    out
}

/// `text` truncated to `width` and centered with spaces. Extra space goes right.
#[must_use]
pub fn center_text(text: &str, width: usize) -> String {
    let text = truncate(text, width);
    let gap = width - text.width();
    let left = gap / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(gap - left))
}

/// Center `line` horizontally inside `width`. Lines already wider are kept as is.
#[must_use]
pub fn place_horizontal(line: Line, width: usize) -> Line {
    let w = line.width();
    if w >= width {
        return line;
    }
    let left = (width - w) / 2;
    let mut placed = Line::blank(left);
    placed.append(line);
    placed.padded(width)
}

/// Center `lines` vertically inside `height` rows, padding with blank lines
/// `width` wide. Taller blocks are kept as is.
#[must_use]
pub fn place_vertical(lines: Vec<Line>, height: usize, width: usize) -> Vec<Line> {
    if lines.len() >= height {
        return lines;
    }
    let gap = height - lines.len();
    let top = gap / 2;
    let mut placed = Vec::with_capacity(height);
    placed.extend(std::iter::repeat_with(|| Line::blank(width)).take(top));
    placed.extend(lines);
    placed.extend(std::iter::repeat_with(|| Line::blank(width)).take(gap - top));
    placed
}

/// Join blocks left to right. Each block is centered vertically in the
/// tallest block's height and padded to its own widest line.
#[must_use]
pub fn join_horizontal(blocks: Vec<Vec<Line>>) -> Vec<Line> {
    let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
    let mut rows = vec![Line::empty(); height];
    for block in blocks {
        let width = block.iter().map(Line::width).max().unwrap_or(0);
        let block = block.into_iter().map(|l| l.padded(width)).collect();
        for (row, line) in rows.iter_mut().zip(place_vertical(block, height, width)) {
            row.append(line);
        }
    }
    rows
}
