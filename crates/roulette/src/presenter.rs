//! Frame emission.
//!
//! Frames are drawn inline: each present moves the cursor back to the first
//! row of the previous frame, clears to the end of the screen and writes
//! the new rows. The final frame is left in place, so the result stays in
//! the scrollback after exit.

use std::io::{self, Write};

use crossterm::cursor::{MoveToColumn, MoveUp};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};
use crossterm::terminal::{Clear, ClearType};
use roulette_core::frame::{Frame, Line, Span};
use roulette_core::style::Color;

/// Writes frames to a terminal-like sink.
#[derive(Debug)]
pub struct Presenter<W: Write> {
    writer: W,
    last_height: usize,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            last_height: 0,
        }
    }

    /// Replace the previous frame with `frame`.
    pub fn present(&mut self, frame: &Frame) -> io::Result<()> {
        if self.last_height > 1 {
            let up = u16::try_from(self.last_height - 1).unwrap_or(u16::MAX);
            queue!(self.writer, MoveUp(up))?;
        }
        queue!(
            self.writer,
            MoveToColumn(0),
            Clear(ClearType::FromCursorDown)
        )?;

        for (i, line) in frame.lines().iter().enumerate() {
            if i > 0 {
                self.writer.write_all(b"\r\n")?;
            }
            self.write_line(line)?;
        }

        self.last_height = frame.height();
        self.writer.flush()
    }

    /// Leave the cursor below the last frame.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.last_height > 0 {
            self.writer.write_all(b"\r\n")?;
        }
        self.last_height = 0;
        self.writer.flush()
    }

    /// Rows of the frame currently on screen.
    #[must_use]
    pub fn last_height(&self) -> usize {
        self.last_height
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, line: &Line) -> io::Result<()> {
        for span in &line.spans {
            self.write_span(span)?;
        }
        Ok(())
    }

    fn write_span(&mut self, span: &Span) -> io::Result<()> {
        let style = span.style;
        if style.is_plain() {
            return queue!(self.writer, Print(&span.text));
        }

        if style.fg != Color::Reset {
            queue!(self.writer, SetForegroundColor(term_color(style.fg)))?;
        }
        if style.bg != Color::Reset {
            queue!(self.writer, SetBackgroundColor(term_color(style.bg)))?;
        }
        if style.bold {
            queue!(self.writer, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.writer, SetAttribute(Attribute::Dim))?;
        }
        queue!(
            self.writer,
            Print(&span.text),
            SetAttribute(Attribute::Reset),
            ResetColor
        )
    }
}

/// Map a theme color to crossterm's color type.
#[must_use]
pub fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Indexed(i) => TermColor::AnsiValue(i),
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roulette_core::style::Style;

    fn frame(rows: &[&str]) -> Frame {
        let mut frame = Frame::new();
        for row in rows {
            frame.push(Span::raw(*row));
        }
        frame
    }

    fn output(presenter: &Presenter<Vec<u8>>) -> String {
        String::from_utf8_lossy(presenter.writer()).into_owned()
    }

    #[test]
    fn first_present_does_not_move_up() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&frame(&["a", "b", "c"])).unwrap();
        let out = output(&presenter);
        assert!(!out.contains("\x1b[2A"));
        assert!(out.contains("a\r\nb\r\nc"));
        assert!(out.contains("\x1b[J"));
        assert_eq!(presenter.last_height(), 3);
    }

    #[test]
    fn redraw_moves_to_previous_top() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&frame(&["a", "b", "c"])).unwrap();
        presenter.present(&frame(&["x"])).unwrap();
        let out = output(&presenter);
        assert!(out.contains("\x1b[2A"));
        assert!(out.ends_with('x'));
        assert_eq!(presenter.last_height(), 1);
    }

    #[test]
    fn styled_spans_reset_after_text() {
        let mut presenter = Presenter::new(Vec::new());
        let mut f = Frame::new();
        f.push(Span::styled(
            "hi",
            Style::new().fg(Color::Rgb(1, 2, 3)).bold(),
        ));
        presenter.present(&f).unwrap();
        let out = output(&presenter);
        let fg = out.find("\x1b[38;2;1;2;3m").unwrap();
        let text = out.find("hi").unwrap();
        assert!(fg < text);
        assert!(out[text..].contains("\x1b[0m"));
    }

    #[test]
    fn identical_frames_encode_identically() {
        let rows = frame(&["one", "two"]);
        let mut a = Presenter::new(Vec::new());
        let mut b = Presenter::new(Vec::new());
        a.present(&rows).unwrap();
        b.present(&rows).unwrap();
        assert_eq!(a.into_inner(), b.into_inner());
    }

    #[test]
    fn finish_ends_the_line() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&frame(&["done"])).unwrap();
        presenter.finish().unwrap();
        assert!(output(&presenter).ends_with("done\r\n"));
        assert_eq!(presenter.last_height(), 0);
    }

    #[test]
    fn color_mapping() {
        assert_eq!(term_color(Color::Reset), TermColor::Reset);
        assert_eq!(term_color(Color::Indexed(7)), TermColor::AnsiValue(7));
        assert_eq!(
            term_color(Color::hex(0x3d59a1)),
            TermColor::Rgb {
                r: 0x3d,
                g: 0x59,
                b: 0xa1
            }
        );
    }
}
