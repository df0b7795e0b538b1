#![forbid(unsafe_code)]

//! Viewport: the visible slice of the circular option strip.
//!
//! # Pipeline
//!
//! 1. Every option becomes a block of `item_height` rows, `item_width` wide,
//!    with its palette color as background and the label on the center row.
//! 2. The blocks are concatenated into one strip of `options_height` rows.
//! 3. The strip is rotated by `step`: content row `i` moves to slot
//!    `(i + step) mod options_height`.
//! 4. Slots `[low, high)` around the pointer slot (`middle`) are kept, see
//!    [`window_bounds`], then centered in `visible_height` rows.
//!
//! Because the window is anchored on `middle` and centered, the pointer slot
//! always lands on screen row `visible_height / 2`, whether the strip is
//! shorter than the window (fully visible, centered) or much longer
//! (scrolling).

use std::ops::Range;

use crate::config::RouletteConfig;
use crate::frame::{self, Line, Span};
use crate::plan::SpinPlan;
use crate::session::Phase;
use crate::style::{Style, Theme};

/// Everything the viewport needs from the session for one frame.
#[derive(Debug, Clone, Copy)]
pub struct ViewState<'a> {
    /// Option labels, in strip order.
    pub options: &'a [String],
    /// The spin plan (strip height, pointer slot, winner).
    pub plan: &'a SpinPlan,
    /// Discrete rotation.
    pub step: usize,
    /// Session phase.
    pub phase: Phase,
    /// Winner highlight pulse.
    pub show_winner: bool,
    /// Lights flicker state.
    pub lights_on: bool,
}

impl ViewState<'_> {
    /// Whether the winner block is drawn highlighted this frame.
    #[must_use]
    pub fn highlights_winner(&self) -> bool {
        self.show_winner && matches!(self.phase, Phase::Landed | Phase::Finished)
    }
}

/// Slots of a `rows`-long strip visible around `middle` in a window of
/// `visible` rows. Always in bounds; never longer than `visible` when
/// `visible` is odd.
#[must_use]
pub fn window_bounds(middle: usize, visible: usize, rows: usize) -> Range<usize> {
    let half = visible / 2;
    let high = rows.min(middle + half + 1);
    let low = middle.saturating_sub(half).min(high);
    low..high
}

/// Lays out option blocks and the columns around them.
#[derive(Debug, Clone, Copy)]
pub struct Viewport<'a> {
    theme: &'a Theme,
    item_height: usize,
    item_width: usize,
    visible_height: usize,
    game_width: usize,
}

impl<'a> Viewport<'a> {
    /// A viewport sized by `config`, colored by `theme`.
    #[must_use]
    pub fn new(config: &RouletteConfig, theme: &'a Theme) -> Self {
        Self {
            theme,
            item_height: config.item_height.max(1),
            item_width: config.item_width,
            visible_height: config.game_height,
            game_width: config.game_width,
        }
    }

    /// Visible rows of the wheel.
    #[must_use]
    pub fn visible_height(&self) -> usize {
        self.visible_height
    }

    /// All strip rows, unrotated. `highlight` marks the option drawn with a border.
    #[must_use]
    pub fn strip(&self, options: &[String], highlight: Option<usize>) -> Vec<Line> {
        options
            .iter()
            .enumerate()
            .flat_map(|(i, label)| self.block(i, label, highlight == Some(i)))
            .collect()
    }

    fn block(&self, index: usize, label: &str, highlighted: bool) -> Vec<Line> {
        let h = self.item_height;
        let w = self.item_width;
        let text_row = h / 2;
        let style = Style::new()
            .fg(self.theme.option_fg)
            .bg(self.theme.option_color(index));

        let row = |r: usize| -> Line {
            if !highlighted {
                let text = if r == text_row {
                    frame::center_text(label, w)
                } else {
                    " ".repeat(w)
                };
                return Span::styled(text, style).into();
            }

            let inner = w.saturating_sub(2);
            let text = if h >= 3 && r == 0 {
                format!("┏{}┓", "━".repeat(inner))
            } else if h >= 3 && r == h - 1 {
                format!("┗{}┛", "━".repeat(inner))
            } else if r == text_row {
                format!("┃{}┃", frame::center_text(label, inner))
            } else {
                format!("┃{}┃", " ".repeat(inner))
            };
            let style = if h < 3 { style.bold() } else { style };
            Span::styled(text, style).into()
        };

        (0..h).map(row).collect()
    }

    /// The options column for one frame: rotated, windowed and centered in
    /// `visible_height` rows.
    #[must_use]
    pub fn render(&self, view: &ViewState<'_>) -> Vec<Line> {
        let highlight = view.highlights_winner().then_some(view.plan.winner());
        let strip = self.strip(view.options, highlight);
        let rows = strip.len();
        if rows == 0 {
            return frame::place_vertical(Vec::new(), self.visible_height, self.item_width);
        }

        let mut rotated = vec![Line::empty(); rows];
        let shift = view.step % rows;
        for (i, line) in strip.into_iter().enumerate() {
            rotated[(i + shift) % rows] = line;
        }

        let bounds = window_bounds(view.plan.middle(), self.visible_height, rows);
        let visible = rotated.drain(bounds).collect();
        frame::place_vertical(visible, self.visible_height, self.item_width)
    }

    /// The lights column, all lit or all dark.
    #[must_use]
    pub fn lights(&self, lit: bool) -> Vec<Line> {
        let style = Style::new().fg(self.theme.light);
        (0..self.visible_height)
            .map(|_| Span::styled(self.theme.light_glyph(lit), style).into())
            .collect()
    }

    /// `[lights | pointer | options | gap | lights]`, plus `extra` columns on
    /// the right, centered in `game_width`.
    #[must_use]
    pub fn game_area(&self, view: &ViewState<'_>, extra: Option<Vec<Line>>) -> Vec<Line> {
        let pointer_style = Style::new().fg(self.theme.pointer);
        let pointer = self.theme.pointer_glyph;
        let gap = " ".repeat(pointer.chars().count().saturating_sub(1));

        let mut blocks = vec![
            self.lights(view.lights_on),
            vec![Span::styled(pointer, pointer_style).into()],
            self.render(view),
            vec![Span::styled(gap, pointer_style).into()],
            self.lights(view.lights_on),
        ];
        if let Some(extra) = extra {
            blocks.push(extra);
        }

        frame::join_horizontal(blocks)
            .into_iter()
            .map(|line| frame::place_horizontal(line, self.game_width))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| (*s).to_string()).collect()
    }

    fn view<'a>(options: &'a [String], plan: &'a SpinPlan, step: usize) -> ViewState<'a> {
        ViewState {
            options,
            plan,
            step,
            phase: Phase::Spinning,
            show_winner: false,
            lights_on: false,
        }
    }

    #[test]
    fn window_bounds_small_strip_is_whole() {
        assert_eq!(window_bounds(6, 13, 12), 0..12);
        assert_eq!(window_bounds(1, 13, 3), 0..3);
        assert_eq!(window_bounds(0, 13, 1), 0..1);
    }

    #[test]
    fn window_bounds_large_strip_is_visible_height() {
        assert_eq!(window_bounds(7, 13, 14), 1..14);
        assert_eq!(window_bounds(75, 13, 150), 69..82);
    }

    #[test]
    fn strip_has_item_height_rows_per_option() {
        let theme = Theme::default();
        let config = RouletteConfig::default();
        let vp = Viewport::new(&config, &theme);
        let strip = vp.strip(&options(&["A", "B"]), None);
        assert_eq!(strip.len(), 6);
        assert!(strip.iter().all(|l| l.width() == 20));
        assert_eq!(strip[1].plain().trim(), "A");
        assert_eq!(strip[4].plain().trim(), "B");
        assert_eq!(strip[0].plain().trim(), "");
    }

    #[test]
    fn highlighted_block_has_thick_border() {
        let theme = Theme::default();
        let config = RouletteConfig::default();
        let vp = Viewport::new(&config, &theme);
        let strip = vp.strip(&options(&["A", "B"]), Some(1));
        assert!(strip[3].plain().starts_with('┏'));
        assert!(strip[4].plain().starts_with('┃'));
        assert!(strip[4].plain().contains('B'));
        assert!(strip[5].plain().starts_with('┗'));
        assert_eq!(strip[4].width(), 20);
    }

    #[test]
    fn single_row_highlight_is_bold() {
        let theme = Theme::default();
        let config = RouletteConfig::default().with_item_height(1);
        let vp = Viewport::new(&config, &theme);
        let strip = vp.strip(&options(&["A", "B"]), Some(0));
        assert!(strip[0].plain().starts_with('┃'));
        assert!(strip[0].spans[0].style.bold);
        assert!(!strip[1].spans[0].style.bold);
    }

    #[test]
    fn render_is_visible_height_tall() {
        let theme = Theme::default();
        let config = RouletteConfig::default();
        let vp = Viewport::new(&config, &theme);
        for n in [1, 2, 4, 5, 10, 40] {
            let labels: Vec<String> = (0..n).map(|i| format!("opt{i}")).collect();
            let plan = SpinPlan::new(n, 3, 0, 1);
            let lines = vp.render(&view(&labels, &plan, 17));
            assert_eq!(lines.len(), 13, "n={n}");
        }
    }

    #[test]
    fn pointer_row_shows_row_at_pointer() {
        let theme = Theme::default();
        let config = RouletteConfig::default();
        let vp = Viewport::new(&config, &theme);
        let labels = options(&["A", "B", "C", "D"]);
        let plan = SpinPlan::new(4, 3, 2, 50);
        // Step chosen so the pointer lands on a label row.
        for step in [0usize, 5, 8, 11] {
            let lines = vp.render(&view(&labels, &plan, step));
            let row = plan.row_at_pointer(step);
            let center = lines[13 / 2].plain();
            if row % 3 == 1 {
                assert_eq!(center.trim(), labels[row / 3], "step={step}");
            } else {
                assert_eq!(center.trim(), "", "step={step}");
            }
        }
    }

    #[test]
    fn landed_view_highlights_winner_at_pointer() {
        let theme = Theme::default();
        let config = RouletteConfig::default();
        let vp = Viewport::new(&config, &theme);
        let labels = options(&["A", "B", "C", "D"]);
        let plan = SpinPlan::new(4, 3, 2, 50);
        let state = ViewState {
            phase: Phase::Landed,
            show_winner: true,
            ..view(&labels, &plan, plan.total_steps())
        };
        let lines = vp.render(&state);
        assert!(lines[6].plain().starts_with('┏'));
        assert!(lines[7].plain().contains('C'));
    }

    #[test]
    fn lights_toggle_together() {
        let theme = Theme::default();
        let config = RouletteConfig::default();
        let vp = Viewport::new(&config, &theme);
        assert!(vp.lights(true).iter().all(|l| l.plain() == "✦"));
        assert!(vp.lights(false).iter().all(|l| l.plain() == "✧"));
        assert_eq!(vp.lights(true).len(), 13);
    }

    #[test]
    fn game_area_layout() {
        let theme = Theme::default();
        let config = RouletteConfig::default();
        let vp = Viewport::new(&config, &theme);
        let labels = options(&["A", "B", "C", "D"]);
        let plan = SpinPlan::new(4, 3, 0, 1);
        let lines = vp.game_area(&view(&labels, &plan, 1), None);
        assert_eq!(lines.len(), 13);
        assert!(lines.iter().all(|l| l.width() == 30));
        assert!(lines[6].plain().contains('▶'));
        assert!(!lines[5].plain().contains('▶'));
    }
}
