#![forbid(unsafe_code)]

//! Debug overlay: a progress gauge, the spring state and a row ruler.
//!
//! Only drawn when the session runs in debug mode.

use crate::frame::{Line, Span};
use crate::plan::SpinPlan;
use crate::session::Session;
use crate::style::{Style, Theme};
use crate::viewport::window_bounds;

/// Map spin progress onto `len` gauge cells.
///
/// Clamped to `[0, len - 1]` and monotonic in `position`. A plan with no
/// travel (`total <= 0`) reads as full once `position` reaches it.
#[must_use]
pub fn project(position: f64, total: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let last = len - 1;
    if total <= 0.0 {
        return if position >= total { last } else { 0 };
    }
    let ratio = (position / total).clamp(0.0, 1.0);
    ((ratio * last as f64).round() as usize).min(last)
}

/// The debug readout under the game area.
#[must_use]
pub fn debug_block(session: &Session, theme: &Theme) -> Vec<Line> {
    let plan = session.plan();
    let style = Style::new().fg(theme.pointer).dim();
    let total = plan.total_steps();

    let cell = project(session.position(), total as f64, theme.gauge.len());
    let glyph = theme.gauge.get(cell).copied().unwrap_or("");
    let pointer_row = plan.row_at_pointer(session.step());

    [
        format!("gauge: {glyph}"),
        format!(
            "pos: {:.2} vel: {:.2}",
            session.position(),
            session.velocity()
        ),
        format!("curr: {} totalSteps: {total}", session.step()),
        format!(
            "winner: {} (idx {})",
            session.winner_option(),
            session.winner()
        ),
        format!(
            "optionsHeight: {} middle: {}",
            plan.options_height(),
            plan.middle()
        ),
        format!(
            "pointer: row {pointer_row} option {}",
            pointer_row / plan.item_height()
        ),
    ]
    .into_iter()
    .map(|text| Span::styled(text, style).into())
    .collect()
}

/// Row labels `index - middle` for the visible window of the strip, not
/// rotated, centered in `visible_height` rows.
#[must_use]
pub fn ruler(plan: &SpinPlan, visible_height: usize) -> Vec<Line> {
    let rows = plan.options_height();
    let middle = plan.middle();
    let labels: Vec<String> = window_bounds(middle, visible_height, rows)
        .map(|i| format!(" {:>4}", i as i64 - middle as i64))
        .collect();
    let width = labels.iter().map(String::len).max().unwrap_or(0);
    let lines = labels
        .into_iter()
        .map(|label| Span::styled(label, Style::new().dim()).into())
        .collect();
    crate::frame::place_vertical(lines, visible_height, width)
}
