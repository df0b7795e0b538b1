#![forbid(unsafe_code)]

//! The roulette session state machine.
//!
//! ```text
//!            Start                 |pos - total| < 0.5            Stop / Start
//!  ┌──────┐ ───────▶ ┌──────────┐ ──────────────────▶ ┌────────┐ ────────────▶ ┌──────────┐
//!  │ Idle │          │ Spinning │                     │ Landed │               │ Finished │
//!  └──────┘          └──────────┘ ──────────────────▶ └────────┘               └──────────┘
//!                                   Start (force-stop, quits)
//! ```
//!
//! Quit moves any phase straight to `Finished`.
//!
//! Three independent tickers feed the machine, each re-armed by the message
//! it delivers:
//!
//! - `SpinTick` (every `1/fps`): advances the spring; touches motion and phase.
//! - `FlickerLights` (every `flicker_interval`): toggles the lights only.
//! - `FlashWinner` (every `flash_interval`, Landed only): toggles the
//!   winner highlight only.
//!
//! A tick that arrives in a phase that does not own it is dropped and not
//! re-armed, so ticks may interleave in any order without corrupting state.

use tracing::{debug, info, trace};

use crate::config::RouletteConfig;
use crate::event::{Event, KeyMap};
use crate::frame::{self, Frame, Line, Span};
use crate::gauge;
use crate::model::{Cmd, Model};
use crate::plan::SpinPlan;
use crate::spring::SpinSpring;
use crate::style::{Style, Theme};
use crate::viewport::{ViewState, Viewport};

/// Distance from the target, in position units, at which the wheel lands.
pub const LANDING_EPSILON: f64 = 0.5;

/// Lifecycle stage of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Waiting for the first Start.
    #[default]
    Idle,
    /// The spring is moving the wheel.
    Spinning,
    /// The wheel rests on the winner and pulses.
    Landed,
    /// Terminal; the host should end the loop.
    Finished,
}

/// Session messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    /// Primary action: start, or force-stop once running.
    Start,
    /// Leave immediately.
    Quit,
    /// Advance the spring one tick.
    SpinTick,
    /// Toggle the lights.
    FlickerLights,
    /// Toggle the winner highlight.
    FlashWinner,
    /// The linger delay after landing elapsed.
    Stop,
    /// Terminal changed; redraw only.
    Redraw,
    /// Input with no binding.
    Ignore,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        let keys = KeyMap::standard();
        match event {
            Event::Key(key) if keys.quit.matches(&key) => Self::Quit,
            Event::Key(key) if keys.roll.matches(&key) => Self::Start,
            Event::Key(_) => Self::Ignore,
            Event::Resize { .. } => Self::Redraw,
        }
    }
}

/// Construction errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The option list was empty.
    #[error("Please provide at least 1 option...")]
    NoOptions,

    /// The chosen winner does not index the option list.
    #[error("winner index {winner} is out of range for {len} options")]
    WinnerOutOfRange {
        /// Requested winner.
        winner: usize,
        /// Number of options.
        len: usize,
    },
}

/// One spin of the wheel, from the first key press to the final frame.
#[derive(Debug, Clone)]
pub struct Session {
    title: String,
    options: Vec<String>,
    debug: bool,
    config: RouletteConfig,
    theme: Theme,
    spring: SpinSpring,
    plan: SpinPlan,
    phase: Phase,
    position: f64,
    velocity: f64,
    step: usize,
    lights_on: bool,
    show_winner: bool,
}

impl Session {
    /// Build a session that will land on `options[winner]`.
    ///
    /// `config` is validated here; `theme` is used as given.
    pub fn new(
        title: impl Into<String>,
        options: Vec<String>,
        winner: usize,
        debug: bool,
        config: RouletteConfig,
        theme: Theme,
    ) -> Result<Self, SessionError> {
        if options.is_empty() {
            return Err(SessionError::NoOptions);
        }
        if winner >= options.len() {
            return Err(SessionError::WinnerOutOfRange {
                winner,
                len: options.len(),
            });
        }

        let config = config.validated();
        let plan = SpinPlan::new(
            options.len(),
            config.item_height,
            winner,
            config.steps_multiplier,
        );
        debug!(
            options = options.len(),
            winner,
            total_steps = plan.total_steps(),
            "session planned"
        );

        Ok(Self {
            title: title.into(),
            options,
            debug,
            spring: config.spring(),
            config,
            theme,
            plan,
            phase: Phase::Idle,
            position: 0.0,
            velocity: 0.0,
            step: 0,
            lights_on: false,
            show_winner: false,
        })
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Discrete rotation, `round(position)` while spinning.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Continuous spring position.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Spring velocity.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// The precomputed plan.
    #[must_use]
    pub fn plan(&self) -> &SpinPlan {
        &self.plan
    }

    /// Winning option index.
    #[must_use]
    pub fn winner(&self) -> usize {
        self.plan.winner()
    }

    /// Winning option label.
    #[must_use]
    pub fn winner_option(&self) -> &str {
        &self.options[self.plan.winner()]
    }

    /// Option labels.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Lights flicker state.
    #[must_use]
    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    /// Winner highlight state.
    #[must_use]
    pub fn show_winner(&self) -> bool {
        self.show_winner
    }

    /// Whether the host should stop delivering messages.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Option under the pointer right now.
    #[must_use]
    pub fn option_at_pointer(&self) -> usize {
        self.plan.option_at_pointer(self.step)
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, step = self.step, "phase change");
            self.phase = phase;
        }
    }

    fn spin_tick(&self) -> Cmd<Msg> {
        Cmd::tick(self.config.spin_interval(), Msg::SpinTick)
    }

    fn flicker_tick(&self) -> Cmd<Msg> {
        Cmd::tick(self.config.flicker_interval, Msg::FlickerLights)
    }

    fn flash_tick(&self) -> Cmd<Msg> {
        Cmd::tick(self.config.flash_interval, Msg::FlashWinner)
    }

    fn land(&mut self) {
        self.step = self.plan.total_steps();
        self.set_phase(Phase::Landed);
        self.show_winner = true;
        info!(
            winner = self.plan.winner(),
            option = %self.winner_option(),
            "wheel landed"
        );
    }

    fn advance(&mut self) -> Cmd<Msg> {
        let target = self.plan.total_steps() as f64;
        let (position, velocity) = self.spring.update(self.position, self.velocity, target);
        self.position = position;
        self.velocity = velocity;
        self.step = position.round().max(0.0) as usize;
        trace!(position, velocity, step = self.step, "spin tick");

        if (position - target).abs() < LANDING_EPSILON {
            self.lights_on = true;
            self.land();
            return Cmd::batch(vec![
                self.flash_tick(),
                Cmd::tick(self.config.linger, Msg::Stop),
            ]);
        }
        self.spin_tick()
    }

    fn force_stop(&mut self) -> Cmd<Msg> {
        debug!(step = self.step, "force stop");
        self.position = self.plan.total_steps() as f64;
        self.velocity = 0.0;
        self.land();
        Cmd::quit()
    }

    fn finish(&mut self) -> Cmd<Msg> {
        self.show_winner = true;
        self.set_phase(Phase::Finished);
        Cmd::quit()
    }

    fn help_line(&self) -> Line {
        let key_style = Style::new().fg(self.theme.pointer);
        let desc_style = Style::new().fg(self.theme.pointer).dim();
        let mut line = Line::empty();
        for (i, binding) in KeyMap::standard().short_help().iter().enumerate() {
            if i > 0 {
                line.push(Span::styled(" • ", desc_style));
            }
            line.push(Span::styled(binding.help_key(), key_style));
            line.push(Span::styled(" ", desc_style));
            line.push(Span::styled(binding.help_desc(), desc_style));
        }
        line
    }

    fn view_state(&self) -> ViewState<'_> {
        ViewState {
            options: &self.options,
            plan: &self.plan,
            step: self.step,
            phase: self.phase,
            show_winner: self.show_winner,
            lights_on: self.lights_on,
        }
    }
}

impl Model for Session {
    type Message = Msg;

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match (self.phase, msg) {
            (Phase::Finished, _) => Cmd::none(),
            (_, Msg::Quit) => {
                self.set_phase(Phase::Finished);
                Cmd::quit()
            }

            (Phase::Idle, Msg::Start) => {
                self.set_phase(Phase::Spinning);
                Cmd::batch(vec![self.flicker_tick(), self.spin_tick()])
            }
            (Phase::Spinning, Msg::Start) => self.force_stop(),
            (Phase::Landed, Msg::Start) => self.finish(),

            (Phase::Spinning, Msg::SpinTick) => self.advance(),

            (Phase::Spinning | Phase::Landed, Msg::FlickerLights) => {
                self.lights_on = !self.lights_on;
                self.flicker_tick()
            }

            (Phase::Landed, Msg::FlashWinner) => {
                self.show_winner = !self.show_winner;
                self.flash_tick()
            }
            (Phase::Landed, Msg::Stop) => self.finish(),

            _ => Cmd::none(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let width = self.config.game_width;

        if !self.title.is_empty() {
            let title = Span::styled(frame::truncate(&self.title, width), Style::new().bold());
            frame.push(Line::empty());
            frame.push(frame::place_horizontal(title.into(), width));
            frame.push(Line::empty());
        }
        frame.push(Line::empty());

        let viewport = Viewport::new(&self.config, &self.theme);
        let state = self.view_state();
        let ruler = self
            .debug
            .then(|| gauge::ruler(&self.plan, viewport.visible_height()));
        frame.extend(viewport.game_area(&state, ruler));

        if self.debug {
            frame.push(Line::empty());
            frame.extend(gauge::debug_block(self, &self.theme));
        }

        frame.push(Line::empty());
        frame.push(self.help_line());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyCode, KeyEvent, KeyEventKind, Modifiers};
    use std::time::Duration;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    fn session(n: usize, winner: usize) -> Session {
        Session::new(
            "Dinner?",
            labels(n),
            winner,
            false,
            RouletteConfig::default(),
            Theme::default(),
        )
        .unwrap()
    }

    fn spin_until_landed(s: &mut Session) -> usize {
        let mut ticks = 0;
        while s.phase() == Phase::Spinning {
            s.update(Msg::SpinTick);
            ticks += 1;
            assert!(ticks < 100_000, "spin never landed");
        }
        ticks
    }

    #[test]
    fn empty_options_rejected() {
        let err = Session::new("", vec![], 0, false, RouletteConfig::default(), Theme::default())
            .unwrap_err();
        assert_eq!(err, SessionError::NoOptions);
        assert_eq!(err.to_string(), "Please provide at least 1 option...");
    }

    #[test]
    fn winner_out_of_range_rejected() {
        let err = Session::new(
            "",
            labels(3),
            3,
            false,
            RouletteConfig::default(),
            Theme::default(),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::WinnerOutOfRange { winner: 3, len: 3 });
    }

    #[test]
    fn starts_idle_and_dark() {
        let s = session(4, 1);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.step(), 0);
        assert!(!s.lights_on());
        assert!(!s.show_winner());
        assert_eq!(s.winner_option(), "option 1");
    }

    #[test]
    fn start_schedules_flicker_and_spin() {
        let mut s = session(4, 1);
        let cmd = s.update(Msg::Start);
        assert_eq!(s.phase(), Phase::Spinning);
        assert_eq!(
            cmd,
            Cmd::Batch(vec![
                Cmd::tick(Duration::from_millis(250), Msg::FlickerLights),
                Cmd::tick(Duration::from_secs(1) / 60, Msg::SpinTick),
            ])
        );
    }

    #[test]
    fn spin_tick_rearms_until_landing() {
        let mut s = session(4, 1);
        s.update(Msg::Start);
        let cmd = s.update(Msg::SpinTick);
        assert!(matches!(cmd, Cmd::Tick { msg: Msg::SpinTick, .. }));
        assert!(s.position() > 0.0);
        assert!(s.velocity() > 0.0);
    }

    #[test]
    fn natural_landing_schedules_flash_and_stop() {
        let mut s = session(4, 2);
        s.update(Msg::Start);
        let target = s.plan().total_steps() as f64;
        let mut last = Cmd::none();
        while s.phase() == Phase::Spinning {
            last = s.update(Msg::SpinTick);
        }
        assert_eq!(s.phase(), Phase::Landed);
        assert!((s.position() - target).abs() < LANDING_EPSILON);
        assert_eq!(s.step(), 600);
        assert!(s.lights_on());
        assert!(s.show_winner());
        assert_eq!(s.option_at_pointer(), 2);
        assert_eq!(
            last,
            Cmd::Batch(vec![
                Cmd::tick(Duration::from_millis(250), Msg::FlashWinner),
                Cmd::tick(Duration::from_secs(2), Msg::Stop),
            ])
        );
    }

    #[test]
    fn force_stop_lands_and_quits() {
        let mut s = session(7, 5);
        s.update(Msg::Start);
        for _ in 0..10 {
            s.update(Msg::SpinTick);
        }
        let cmd = s.update(Msg::Start);
        assert_eq!(cmd, Cmd::Quit);
        assert_eq!(s.phase(), Phase::Landed);
        assert_eq!(s.step(), s.plan().total_steps());
        assert_eq!(s.option_at_pointer(), 5);
        assert!(s.show_winner());
        assert!(s.velocity().abs() < f64::EPSILON);
    }

    #[test]
    fn flash_toggles_only_highlight() {
        let mut s = session(3, 0);
        s.update(Msg::Start);
        spin_until_landed(&mut s);
        let lights = s.lights_on();
        let step = s.step();
        let cmd = s.update(Msg::FlashWinner);
        assert!(matches!(cmd, Cmd::Tick { msg: Msg::FlashWinner, .. }));
        assert!(!s.show_winner());
        assert_eq!(s.lights_on(), lights);
        assert_eq!(s.step(), step);
        s.update(Msg::FlashWinner);
        assert!(s.show_winner());
    }

    #[test]
    fn flicker_toggles_only_lights() {
        let mut s = session(3, 0);
        s.update(Msg::Start);
        s.update(Msg::SpinTick);
        let (pos, vel, step) = (s.position(), s.velocity(), s.step());
        let cmd = s.update(Msg::FlickerLights);
        assert!(matches!(cmd, Cmd::Tick { msg: Msg::FlickerLights, .. }));
        assert!(s.lights_on());
        assert_eq!((s.position(), s.velocity(), s.step()), (pos, vel, step));
        assert_eq!(s.phase(), Phase::Spinning);
    }

    #[test]
    fn flicker_in_idle_is_dropped() {
        let mut s = session(3, 0);
        assert_eq!(s.update(Msg::FlickerLights), Cmd::None);
        assert!(!s.lights_on());
    }

    #[test]
    fn stop_after_landing_finishes() {
        let mut s = session(3, 1);
        s.update(Msg::Start);
        spin_until_landed(&mut s);
        s.update(Msg::FlashWinner);
        assert!(!s.show_winner());
        assert_eq!(s.update(Msg::Stop), Cmd::Quit);
        assert_eq!(s.phase(), Phase::Finished);
        assert!(s.show_winner());
        assert!(s.is_finished());
    }

    #[test]
    fn start_while_landed_finishes() {
        let mut s = session(3, 1);
        s.update(Msg::Start);
        spin_until_landed(&mut s);
        assert_eq!(s.update(Msg::Start), Cmd::Quit);
        assert_eq!(s.phase(), Phase::Finished);
    }

    #[test]
    fn quit_from_any_phase() {
        let mut idle = session(2, 0);
        assert_eq!(idle.update(Msg::Quit), Cmd::Quit);
        assert_eq!(idle.phase(), Phase::Finished);

        let mut spinning = session(2, 0);
        spinning.update(Msg::Start);
        assert_eq!(spinning.update(Msg::Quit), Cmd::Quit);
        assert_eq!(spinning.phase(), Phase::Finished);
    }

    #[test]
    fn finished_ignores_everything() {
        let mut s = session(2, 0);
        s.update(Msg::Quit);
        for msg in [
            Msg::Start,
            Msg::Quit,
            Msg::SpinTick,
            Msg::FlickerLights,
            Msg::FlashWinner,
            Msg::Stop,
            Msg::Redraw,
        ] {
            assert_eq!(s.update(msg), Cmd::None, "{msg:?}");
        }
        assert_eq!(s.phase(), Phase::Finished);
    }

    #[test]
    fn stale_ticks_are_dropped() {
        let mut s = session(2, 0);
        assert_eq!(s.update(Msg::SpinTick), Cmd::None);
        assert_eq!(s.update(Msg::FlashWinner), Cmd::None);
        assert_eq!(s.update(Msg::Stop), Cmd::None);
        assert_eq!(s.phase(), Phase::Idle);
        assert_eq!(s.step(), 0);

        s.update(Msg::Start);
        assert_eq!(s.update(Msg::FlashWinner), Cmd::None);
        assert_eq!(s.update(Msg::Stop), Cmd::None);
        assert_eq!(s.phase(), Phase::Spinning);
    }

    #[test]
    fn events_map_to_messages() {
        let enter = Event::Key(KeyEvent::new(KeyCode::Enter));
        let q = Event::Key(KeyEvent::new(KeyCode::Char('q')));
        let ctrl_c =
            Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        let released =
            Event::Key(KeyEvent::new(KeyCode::Enter).with_kind(KeyEventKind::Release));
        let other = Event::Key(KeyEvent::new(KeyCode::Char('x')));
        let resize = Event::Resize {
            width: 80,
            height: 24,
        };
        assert_eq!(Msg::from(enter), Msg::Start);
        assert_eq!(Msg::from(q), Msg::Quit);
        assert_eq!(Msg::from(ctrl_c), Msg::Quit);
        assert_eq!(Msg::from(released), Msg::Ignore);
        assert_eq!(Msg::from(other), Msg::Ignore);
        assert_eq!(Msg::from(resize), Msg::Redraw);
    }

    #[test]
    fn help_line_keys_map_to_their_messages() {
        let keys = KeyMap::standard();
        let expected = [(&keys.roll, Msg::Start), (&keys.quit, Msg::Quit)];
        assert_eq!(keys.short_help().len(), expected.len());
        for (binding, (listed, msg)) in keys.short_help().into_iter().zip(expected) {
            assert_eq!(binding, listed);
            assert!(!binding.keys().is_empty());
            for key in binding.keys() {
                let event = Event::Key(KeyEvent::new(key.code).with_modifiers(key.modifiers));
                assert_eq!(Msg::from(event), msg, "{} -> {:?}", binding.help_key(), key);
            }
        }

        let s = session(3, 0);
        let mut frame = Frame::new();
        s.view(&mut frame);
        let text = frame.to_plain_string();
        let help = text.lines().last().unwrap();
        for binding in keys.short_help() {
            assert!(help.contains(binding.help_key()));
            assert!(help.contains(binding.help_desc()));
        }
    }

    #[test]
    fn view_layout_with_title() {
        let s = session(4, 0);
        let mut frame = Frame::new();
        s.view(&mut frame);
        let text = frame.to_plain_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1].trim(), "Dinner?");
        // blank, title, blank, blank, 13 game rows, blank, help
        assert_eq!(frame.height(), 4 + 13 + 2);
        assert!(lines.last().unwrap().contains("enter roll/speed up • q/ctrl+c quit"));
    }

    #[test]
    fn view_without_title_skips_title_rows() {
        let s = Session::new(
            "",
            labels(2),
            0,
            false,
            RouletteConfig::default(),
            Theme::default(),
        )
        .unwrap();
        let mut frame = Frame::new();
        s.view(&mut frame);
        assert_eq!(frame.height(), 1 + 13 + 2);
    }

    #[test]
    fn debug_view_adds_ruler_and_block() {
        let s = Session::new(
            "",
            labels(4),
            2,
            true,
            RouletteConfig::default(),
            Theme::default(),
        )
        .unwrap();
        let mut frame = Frame::new();
        s.view(&mut frame);
        let text = frame.to_plain_string();
        assert!(text.contains("totalSteps: 600"));
        assert!(text.contains("winner: option 2"));
        assert!(frame.height() > 1 + 13 + 2);
    }

    #[test]
    fn view_is_idempotent() {
        let mut s = session(5, 3);
        s.update(Msg::Start);
        for _ in 0..37 {
            s.update(Msg::SpinTick);
        }
        let mut a = Frame::new();
        let mut b = Frame::new();
        s.view(&mut a);
        s.view(&mut b);
        assert_eq!(a, b);
    }
}
