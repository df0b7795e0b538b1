#![forbid(unsafe_code)]

//! Session tunables.
//!
//! # Defaults
//!
//! | Setting | Default | Range | Description |
//! |---------|---------|-------|-------------|
//! | `fps` | 60 | 1-240 | Spin ticks per second |
//! | `angular_frequency` | 100.0 | 10-1000 | Spring ω |
//! | `damping_ratio` | 50.0 | 1-500 | Spring ζ, never under-damped |
//! | `steps_multiplier` | 50 | 1-500 | Minimum full turns |
//! | `item_height` | 3 | 1-9 | Rows per option |
//! | `item_width` | 20 | 4-80 | Columns per option |
//! | `game_height` | 13 | 3-99, odd | Visible rows |
//! | `game_width` | 30 | 4-200 | Width the game area is centered in |
//! | `flicker_interval` | 250ms | 16ms-2s | Lights toggle period |
//! | `flash_interval` | 250ms | 16ms-2s | Winner pulse period |
//! | `linger` | 2s | 0-30s | Time the winner stays on screen |
//!
//! # Environment Variables
//!
//! | Variable | Type | Description |
//! |----------|------|-------------|
//! | `ROULETTE_FPS` | u32 | Spin ticks per second |
//! | `ROULETTE_ANGULAR_FREQUENCY` | f64 | Spring ω |
//! | `ROULETTE_DAMPING_RATIO` | f64 | Spring ζ |
//! | `ROULETTE_STEPS_MULTIPLIER` | usize | Minimum full turns |
//! | `ROULETTE_ITEM_HEIGHT` | usize | Rows per option |
//! | `ROULETTE_GAME_HEIGHT` | usize | Visible rows |
//! | `ROULETTE_LINGER_MS` | u64 | Winner display time |

use std::time::Duration;

use crate::plan::DEFAULT_STEPS_MULTIPLIER;
use crate::spring::{self, DEFAULT_ANGULAR_FREQUENCY, DEFAULT_DAMPING_RATIO, DEFAULT_FPS, SpinSpring};

const MIN_INTERVAL: Duration = Duration::from_millis(16);
const MAX_INTERVAL: Duration = Duration::from_secs(2);
const MAX_LINGER: Duration = Duration::from_secs(30);
const MIN_ANGULAR_FREQUENCY: f64 = 10.0;
const MIN_DAMPING_RATIO: f64 = 1.0;

/// Tunables for one roulette session.
#[derive(Debug, Clone, PartialEq)]
pub struct RouletteConfig {
    /// Spin ticks per second.
    pub fps: u32,
    /// Spring angular frequency (ω).
    pub angular_frequency: f64,
    /// Spring damping ratio (ζ).
    pub damping_ratio: f64,
    /// Minimum number of full turns before landing.
    pub steps_multiplier: usize,
    /// Rows per option block.
    pub item_height: usize,
    /// Columns per option block.
    pub item_width: usize,
    /// Visible rows of the wheel. Always odd so the pointer has a center row.
    pub game_height: usize,
    /// Width the title and game area are centered in.
    pub game_width: usize,
    /// Period of the lights flicker.
    pub flicker_interval: Duration,
    /// Period of the winner highlight pulse.
    pub flash_interval: Duration,
    /// How long the landed wheel stays up before the program ends.
    pub linger: Duration,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            angular_frequency: DEFAULT_ANGULAR_FREQUENCY,
            damping_ratio: DEFAULT_DAMPING_RATIO,
            steps_multiplier: DEFAULT_STEPS_MULTIPLIER,
            item_height: 3,
            item_width: 20,
            game_height: 13,
            game_width: 30,
            flicker_interval: Duration::from_millis(250),
            flash_interval: Duration::from_millis(250),
            linger: Duration::from_secs(2),
        }
    }
}

impl RouletteConfig {
    /// Set the spin tick rate.
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Set the spring constants.
    #[must_use]
    pub fn with_spring(mut self, angular_frequency: f64, damping_ratio: f64) -> Self {
        self.angular_frequency = angular_frequency;
        self.damping_ratio = damping_ratio;
        self
    }

    /// Set the minimum number of full turns.
    #[must_use]
    pub fn with_steps_multiplier(mut self, multiplier: usize) -> Self {
        self.steps_multiplier = multiplier;
        self
    }

    /// Set the rows per option.
    #[must_use]
    pub fn with_item_height(mut self, rows: usize) -> Self {
        self.item_height = rows;
        self
    }

    /// Set the visible wheel height.
    #[must_use]
    pub fn with_game_height(mut self, rows: usize) -> Self {
        self.game_height = rows;
        self
    }

    /// Set how long the winner stays on screen.
    #[must_use]
    pub fn with_linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    /// Load config from the process environment. Values are clamped.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through `lookup`, which maps a variable name to its value.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("ROULETTE_FPS")
            && let Ok(fps) = val.trim().parse::<u32>()
        {
            config.fps = fps;
        }

        if let Some(val) = lookup("ROULETTE_ANGULAR_FREQUENCY")
            && let Ok(omega) = val.trim().parse::<f64>()
        {
            config.angular_frequency = omega;
        }

        if let Some(val) = lookup("ROULETTE_DAMPING_RATIO")
            && let Ok(zeta) = val.trim().parse::<f64>()
        {
            config.damping_ratio = zeta;
        }

        if let Some(val) = lookup("ROULETTE_STEPS_MULTIPLIER")
            && let Ok(multiplier) = val.trim().parse::<usize>()
        {
            config.steps_multiplier = multiplier;
        }

        if let Some(val) = lookup("ROULETTE_ITEM_HEIGHT")
            && let Ok(rows) = val.trim().parse::<usize>()
        {
            config.item_height = rows;
        }

        if let Some(val) = lookup("ROULETTE_GAME_HEIGHT")
            && let Ok(rows) = val.trim().parse::<usize>()
        {
            config.game_height = rows;
        }

        if let Some(val) = lookup("ROULETTE_LINGER_MS")
            && let Ok(ms) = val.trim().parse::<u64>()
        {
            config.linger = Duration::from_millis(ms);
        }

        config.validated()
    }

    /// Clamp every field to its valid range.
    ///
    /// An even `game_height` is bumped to the next odd value.
    ///
    /// ```
    /// use roulette_core::config::RouletteConfig;
    ///
    /// let config = RouletteConfig::default().with_game_height(12).validated();
    /// assert_eq!(config.game_height, 13);
    /// ```
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.fps = self.fps.clamp(1, 240);
        self.angular_frequency = finite_or(self.angular_frequency, DEFAULT_ANGULAR_FREQUENCY)
            .clamp(MIN_ANGULAR_FREQUENCY, 1000.0);
        // Below critical damping the wheel overshoots and can land past the winner.
        self.damping_ratio =
            finite_or(self.damping_ratio, DEFAULT_DAMPING_RATIO).clamp(MIN_DAMPING_RATIO, 500.0);
        self.steps_multiplier = self.steps_multiplier.clamp(1, 500);
        self.item_height = self.item_height.clamp(1, 9);
        self.item_width = self.item_width.clamp(4, 80);
        self.game_height = self.game_height.clamp(3, 99) | 1;
        self.game_width = self.game_width.clamp(4, 200);
        self.flicker_interval = self.flicker_interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        self.flash_interval = self.flash_interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        self.linger = self.linger.min(MAX_LINGER);
        self
    }

    /// Check if every field is within its valid range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        *self == self.clone().validated()
    }

    /// Interval between spin ticks.
    #[must_use]
    pub fn spin_interval(&self) -> Duration {
        spring::fps(self.fps)
    }

    /// The spring these settings describe.
    #[must_use]
    pub fn spring(&self) -> SpinSpring {
        SpinSpring::new(self.spin_interval(), self.angular_frequency, self.damping_ratio)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
