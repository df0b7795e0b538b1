#![forbid(unsafe_code)]

//! Winner planning: how far the wheel has to travel.
//!
//! The options are laid out as one circular strip of
//! `options_height = num_options × item_height` rows. Rotating the strip by
//! `step` moves content row `i` into slot `(i + step) mod options_height`.
//! The pointer sits on slot `middle = options_height / 2`, so after `step`
//! rotations the pointer shows content row
//!
//! ```text
//! row_at_pointer(step) = (middle - step) mod options_height
//! ```
//!
//! [`SpinPlan::new`] picks `total_steps` so that `row_at_pointer(total_steps)`
//! is the first row of the winner's block, after at least `multiplier` full
//! turns.

/// Default number of full turns before the wheel may land.
pub const DEFAULT_STEPS_MULTIPLIER: usize = 50;

/// Precomputed travel for a single spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinPlan {
    options_height: usize,
    middle: usize,
    item_height: usize,
    winner: usize,
    minimum_steps: usize,
    total_steps: usize,
}

impl SpinPlan {
    /// Plan the spin for `winner` among `num_options` blocks of `item_height` rows.
    ///
    /// Callers guarantee `num_options >= 1` and `winner < num_options`;
    /// `item_height` and `multiplier` are raised to at least one.
    #[must_use]
    pub fn new(num_options: usize, item_height: usize, winner: usize, multiplier: usize) -> Self {
        let item_height = item_height.max(1);
        let options_height = num_options.max(1) * item_height;
        let middle = options_height / 2;

        // Signed: a winner below the middle row travels backwards from the
        // middle, which the minimum turns always absorb.
        let mut distance = middle as i64 - (winner * item_height) as i64;
        if winner >= middle {
            distance += options_height as i64;
        }

        let minimum_steps = options_height * multiplier.max(1);
        let total_steps = (minimum_steps as i64 + distance).max(0) as usize;

        Self {
            options_height,
            middle,
            item_height,
            winner,
            minimum_steps,
            total_steps,
        }
    }

    /// Total rows in the circular strip.
    #[inline]
    #[must_use]
    pub fn options_height(&self) -> usize {
        self.options_height
    }

    /// Slot index the pointer sits on.
    #[inline]
    #[must_use]
    pub fn middle(&self) -> usize {
        self.middle
    }

    /// Rows per option block.
    #[inline]
    #[must_use]
    pub fn item_height(&self) -> usize {
        self.item_height
    }

    /// Winning option index.
    #[inline]
    #[must_use]
    pub fn winner(&self) -> usize {
        self.winner
    }

    /// Full turns' worth of steps, before the winner offset.
    #[inline]
    #[must_use]
    pub fn minimum_steps(&self) -> usize {
        self.minimum_steps
    }

    /// Steps the spring travels from 0 to land on the winner.
    #[inline]
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Content row shown under the pointer after rotating by `step`.
    #[must_use]
    pub fn row_at_pointer(&self, step: usize) -> usize {
        let rows = self.options_height as i64;
        (self.middle as i64 - (step as i64 % rows)).rem_euclid(rows) as usize
    }

    /// Option index shown under the pointer after rotating by `step`.
    #[must_use]
    pub fn option_at_pointer(&self, step: usize) -> usize {
        self.row_at_pointer(step) / self.item_height
    }

    /// Row under the pointer once the spin completes.
    #[must_use]
    pub fn landing_row(&self) -> usize {
        self.row_at_pointer(self.total_steps)
    }
}
