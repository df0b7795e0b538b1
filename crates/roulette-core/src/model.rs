#![forbid(unsafe_code)]

//! Elm-style model and command types.
//!
//! The runtime owns the loop; a [`Model`] only answers two questions: how
//! state changes for a message ([`Model::update`]) and what the state looks
//! like ([`Model::view`]). Side effects come back as [`Cmd`] values, so every
//! transition can be tested without a terminal or a clock.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use roulette_core::event::Event;
//! use roulette_core::frame::{Frame, Span};
//! use roulette_core::model::{Cmd, Model};
//!
//! struct Countdown {
//!     left: u32,
//! }
//!
//! enum Msg {
//!     Tick,
//!     Other,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(_: Event) -> Self {
//!         Msg::Other
//!     }
//! }
//!
//! impl Model for Countdown {
//!     type Message = Msg;
//!
//!     fn init(&mut self) -> Cmd<Msg> {
//!         Cmd::tick(Duration::from_millis(10), Msg::Tick)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Tick if self.left > 1 => {
//!                 self.left -= 1;
//!                 Cmd::tick(Duration::from_millis(10), Msg::Tick)
//!             }
//!             Msg::Tick => Cmd::quit(),
//!             Msg::Other => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.push(Span::raw(self.left.to_string()));
//!     }
//! }
//!
//! let mut model = Countdown { left: 2 };
//! assert!(matches!(model.update(Msg::Tick), Cmd::Tick { .. }));
//! assert!(matches!(model.update(Msg::Tick), Cmd::Quit));
//! ```

use std::time::Duration;

use crate::event::Event;
use crate::frame::Frame;

/// Application state and behavior.
pub trait Model {
    /// The message type for this model.
    ///
    /// Terminal events convert into messages; timers deliver them directly.
    type Message: From<Event>;

    /// Startup commands. Called once before the first frame.
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state into `frame`.
    fn view(&self, frame: &mut Frame);
}

/// Side effects requested by `init` or `update`.
#[derive(Debug, PartialEq)]
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Stop the program. Pending timers are discarded.
    Quit,
    /// Execute several commands.
    Batch(Vec<Cmd<M>>),
    /// Deliver `msg` once `after` has elapsed.
    Tick {
        /// Delay before delivery.
        after: Duration,
        /// Message to deliver.
        msg: M,
    },
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a quit command.
    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Create a timer command.
    #[inline]
    pub fn tick(after: Duration, msg: M) -> Self {
        Self::Tick { after, msg }
    }

    /// Create a batch of commands, collapsing empty and single batches.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Whether this command, or any command inside it, quits.
    #[must_use]
    pub fn is_quit(&self) -> bool {
        match self {
            Self::Quit => true,
            Self::Batch(cmds) => cmds.iter().any(Self::is_quit),
            _ => false,
        }
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}
