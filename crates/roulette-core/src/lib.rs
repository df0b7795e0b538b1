#![forbid(unsafe_code)]

//! Core: spin physics, winner planning, session state and frame composition.
//!
//! # Role in Roulette
//! `roulette-core` is everything that decides *what* is on screen. It has no
//! terminal I/O: the binary crate polls input, runs timers and writes bytes,
//! while this crate turns messages into state transitions and state into
//! styled lines.
//!
//! # Primary responsibilities
//! - **SpinSpring**: damped harmonic oscillator stepped once per tick.
//! - **SpinPlan**: exact step count that lands the wheel on the winner.
//! - **Session**: the Idle → Spinning → Landed → Finished state machine.
//! - **Viewport**: circular option rows windowed around a fixed pointer.
//! - **Gauge**: debug projection of spin progress.
//!
//! # How it fits in the system
//! The runtime feeds [`event::Event`]s (converted to [`session::Msg`]) and
//! timer messages into [`model::Model::update`], executes the returned
//! [`model::Cmd`]s and presents whatever [`model::Model::view`] draws into a
//! [`frame::Frame`].

pub mod config;
pub mod event;
pub mod frame;
pub mod gauge;
pub mod model;
pub mod plan;
pub mod session;
pub mod spring;
pub mod style;
pub mod viewport;

pub use config::RouletteConfig;
pub use event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use frame::{Frame, Line, Span};
pub use model::{Cmd, Model};
pub use plan::SpinPlan;
pub use session::{Msg, Phase, Session, SessionError};
pub use spring::SpinSpring;
pub use style::{Color, Style, Theme};
pub use viewport::Viewport;
