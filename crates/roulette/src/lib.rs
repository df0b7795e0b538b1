#![forbid(unsafe_code)]

//! Terminal front end for the roulette wheel: argument parsing, logging,
//! the raw-mode session, the event loop and frame emission.

pub mod cli;
pub mod error;
pub mod logging;
pub mod presenter;
pub mod program;
pub mod terminal_session;

pub use cli::{run, run_from_env};
pub use error::{Result, RouletteError};
