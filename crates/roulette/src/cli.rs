use std::io;

use clap::Parser;
use crossterm::style::Stylize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roulette_core::{RouletteConfig, Session, SessionError, Theme};
use tracing::info;

use crate::error::Result;
use crate::presenter::term_color;
use crate::program::Program;
use crate::terminal_session::TerminalSession;

#[derive(Debug, Parser)]
#[command(
    name = "roulette",
    about = "Pick randomly from an arbitrary list of items with a spinning wheel",
    version
)]
pub struct Cli {
    /// Options to pick from, comma separated. May be repeated.
    #[arg(short, long = "options", value_delimiter = ',', value_name = "A,B,C")]
    pub options: Vec<String>,

    /// Title shown above the wheel.
    #[arg(short, long, default_value = "")]
    pub title: String,

    /// Show the spring state and row ruler.
    #[arg(long)]
    pub debug: bool,

    /// Seed the winner pick for a reproducible spin.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    /// Options with surrounding whitespace removed; empty entries dropped.
    #[must_use]
    pub fn option_labels(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Pick the winner among `len` options.
    #[must_use]
    pub fn pick_winner(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed).random_range(0..len),
            None => rand::rng().random_range(0..len),
        }
    }
}

/// Build the session described by `cli` and `config`.
pub fn build_session(cli: &Cli, config: RouletteConfig, theme: Theme) -> Result<Session> {
    let options = cli.option_labels();
    if options.is_empty() {
        return Err(SessionError::NoOptions.into());
    }
    let winner = cli.pick_winner(options.len());
    info!(options = options.len(), winner, seeded = cli.seed.is_some(), "picked winner");
    Ok(Session::new(
        cli.title.clone(),
        options,
        winner,
        cli.debug,
        config,
        theme,
    )?)
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    crate::logging::init_from_env()?;
    let config = RouletteConfig::from_env();
    let session = build_session(&cli, config, Theme::default())?;

    let terminal = TerminalSession::new()?;
    let mut program = Program::new(session, terminal, io::stdout());
    program.run()?;
    Ok(())
}

/// Render an error the way `main` prints it: usage errors in the theme's error color.
#[must_use]
pub fn error_message(error: &crate::error::RouletteError, theme: &Theme) -> String {
    let text = error.to_string();
    if error.is_usage() {
        text.with(term_color(theme.error_style().fg)).to_string()
    } else {
        text
    }
}
