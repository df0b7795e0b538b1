#![forbid(unsafe_code)]

use roulette_core::Theme;

fn main() {
    if let Err(error) = roulette::run_from_env() {
        tracing::error!(%error, "roulette failed");
        eprintln!("{}", roulette::cli::error_message(&error, &Theme::default()));
        std::process::exit(error.exit_code());
    }
}
