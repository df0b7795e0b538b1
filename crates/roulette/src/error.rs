use roulette_core::SessionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouletteError>;

#[derive(Debug, Error)]
pub enum RouletteError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: String,
        source: std::io::Error,
    },
}

impl RouletteError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Precondition failures are shown in the error color; everything else plain.
    #[must_use]
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Session(SessionError::NoOptions))
    }
}
