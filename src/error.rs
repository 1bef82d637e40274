//! Error type for the countdown crate.
//!
//! Running a countdown never fails. A stale or negative timestamp is just
//! rendered as late. Errors only surface while loading configuration.

use thiserror::Error;

/// Errors produced while setting up a presenter.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unparseable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
