//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! degenerate geometry, exhausted rejection sampling, invalid solver configuration,
//! and unknown region or token names.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("no interior point found after {attempts} attempts")]
    Sampling { attempts: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown region '{name}'")]
    UnknownRegion { name: String },

    #[error("unknown token '{name}'")]
    UnknownToken { name: String },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
