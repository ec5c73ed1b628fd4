//! Error types for octomesh

use thiserror::Error;

/// Main error type for octomesh operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

/// Result type alias for octomesh operations
pub type Result<T> = std::result::Result<T, Error>;
