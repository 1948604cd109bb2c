//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! Upstream model failures are absent here: they are folded into
//! [`crate::ai::ModelResponse`] and never surface as an `Error`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;
