//! Error types for meshpick

use thiserror::Error;

/// Main error type for meshpick operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Visualization error: {0}")]
    Visualization(String),
}

/// Result type alias for meshpick operations
pub type Result<T> = std::result::Result<T, Error>;
