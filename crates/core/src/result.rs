//! Core results and error types

use thiserror::Error;

/// Core error type encompassing all core module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read file at the specified path.
    #[error("could not read file '{path}': {source}")]
    FileRead {
        /// The path to the file that could not be read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A record description could not be parsed.
    #[error("invalid record description: {0}")]
    Json(#[from] serde_json::Error),

    /// A proposed declaration order is not a permutation of the record's declarations.
    #[error("invalid declaration order: {0}")]
    InvalidOrder(String),

    /// Invalid hexadecimal in seed.
    #[error("invalid hexadecimal in seed")]
    InvalidSeedHex,

    /// Invalid seed length.
    #[error("invalid seed length: expected 64 hex chars, got {0}")]
    InvalidSeedLength(usize),

    /// Bucket capacity must be at least one bit.
    #[error("bucket capacity must be non-zero")]
    ZeroCapacity,
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
