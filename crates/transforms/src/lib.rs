pub mod bucket;
pub mod builder;
pub mod randomize;
pub mod randomizer;
pub mod reorganizer;
pub mod shuffler;

pub use randomize::{randomize_layout, Partition};
pub use reorganizer::{CacheLine, Plain, Reorganizer, Strategy};

use thiserror::Error;

/// Transform error type encompassing all transform module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Core operation failed.
    #[error("core operation failed: {0}")]
    Core(#[from] shroud_core::Error),

    /// No reorganizer is registered under this name.
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Transform result type
pub type Result<T> = std::result::Result<T, Error>;
