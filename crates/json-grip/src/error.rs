use thiserror::Error;

/// Unified error type for every fallible operation in the crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation was applied to a value whose variant does not support it.
    #[error("type error: {0}")]
    Type(String),
    /// Text or binary input was rejected.
    #[error("parse error: {0}")]
    Parse(String),
    /// A range-checked accessor was given an index outside the container.
    #[error("out of range: {0}")]
    OutOfRange(String),
    /// An iterator was dereferenced or advanced past its end.
    #[error("invalid iterator: {0}")]
    InvalidIterator(String),
    /// Internal consistency failure. Indicates a defect in this crate, not a
    /// data-dependent condition.
    #[error("internal error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
