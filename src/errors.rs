//! The error type shared by all structures in this crate.

use std::io;

use thiserror::Error;

/// Errors reported by constructors, queries, and (de)serialization.
///
/// A query error leaves the structure untouched and still valid for
/// subsequent queries. A construction error means no structure was built.
#[derive(Debug, Error)]
pub enum Error {
    /// A query argument fell outside the structure's valid domain.
    #[error("index out of range: {index} not below {limit}")]
    IndexOutOfRange {
        /// The offending argument.
        index: u64,
        /// The exclusive upper bound of the valid domain.
        limit: u64,
    },

    /// A construction input violated a stated precondition.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A serialized buffer was corrupt or truncated.
    #[error("deserialization failed: {0}")]
    Deserialization(&'static str),

    /// An I/O error from the underlying sink or source.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` for this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn oob(index: u64, limit: u64) -> Self {
        Error::IndexOutOfRange { index, limit }
    }
}

/// The bit source ended in the middle of a codeword.
pub(crate) fn out_of_bits<A>() -> Result<A> {
    Err(Error::Deserialization("more bits expected"))
}
