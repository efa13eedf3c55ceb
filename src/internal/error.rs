use std::io;
use thiserror::Error;

use crate::codec::types::TType;

/// Unified error type for the thrift-skip library.
#[derive(Error, Debug)]
pub enum Error {
    /// The byte source ran dry before the requested number of bytes arrived.
    #[error("Short read: requested {requested} bytes, only {available} available")]
    ShortRead { requested: usize, available: usize },

    /// A type code outside the closed set of wire types.
    #[error("Unknown type tag: {0}")]
    UnknownType(u8),

    /// STOP or VOID found where a value was expected.
    #[error("Unexpected type tag {0:?} where a value was expected")]
    UnexpectedType(TType),

    /// A 4-byte size or length field decoded to a negative number.
    #[error("Negative size: {0}")]
    NegativeSize(i32),

    /// A size or length exceeded the configured ceiling.
    #[error("Size {size} exceeds limit {limit}")]
    SizeLimit { size: usize, limit: usize },

    /// Nesting went deeper than the configured ceiling.
    #[error("Nesting depth exceeds limit {0}")]
    DepthLimit(usize),

    /// Strict message header carrying the wrong version word.
    #[error("Bad protocol version: {0:#010x}")]
    BadVersion(u32),

    /// Error related to the protocol framing.
    #[error("Protocol Error: {0}")]
    ProtocolError(String),

    /// Error related to decoding a single value.
    #[error("Codec Error: {0}")]
    CodecError(String),

    /// Failure of the underlying reader or writer.
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),
}

/// A specialized `Result` type for thrift-skip operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns true if the error came from the byte source running out of data.
    pub fn is_short_read(&self) -> bool {
        matches!(self, Error::ShortRead { .. })
    }
}
