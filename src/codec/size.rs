use byteorder::{BigEndian, ByteOrder};

use crate::internal::error::{Error, Result};

/// Decodes a 4-byte big-endian size or length field.
///
/// The field is a signed 32-bit integer on the wire; negative values are
/// malformed and rejected rather than reinterpreted as huge counts.
pub fn decode_size(raw: [u8; 4]) -> Result<usize> {
    size_from_i32(BigEndian::read_i32(&raw))
}

/// Validates an already-decoded signed size.
pub fn size_from_i32(value: i32) -> Result<usize> {
    if value < 0 {
        return Err(Error::NegativeSize(value));
    }
    Ok(value as usize)
}

/// Applies an optional ceiling to a size.
pub fn check_limit(size: usize, limit: Option<usize>) -> Result<usize> {
    match limit {
        Some(limit) if size > limit => Err(Error::SizeLimit { size, limit }),
        _ => Ok(size),
    }
}

/// Converts a size for writing, rejecting values that do not fit in an i32.
pub fn encode_size(size: usize) -> Result<i32> {
    i32::try_from(size).map_err(|_| Error::SizeLimit { size, limit: i32::MAX as usize })
}
