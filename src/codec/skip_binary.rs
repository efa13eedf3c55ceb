//! Binary-format skip engine.
//!
//! Skips a value by reading raw bytes straight from a [`ByteSource`] and
//! applying the canonical binary layout, with no protocol dispatch:
//!
//! ```text
//! BOOL, BYTE      1 byte
//! I16             2 bytes
//! I32             4 bytes
//! I64, DOUBLE     8 bytes
//! STRING          len:i32 + len bytes
//! STRUCT          (type:u8 id:i16 value)* STOP:u8
//! MAP             key:u8 value:u8 size:i32 + size * (key, value)
//! SET, LIST       elem:u8 size:i32 + size * elem
//! ```
//!
//! All multi-byte integers are big-endian.

use crate::codec::size::decode_size;
use crate::codec::types::TType;
use crate::internal::error::{Error, Result};
use crate::internal::limits::SkipLimits;
use crate::transport::ByteSource;

const FIELD_ID_LEN: usize = 2;
const SIZE_LEN: usize = 4;
const MAP_HEADER_LEN: usize = 1 + 1 + SIZE_LEN;
const LIST_HEADER_LEN: usize = 1 + SIZE_LEN;

/// Skips one binary-encoded value of type `ttype` using the default
/// [`SkipLimits`].
pub fn skip_binary<S: ByteSource + ?Sized>(source: &mut S, ttype: TType) -> Result<usize> {
    skip_binary_with_limits(source, ttype, &SkipLimits::default())
}

/// Skips one binary-encoded value of type `ttype`, returning the number of
/// bytes consumed from `source`.
pub fn skip_binary_with_limits<S: ByteSource + ?Sized>(
    source: &mut S,
    ttype: TType,
    limits: &SkipLimits,
) -> Result<usize> {
    skip_value(source, ttype, limits, 0)
}

fn skip_value<S: ByteSource + ?Sized>(
    source: &mut S,
    ttype: TType,
    limits: &SkipLimits,
    depth: usize,
) -> Result<usize> {
    if let Some(width) = ttype.fixed_width() {
        source.discard(width)?;
        return Ok(width);
    }

    match ttype {
        TType::String => {
            let len = limits.check_string_len(read_size(source)?)?;
            source.discard(len)?;
            Ok(SIZE_LEN + len)
        }
        TType::Struct => {
            let depth = limits.descend(depth)?;
            let mut consumed = 0;
            loop {
                let field_type = TType::from_byte(source.read_u8()?)?;
                consumed += 1;
                if field_type == TType::Stop {
                    break;
                }
                source.discard(FIELD_ID_LEN)?;
                consumed += FIELD_ID_LEN;
                consumed += skip_value(source, field_type, limits, depth)?;
            }
            Ok(consumed)
        }
        TType::Map => {
            let depth = limits.descend(depth)?;
            let key_type = TType::from_byte(source.read_u8()?)?;
            let value_type = TType::from_byte(source.read_u8()?)?;
            let size = limits.check_container_size(read_size(source)?)?;
            tracing::trace!(key = ?key_type, value = ?value_type, size, "skipping binary map");
            let mut consumed = MAP_HEADER_LEN;
            for _ in 0..size {
                consumed += skip_value(source, key_type, limits, depth)?;
                consumed += skip_value(source, value_type, limits, depth)?;
            }
            Ok(consumed)
        }
        TType::Set | TType::List => {
            let depth = limits.descend(depth)?;
            let element_type = TType::from_byte(source.read_u8()?)?;
            let size = limits.check_container_size(read_size(source)?)?;
            tracing::trace!(container = ?ttype, element = ?element_type, size, "skipping binary collection");
            let mut consumed = LIST_HEADER_LEN;
            for _ in 0..size {
                consumed += skip_value(source, element_type, limits, depth)?;
            }
            Ok(consumed)
        }
        // STOP and VOID; fixed-width primitives returned above
        _ => Err(Error::UnexpectedType(ttype)),
    }
}

fn read_size<S: ByteSource + ?Sized>(source: &mut S) -> Result<usize> {
    let mut raw = [0u8; SIZE_LEN];
    source.read_exact_into(&mut raw)?;
    decode_size(raw)
}
