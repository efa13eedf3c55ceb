//! Protocol-level skip engine.
//!
//! Walks a value of a wire-declared type through the typed primitives of a
//! [`ProtocolReader`], discarding every decoded value and summing the byte
//! counts the primitives report. Works for any conforming protocol.

use crate::codec::types::TType;
use crate::internal::error::{Error, Result};
use crate::internal::limits::SkipLimits;
use crate::protocol::ProtocolReader;

/// Skips one value of type `ttype` using the default [`SkipLimits`].
pub fn skip<P: ProtocolReader + ?Sized>(proto: &mut P, ttype: TType) -> Result<usize> {
    skip_with_limits(proto, ttype, &SkipLimits::default())
}

/// Skips one value of type `ttype`, returning the number of wire bytes
/// consumed.
///
/// STOP and VOID are not values and fail with [`Error::UnexpectedType`].
/// Any error leaves the protocol at an undefined position.
pub fn skip_with_limits<P: ProtocolReader + ?Sized>(
    proto: &mut P,
    ttype: TType,
    limits: &SkipLimits,
) -> Result<usize> {
    skip_value(proto, ttype, limits, 0)
}

fn skip_value<P: ProtocolReader + ?Sized>(
    proto: &mut P,
    ttype: TType,
    limits: &SkipLimits,
    depth: usize,
) -> Result<usize> {
    match ttype {
        TType::Bool => proto.read_bool().map(|(_, n)| n),
        TType::Byte => proto.read_byte().map(|(_, n)| n),
        TType::I16 => proto.read_i16().map(|(_, n)| n),
        TType::I32 => proto.read_i32().map(|(_, n)| n),
        TType::I64 => proto.read_i64().map(|(_, n)| n),
        TType::Double => proto.read_double().map(|(_, n)| n),
        // Raw bytes: STRING also carries binary payloads that are not UTF-8.
        TType::String => proto.skip_string(limits.max_string_len),
        TType::Struct => {
            let depth = limits.descend(depth)?;
            let mut consumed = proto.read_struct_begin()?;
            loop {
                let (field, n) = proto.read_field_begin()?;
                consumed += n;
                if field.is_stop() {
                    break;
                }
                consumed += skip_value(proto, field.field_type, limits, depth)?;
                consumed += proto.read_field_end()?;
            }
            consumed += proto.read_struct_end()?;
            Ok(consumed)
        }
        TType::Map => {
            let depth = limits.descend(depth)?;
            let (header, mut consumed) = proto.read_map_begin()?;
            let size = limits.check_container_size(header.size)?;
            tracing::trace!(key = ?header.key_type, value = ?header.value_type, size, "skipping map");
            for _ in 0..size {
                consumed += skip_value(proto, header.key_type, limits, depth)?;
                consumed += skip_value(proto, header.value_type, limits, depth)?;
            }
            consumed += proto.read_map_end()?;
            Ok(consumed)
        }
        TType::Set => {
            let depth = limits.descend(depth)?;
            let (header, mut consumed) = proto.read_set_begin()?;
            let size = limits.check_container_size(header.size)?;
            tracing::trace!(element = ?header.element_type, size, "skipping set");
            for _ in 0..size {
                consumed += skip_value(proto, header.element_type, limits, depth)?;
            }
            consumed += proto.read_set_end()?;
            Ok(consumed)
        }
        TType::List => {
            let depth = limits.descend(depth)?;
            let (header, mut consumed) = proto.read_list_begin()?;
            let size = limits.check_container_size(header.size)?;
            tracing::trace!(element = ?header.element_type, size, "skipping list");
            for _ in 0..size {
                consumed += skip_value(proto, header.element_type, limits, depth)?;
            }
            consumed += proto.read_list_end()?;
            Ok(consumed)
        }
        TType::Stop | TType::Void => Err(Error::UnexpectedType(ttype)),
    }
}
