//! Typed read and write primitives of a Thrift protocol.
//!
//! Every primitive reports how many wire bytes it consumed or produced, so
//! generic code such as [`crate::codec::skip`] can account for the stream
//! without knowing the concrete encoding.

pub mod binary;

use bytes::Bytes;

use crate::codec::size::check_limit;
use crate::codec::skip;
use crate::codec::types::{FieldHeader, ListHeader, MapHeader, MessageHeader, SetHeader, TType};
use crate::internal::error::Result;
use crate::internal::limits::SkipLimits;

pub use binary::{BinaryProtocol, BinaryProtocolConfig};

/// Read half of a protocol.
///
/// Container headers come back with sizes already validated as
/// non-negative.
pub trait ProtocolReader {
    fn read_message_begin(&mut self) -> Result<(MessageHeader, usize)>;
    fn read_message_end(&mut self) -> Result<usize>;

    fn read_struct_begin(&mut self) -> Result<usize>;
    fn read_struct_end(&mut self) -> Result<usize>;

    fn read_field_begin(&mut self) -> Result<(FieldHeader, usize)>;
    fn read_field_end(&mut self) -> Result<usize>;

    fn read_map_begin(&mut self) -> Result<(MapHeader, usize)>;
    fn read_map_end(&mut self) -> Result<usize>;

    fn read_list_begin(&mut self) -> Result<(ListHeader, usize)>;
    fn read_list_end(&mut self) -> Result<usize>;

    fn read_set_begin(&mut self) -> Result<(SetHeader, usize)>;
    fn read_set_end(&mut self) -> Result<usize>;

    fn read_bool(&mut self) -> Result<(bool, usize)>;
    fn read_byte(&mut self) -> Result<(i8, usize)>;
    fn read_i16(&mut self) -> Result<(i16, usize)>;
    fn read_i32(&mut self) -> Result<(i32, usize)>;
    fn read_i64(&mut self) -> Result<(i64, usize)>;
    fn read_double(&mut self) -> Result<(f64, usize)>;

    /// Reads a STRING value that must be valid UTF-8.
    fn read_string(&mut self) -> Result<(String, usize)>;

    /// Reads a STRING value as raw bytes.
    fn read_binary(&mut self) -> Result<(Bytes, usize)>;

    /// Consumes one STRING value without keeping it, failing with
    /// [`crate::Error::SizeLimit`] when its length exceeds `max_len`.
    ///
    /// The default reads the value first; codecs that see the length prefix
    /// should check it before touching the payload.
    fn skip_string(&mut self, max_len: Option<usize>) -> Result<usize> {
        let (data, consumed) = self.read_binary()?;
        check_limit(data.len(), max_len)?;
        Ok(consumed)
    }

    /// Skips one value of type `ttype`, returning the bytes consumed.
    fn skip(&mut self, ttype: TType) -> Result<usize> {
        skip::skip(self, ttype)
    }

    fn skip_with_limits(&mut self, ttype: TType, limits: &SkipLimits) -> Result<usize> {
        skip::skip_with_limits(self, ttype, limits)
    }
}

/// Write half of a protocol. Each call returns the bytes written.
pub trait ProtocolWriter {
    fn write_message_begin(&mut self, header: &MessageHeader) -> Result<usize>;
    fn write_message_end(&mut self) -> Result<usize>;

    fn write_struct_begin(&mut self, name: &str) -> Result<usize>;
    fn write_struct_end(&mut self) -> Result<usize>;

    fn write_field_begin(&mut self, name: &str, field_type: TType, id: i16) -> Result<usize>;
    fn write_field_end(&mut self) -> Result<usize>;
    fn write_field_stop(&mut self) -> Result<usize>;

    fn write_map_begin(&mut self, header: &MapHeader) -> Result<usize>;
    fn write_map_end(&mut self) -> Result<usize>;

    fn write_list_begin(&mut self, header: &ListHeader) -> Result<usize>;
    fn write_list_end(&mut self) -> Result<usize>;

    fn write_set_begin(&mut self, header: &SetHeader) -> Result<usize>;
    fn write_set_end(&mut self) -> Result<usize>;

    fn write_bool(&mut self, value: bool) -> Result<usize>;
    fn write_byte(&mut self, value: i8) -> Result<usize>;
    fn write_i16(&mut self, value: i16) -> Result<usize>;
    fn write_i32(&mut self, value: i32) -> Result<usize>;
    fn write_i64(&mut self, value: i64) -> Result<usize>;
    fn write_double(&mut self, value: f64) -> Result<usize>;
    fn write_string(&mut self, value: &str) -> Result<usize>;
    fn write_binary(&mut self, value: &[u8]) -> Result<usize>;
}
