use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

use crate::codec::size::{check_limit, decode_size, encode_size};
use crate::codec::skip_binary;
use crate::codec::types::{
    FieldHeader, ListHeader, MapHeader, MessageHeader, SetHeader, TMessageType, TType,
};
use crate::internal::error::{Error, Result};
use crate::internal::limits::SkipLimits;
use crate::protocol::{ProtocolReader, ProtocolWriter};
use crate::transport::{ByteSink, ByteSource};

/// Version word of strict message headers, OR-ed with the message type.
pub const VERSION_1: u32 = 0x8001_0000;
pub const VERSION_MASK: u32 = 0xffff_0000;

/// Settings of the binary protocol.
///
/// `strict_read` rejects message headers without a version word,
/// `strict_write` emits one. The limits bound string lengths and
/// container sizes on the read side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryProtocolConfig {
    pub strict_read: bool,
    pub strict_write: bool,
    pub string_limit: Option<usize>,
    pub container_limit: Option<usize>,
}

impl Default for BinaryProtocolConfig {
    fn default() -> Self {
        BinaryProtocolConfig {
            strict_read: false,
            strict_write: true,
            string_limit: None,
            container_limit: None,
        }
    }
}

/// The canonical Thrift binary protocol over a byte transport.
#[derive(Debug)]
pub struct BinaryProtocol<T> {
    transport: T,
    config: BinaryProtocolConfig,
}

impl<T> BinaryProtocol<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, BinaryProtocolConfig::default())
    }

    pub fn with_config(transport: T, config: BinaryProtocolConfig) -> Self {
        BinaryProtocol { transport, config }
    }

    pub fn config(&self) -> &BinaryProtocolConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Skip limits derived from this protocol's read limits.
    pub fn skip_limits(&self) -> SkipLimits {
        SkipLimits {
            max_container_size: self.config.container_limit,
            max_string_len: self.config.string_limit,
            ..SkipLimits::default()
        }
    }
}

impl<T: ByteSource> BinaryProtocol<T> {
    /// Skips one value straight off the transport, bypassing the typed
    /// primitives. Returns the same count as [`ProtocolReader::skip`].
    pub fn skip_binary(&mut self, ttype: TType) -> Result<usize> {
        let limits = self.skip_limits();
        skip_binary::skip_binary_with_limits(&mut self.transport, ttype, &limits)
    }

    pub fn skip_binary_with_limits(&mut self, ttype: TType, limits: &SkipLimits) -> Result<usize> {
        skip_binary::skip_binary_with_limits(&mut self.transport, ttype, limits)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut raw = [0u8; N];
        self.transport.read_exact_into(&mut raw)?;
        Ok(raw)
    }

    fn read_type(&mut self) -> Result<TType> {
        TType::from_byte(self.transport.read_u8()?)
    }

    fn read_size(&mut self, limit: Option<usize>) -> Result<usize> {
        let size = decode_size(self.read_array()?)?;
        check_limit(size, limit)
    }

    fn read_payload(&mut self) -> Result<(Bytes, usize)> {
        let limit = self.config.string_limit;
        let len = self.read_size(limit)?;
        let data = self.transport.read_exactly(len)?;
        Ok((data, 4 + len))
    }
}

fn utf8(data: Bytes) -> Result<String> {
    String::from_utf8(data.to_vec())
        .map_err(|e| Error::CodecError(format!("Invalid UTF-8 string: {}", e)))
}

impl<T: ByteSource> ProtocolReader for BinaryProtocol<T> {
    fn read_message_begin(&mut self) -> Result<(MessageHeader, usize)> {
        let (first, mut consumed) = self.read_i32()?;

        let (name, message_type) = if first < 0 {
            let word = first as u32;
            if word & VERSION_MASK != VERSION_1 {
                return Err(Error::BadVersion(word));
            }
            let message_type = TMessageType::from_byte((word & 0xff) as u8)?;
            let (name, n) = self.read_string()?;
            consumed += n;
            (name, message_type)
        } else if self.config.strict_read {
            return Err(Error::ProtocolError(
                "Missing version in message header, old client?".to_string(),
            ));
        } else {
            // Old-style header: the first word is the name length.
            let len = check_limit(first as usize, self.config.string_limit)?;
            let name = utf8(self.transport.read_exactly(len)?)?;
            consumed += len;
            let (message_type, n) = self.read_byte()?;
            consumed += n;
            (name, TMessageType::from_byte(message_type as u8)?)
        };

        let (sequence_id, n) = self.read_i32()?;
        consumed += n;
        Ok((MessageHeader { name, message_type, sequence_id }, consumed))
    }

    fn read_message_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn read_struct_begin(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn read_struct_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn read_field_begin(&mut self) -> Result<(FieldHeader, usize)> {
        let field_type = self.read_type()?;
        if field_type == TType::Stop {
            return Ok((FieldHeader::stop(), 1));
        }
        let (id, n) = self.read_i16()?;
        Ok((FieldHeader::new(field_type, id), 1 + n))
    }

    fn read_field_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn read_map_begin(&mut self) -> Result<(MapHeader, usize)> {
        let key_type = self.read_type()?;
        let value_type = self.read_type()?;
        let size = self.read_size(self.config.container_limit)?;
        Ok((MapHeader { key_type, value_type, size }, 6))
    }

    fn read_map_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn read_list_begin(&mut self) -> Result<(ListHeader, usize)> {
        let element_type = self.read_type()?;
        let size = self.read_size(self.config.container_limit)?;
        Ok((ListHeader { element_type, size }, 5))
    }

    fn read_list_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn read_set_begin(&mut self) -> Result<(SetHeader, usize)> {
        let element_type = self.read_type()?;
        let size = self.read_size(self.config.container_limit)?;
        Ok((SetHeader { element_type, size }, 5))
    }

    fn read_set_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn read_bool(&mut self) -> Result<(bool, usize)> {
        Ok((self.transport.read_u8()? != 0, 1))
    }

    fn read_byte(&mut self) -> Result<(i8, usize)> {
        Ok((self.transport.read_u8()? as i8, 1))
    }

    fn read_i16(&mut self) -> Result<(i16, usize)> {
        Ok((BigEndian::read_i16(&self.read_array::<2>()?), 2))
    }

    fn read_i32(&mut self) -> Result<(i32, usize)> {
        Ok((BigEndian::read_i32(&self.read_array::<4>()?), 4))
    }

    fn read_i64(&mut self) -> Result<(i64, usize)> {
        Ok((BigEndian::read_i64(&self.read_array::<8>()?), 8))
    }

    fn read_double(&mut self) -> Result<(f64, usize)> {
        Ok((BigEndian::read_f64(&self.read_array::<8>()?), 8))
    }

    fn read_string(&mut self) -> Result<(String, usize)> {
        let (data, consumed) = self.read_payload()?;
        Ok((utf8(data)?, consumed))
    }

    fn read_binary(&mut self) -> Result<(Bytes, usize)> {
        self.read_payload()
    }

    fn skip_string(&mut self, max_len: Option<usize>) -> Result<usize> {
        let limit = self.config.string_limit;
        let len = check_limit(self.read_size(limit)?, max_len)?;
        self.transport.discard(len)?;
        Ok(4 + len)
    }
}

impl<T: ByteSink> BinaryProtocol<T> {
    fn write_raw(&mut self, data: &[u8]) -> Result<usize> {
        self.transport.write_all(data)?;
        Ok(data.len())
    }

    fn write_type(&mut self, ttype: TType) -> Result<usize> {
        self.write_raw(&[ttype as u8])
    }

    fn write_size(&mut self, size: usize) -> Result<usize> {
        let size = encode_size(size)?;
        self.write_i32(size)
    }
}

impl<T: ByteSink> ProtocolWriter for BinaryProtocol<T> {
    fn write_message_begin(&mut self, header: &MessageHeader) -> Result<usize> {
        let mut written = 0;
        if self.config.strict_write {
            let word = VERSION_1 | header.message_type as u32;
            written += self.write_i32(word as i32)?;
            written += self.write_string(&header.name)?;
        } else {
            written += self.write_string(&header.name)?;
            written += self.write_byte(header.message_type as u8 as i8)?;
        }
        written += self.write_i32(header.sequence_id)?;
        Ok(written)
    }

    fn write_message_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn write_struct_begin(&mut self, _name: &str) -> Result<usize> {
        Ok(0)
    }

    fn write_struct_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn write_field_begin(&mut self, _name: &str, field_type: TType, id: i16) -> Result<usize> {
        Ok(self.write_type(field_type)? + self.write_i16(id)?)
    }

    fn write_field_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn write_field_stop(&mut self) -> Result<usize> {
        self.write_type(TType::Stop)
    }

    fn write_map_begin(&mut self, header: &MapHeader) -> Result<usize> {
        Ok(self.write_type(header.key_type)?
            + self.write_type(header.value_type)?
            + self.write_size(header.size)?)
    }

    fn write_map_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn write_list_begin(&mut self, header: &ListHeader) -> Result<usize> {
        Ok(self.write_type(header.element_type)? + self.write_size(header.size)?)
    }

    fn write_list_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn write_set_begin(&mut self, header: &SetHeader) -> Result<usize> {
        Ok(self.write_type(header.element_type)? + self.write_size(header.size)?)
    }

    fn write_set_end(&mut self) -> Result<usize> {
        Ok(0)
    }

    fn write_bool(&mut self, value: bool) -> Result<usize> {
        self.write_raw(&[value as u8])
    }

    fn write_byte(&mut self, value: i8) -> Result<usize> {
        self.write_raw(&[value as u8])
    }

    fn write_i16(&mut self, value: i16) -> Result<usize> {
        let mut buf = [0u8; 2];
        BigEndian::write_i16(&mut buf, value);
        self.write_raw(&buf)
    }

    fn write_i32(&mut self, value: i32) -> Result<usize> {
        let mut buf = [0u8; 4];
        BigEndian::write_i32(&mut buf, value);
        self.write_raw(&buf)
    }

    fn write_i64(&mut self, value: i64) -> Result<usize> {
        let mut buf = [0u8; 8];
        BigEndian::write_i64(&mut buf, value);
        self.write_raw(&buf)
    }

    fn write_double(&mut self, value: f64) -> Result<usize> {
        let mut buf = [0u8; 8];
        BigEndian::write_f64(&mut buf, value);
        self.write_raw(&buf)
    }

    fn write_string(&mut self, value: &str) -> Result<usize> {
        self.write_binary(value.as_bytes())
    }

    fn write_binary(&mut self, value: &[u8]) -> Result<usize> {
        let written = self.write_size(value.len())?;
        Ok(written + self.write_raw(value)?)
    }
}
