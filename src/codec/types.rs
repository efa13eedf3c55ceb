use crate::internal::error::{Error, Result};

/// Wire type codes of the Thrift binary protocol family.
///
/// The numeric values are fixed by the wire format and must not change.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TType {
    Stop = 0,
    Void = 1,
    Bool = 2,
    Byte = 3,
    Double = 4,
    I16 = 6,
    I32 = 8,
    I64 = 10,
    String = 11,
    Struct = 12,
    Map = 13,
    Set = 14,
    List = 15,
}

impl TType {
    /// Converts a wire byte into a TType.
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(TType::Stop),
            1 => Ok(TType::Void),
            2 => Ok(TType::Bool),
            3 => Ok(TType::Byte),
            4 => Ok(TType::Double),
            6 => Ok(TType::I16),
            8 => Ok(TType::I32),
            10 => Ok(TType::I64),
            11 => Ok(TType::String),
            12 => Ok(TType::Struct),
            13 => Ok(TType::Map),
            14 => Ok(TType::Set),
            15 => Ok(TType::List),
            _ => Err(Error::UnknownType(byte)),
        }
    }

    /// Encoded width of fixed-size primitives, `None` for everything else.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            TType::Bool | TType::Byte => Some(1),
            TType::I16 => Some(2),
            TType::I32 => Some(4),
            TType::I64 | TType::Double => Some(8),
            _ => None,
        }
    }
}

impl TryFrom<u8> for TType {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        TType::from_byte(byte)
    }
}

impl From<TType> for u8 {
    fn from(ttype: TType) -> u8 {
        ttype as u8
    }
}

/// Kinds of message carried in a message header.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TMessageType {
    Call = 1,
    Reply = 2,
    Exception = 3,
    Oneway = 4,
}

impl TMessageType {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            1 => Ok(TMessageType::Call),
            2 => Ok(TMessageType::Reply),
            3 => Ok(TMessageType::Exception),
            4 => Ok(TMessageType::Oneway),
            _ => Err(Error::ProtocolError(format!("Unknown message type: {}", byte))),
        }
    }
}

/// Header preceding every RPC message.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MessageHeader {
    pub name: String,
    pub message_type: TMessageType,
    pub sequence_id: i32,
}

/// Header of a single struct field. `id` is 0 for the STOP marker.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FieldHeader {
    pub field_type: TType,
    pub id: i16,
}

impl FieldHeader {
    pub fn new(field_type: TType, id: i16) -> Self {
        FieldHeader { field_type, id }
    }

    pub fn stop() -> Self {
        FieldHeader { field_type: TType::Stop, id: 0 }
    }

    pub fn is_stop(&self) -> bool {
        self.field_type == TType::Stop
    }
}

/// Map header. `size` has already been checked for sign.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct MapHeader {
    pub key_type: TType,
    pub value_type: TType,
    pub size: usize,
}

/// List header.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ListHeader {
    pub element_type: TType,
    pub size: usize,
}

/// Set header, same shape as a list on the wire.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SetHeader {
    pub element_type: TType,
    pub size: usize,
}
