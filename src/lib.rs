// thrift-skip library entry point
//
// Skips serialized Thrift values of a wire-declared type without
// materializing them, either through any `ProtocolReader` or directly over
// the canonical binary layout.

pub mod codec;
pub mod internal;
pub mod protocol;
pub mod transport;

pub use codec::types::{TMessageType, TType};
pub use codec::{skip, skip_binary, skip_binary_with_limits, skip_with_limits};
pub use internal::error::{Error, Result};
pub use internal::limits::SkipLimits;
pub use protocol::{BinaryProtocol, BinaryProtocolConfig, ProtocolReader, ProtocolWriter};
pub use transport::{ByteSink, ByteSource, MemoryBuffer, ReadSource};
