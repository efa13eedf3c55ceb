// Codec module for the Thrift binary protocol family

pub mod size;
pub mod skip;
pub mod skip_binary;
pub mod types;

pub use skip::{skip, skip_with_limits};
pub use skip_binary::{skip_binary, skip_binary_with_limits};
pub use types::{FieldHeader, ListHeader, MapHeader, MessageHeader, SetHeader, TMessageType, TType};
