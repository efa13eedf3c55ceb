use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::internal::error::{Error, Result};
use crate::transport::{ByteSink, ByteSource};

/// In-memory FIFO buffer: writes append to the back, reads consume the front.
#[derive(Debug, Default, Clone)]
pub struct MemoryBuffer {
    buf: BytesMut,
    consumed: usize,
}

impl MemoryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a buffer pre-filled with `data`.
    pub fn with_data(data: &[u8]) -> Self {
        MemoryBuffer { buf: BytesMut::from(data), consumed: 0 }
    }

    /// Bytes still available for reading.
    pub fn available(&self) -> usize {
        self.buf.len()
    }

    /// Bytes read (or discarded) since creation.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Unread bytes, without consuming them.
    pub fn peek(&self) -> &[u8] {
        &self.buf
    }

    fn ensure(&self, requested: usize) -> Result<()> {
        if requested > self.buf.len() {
            return Err(Error::ShortRead { requested, available: self.buf.len() });
        }
        Ok(())
    }
}

impl From<Bytes> for MemoryBuffer {
    fn from(bytes: Bytes) -> Self {
        MemoryBuffer { buf: BytesMut::from(&bytes[..]), consumed: 0 }
    }
}

impl From<Vec<u8>> for MemoryBuffer {
    fn from(data: Vec<u8>) -> Self {
        MemoryBuffer { buf: BytesMut::from(&data[..]), consumed: 0 }
    }
}

impl ByteSource for MemoryBuffer {
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.ensure(buf.len())?;
        self.buf.copy_to_slice(buf);
        self.consumed += buf.len();
        Ok(())
    }

    fn read_exactly(&mut self, n: usize) -> Result<Bytes> {
        self.ensure(n)?;
        self.consumed += n;
        Ok(self.buf.split_to(n).freeze())
    }

    fn discard(&mut self, n: usize) -> Result<()> {
        self.ensure(n)?;
        self.buf.advance(n);
        self.consumed += n;
        Ok(())
    }
}

impl ByteSink for MemoryBuffer {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.buf.put_slice(data);
        Ok(())
    }
}

/// Plain slices act as sources; reading advances the slice.
impl ByteSource for &[u8] {
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        if buf.len() > self.len() {
            return Err(Error::ShortRead { requested: buf.len(), available: self.len() });
        }
        self.copy_to_slice(buf);
        Ok(())
    }

    fn discard(&mut self, n: usize) -> Result<()> {
        if n > self.len() {
            return Err(Error::ShortRead { requested: n, available: self.len() });
        }
        self.advance(n);
        Ok(())
    }
}
