//! Byte-level collaborators consumed by the codec.
//!
//! A [`ByteSource`] hands out exactly the number of bytes requested or fails;
//! it never returns a short read. A [`ByteSink`] accepts whole buffers.

pub mod memory;
pub mod read;

use bytes::{BufMut, Bytes, BytesMut};

use crate::internal::error::{Error, Result};

pub use memory::MemoryBuffer;
pub use read::ReadSource;

// Scratch size used by the default `read_exactly` and `discard`.
const DISCARD_CHUNK: usize = 512;

// Reports a short read against the whole request rather than the chunk.
fn widen_short_read(err: Error, requested: usize, done: usize) -> Error {
    match err {
        Error::ShortRead { available, .. } => Error::ShortRead {
            requested,
            available: done + available,
        },
        other => other,
    }
}

/// Sequential, blocking, exact-length byte reader.
pub trait ByteSource {
    /// Fills `buf` completely or fails with [`Error::ShortRead`].
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Reads exactly `n` bytes into a new buffer.
    ///
    /// The buffer grows as data arrives, so a hostile `n` cannot force a
    /// large allocation up front.
    fn read_exactly(&mut self, n: usize) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(n.min(DISCARD_CHUNK));
        let mut scratch = [0u8; DISCARD_CHUNK];
        while buf.len() < n {
            let chunk = (n - buf.len()).min(DISCARD_CHUNK);
            self.read_exact_into(&mut scratch[..chunk])
                .map_err(|e| widen_short_read(e, n, buf.len()))?;
            buf.put_slice(&scratch[..chunk]);
        }
        Ok(buf.freeze())
    }

    /// Consumes and drops exactly `n` bytes.
    fn discard(&mut self, n: usize) -> Result<()> {
        let mut scratch = [0u8; DISCARD_CHUNK];
        let mut remaining = n;
        while remaining > 0 {
            let chunk = remaining.min(DISCARD_CHUNK);
            self.read_exact_into(&mut scratch[..chunk])
                .map_err(|e| widen_short_read(e, n, n - remaining))?;
            remaining -= chunk;
        }
        Ok(())
    }

    fn read_u8(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_exact_into(&mut byte)?;
        Ok(byte[0])
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        (**self).read_exact_into(buf)
    }

    fn read_exactly(&mut self, n: usize) -> Result<Bytes> {
        (**self).read_exactly(n)
    }

    fn discard(&mut self, n: usize) -> Result<()> {
        (**self).discard(n)
    }
}

/// Destination for encoded bytes.
pub trait ByteSink {
    fn write_all(&mut self, data: &[u8]) -> Result<()>;
}

impl ByteSink for Vec<u8> {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.extend_from_slice(data);
        Ok(())
    }
}

impl ByteSink for BytesMut {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.put_slice(data);
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write_all(&mut self, data: &[u8]) -> Result<()> {
        (**self).write_all(data)
    }
}
