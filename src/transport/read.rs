use std::io::{self, Read};

use crate::internal::error::{Error, Result};
use bytes::Bytes;

use crate::transport::ByteSource;

/// Adapts any [`io::Read`] (file, socket, pipe) into a [`ByteSource`].
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
    consumed: usize,
}

impl<R: Read> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        ReadSource { inner, consumed: 0 }
    }

    /// Bytes read from the inner reader so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl<R: Read> ByteSource for ReadSource<R> {
    fn read_exact_into(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.consumed += filled;
                    return Err(Error::ShortRead { requested: buf.len(), available: filled });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.consumed += filled;
                    return Err(e.into());
                }
            }
        }
        self.consumed += filled;
        Ok(())
    }

    // Grows with the data actually delivered instead of trusting `n`.
    fn read_exactly(&mut self, n: usize) -> Result<Bytes> {
        let mut buf = Vec::new();
        let read = (&mut self.inner).take(n as u64).read_to_end(&mut buf);
        self.consumed += buf.len();
        read?;
        if buf.len() < n {
            return Err(Error::ShortRead { requested: n, available: buf.len() });
        }
        Ok(Bytes::from(buf))
    }
}
