//! Closable readers and the discard endpoint.

use std::io::{self, Read, Write};

/// A readable source that owns a releasable resource.
///
/// `Multi` calls `close` exactly once when the source is replaced or the
/// instance is closed. Dropping without `close` only drops the reader.
pub trait ReadCloser: Read + Send {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ReadCloser for Box<dyn ReadCloser> {
    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Adapts any reader into a [`ReadCloser`] whose close does nothing.
#[derive(Debug, Default)]
pub struct NopCloser<R> {
    inner: R,
}

impl<R: Read + Send> NopCloser<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Send> Read for NopCloser<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl<R: Read + Send> ReadCloser for NopCloser<R> {}

/// Reads nothing, accepts everything, closes without effect.
///
/// Installed as the input until a real one is set, and used as the sink
/// when no destination is registered.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardCloser;

impl Read for DiscardCloser {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }
}

impl Write for DiscardCloser {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ReadCloser for DiscardCloser {}
