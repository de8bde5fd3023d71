//! Standard stream capture.
//!
//! Instead of redirecting the process streams, the tool writes through
//! [`TeeWriter`]s handed out by the invocation. Each write goes to the real
//! stream first and is then copied into an in-memory buffer that ends up in
//! the execution log.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared in-memory copy of everything written through a tee.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer(Arc<Mutex<Vec<u8>>>);

impl CaptureBuffer {
    fn append(&self, bytes: &[u8]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
    }

    /// Returns the captured text, replacing invalid UTF-8.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

/// Forwards writes to a primary stream and copies them into a buffer.
#[derive(Debug)]
pub struct TeeWriter<W> {
    primary: W,
    copy: Option<CaptureBuffer>,
}

impl<W: Write> TeeWriter<W> {
    /// Creates a tee. Without a buffer it only forwards.
    pub const fn new(primary: W, copy: Option<CaptureBuffer>) -> Self {
        Self { primary, copy }
    }
}

impl<W: Write> Write for TeeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.primary.write(buf)?;
        if let Some(copy) = &self.copy {
            copy.append(&buf[..written]);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.primary.flush()
    }
}

/// Buffers for both standard streams.
#[derive(Debug, Clone, Default)]
pub struct StreamCapture {
    /// Copy of standard output
    pub stdout: CaptureBuffer,
    /// Copy of standard error
    pub stderr: CaptureBuffer,
}

impl StreamCapture {
    /// Creates empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}
