//! Chunked stream copier with progress accounting
//!
//! Copies a reader into a writer in fixed 32 KiB chunks. After a chunk is
//! written, and at most once per reporting interval, the current byte count
//! is handed to a [`ProgressSink`].

use crate::progress::ProgressSink;
use std::io::{self, ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Copy chunk size (32 KiB)
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Minimum time between two progress reports
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Stream copier
#[derive(Debug, Clone)]
pub struct StreamCopier {
    chunk_size: usize,
    interval: Duration,
}

impl Default for StreamCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamCopier {
    /// Copier with the standard chunk size and reporting interval
    pub fn new() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            interval: PROGRESS_INTERVAL,
        }
    }

    /// Override the reporting interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Chunk size in bytes
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Copy `src` into `dst` until end of stream
    ///
    /// `total` is the expected size when known. Returns the number of
    /// bytes written. A destination that stops accepting bytes fails with
    /// `WriteZero`; any other read or write error is returned as-is.
    pub fn copy<R, W>(
        &self,
        src: &mut R,
        dst: &mut W,
        total: Option<u64>,
        mut progress: Option<&mut dyn ProgressSink>,
    ) -> io::Result<u64>
    where
        R: Read + ?Sized,
        W: Write + ?Sized,
    {
        let mut buf = vec![0u8; self.chunk_size];
        let mut written = 0u64;
        let mut last_update = Instant::now();

        loop {
            let nr = match src.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            write_chunk(dst, &buf[..nr])?;
            written += nr as u64;

            if let Some(sink) = progress.as_deref_mut() {
                if last_update.elapsed() >= self.interval {
                    sink.update(written, total);
                    last_update = Instant::now();
                }
            }
        }

        dst.flush()?;

        if let Some(sink) = progress.as_deref_mut() {
            sink.finish(written);
        }

        Ok(written)
    }
}

/// Write a whole chunk, failing if the destination accepts nothing
fn write_chunk<W: Write + ?Sized>(dst: &mut W, mut chunk: &[u8]) -> io::Result<()> {
    while !chunk.is_empty() {
        match dst.write(chunk) {
            Ok(0) => {
                return Err(io::Error::new(ErrorKind::WriteZero, "short write"));
            }
            Ok(n) => chunk = &chunk[n..],
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Copy with the default copier
pub fn copy_with_progress<R, W>(
    src: &mut R,
    dst: &mut W,
    total: Option<u64>,
    progress: Option<&mut dyn ProgressSink>,
) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    StreamCopier::new().copy(src, dst, total, progress)
}
