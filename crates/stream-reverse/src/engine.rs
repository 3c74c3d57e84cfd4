use std::cmp::min;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use log::{debug, trace};

use crate::error::{ReverseError, Result};

/// Working buffer size requested at construction, before any shrinking.
pub const MAX_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Smallest working buffer accepted before allocation failure is fatal.
pub const MIN_BUFFER_SIZE: usize = 4 * 1024;

/// Reverses byte streams through one owned working buffer.
///
/// The buffer is allocated once at construction and reused across
/// [`ReverseEngine::reverse`] calls. A seekable input of any size is
/// walked backward chunk by chunk; a non-seekable input must fit into
/// the buffer and is processed as a single chunk.
///
/// ## Examples
/// ```no_run
/// use std::fs::File;
/// use std::io;
///
/// use stream_reverse::ReverseEngine;
///
/// let mut engine = ReverseEngine::new().expect("Failed to allocate buffer");
/// let input = File::open("data.bin").expect("Failed to open input");
/// engine
///     .reverse(input, io::stdout().lock())
///     .expect("Failed to reverse input");
/// ```
pub struct ReverseEngine {
    buffer: Vec<u8>,
}

impl ReverseEngine {
    /// Creates an engine with the default buffer bounds.
    pub fn new() -> Result<Self> {
        Self::with_bounds(MAX_BUFFER_SIZE, MIN_BUFFER_SIZE)
    }

    /// Creates an engine whose buffer starts at `cap` bytes and shrinks
    /// toward `floor` while the allocator refuses the request.
    pub fn with_bounds(cap: usize, floor: usize) -> Result<Self> {
        // A zero-sized buffer could never make progress
        let cap = cap.max(1);
        let buffer = allocate_buffer(cap, floor.clamp(1, cap))?;
        Ok(ReverseEngine { buffer })
    }

    /// The achieved buffer capacity: the nominal chunk size for seekable
    /// inputs and the hard limit for non-seekable ones.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Writes the bytes of `input` to `output` in reverse order.
    ///
    /// The input is probed for random access exactly once: a successful
    /// seek to end-of-stream selects the chunked backward walk, a failed
    /// one the single bounded pass. The output is flushed before
    /// returning.
    pub fn reverse<R, W>(&mut self, mut input: R, mut output: W) -> Result<()>
    where
        R: Read + Seek,
        W: Write,
    {
        match input.seek(SeekFrom::End(0)) {
            Ok(len) => self.reverse_seekable(input, &mut output, len)?,
            Err(_) => self.reverse_unseekable(input, &mut output)?,
        }
        output.flush().map_err(ReverseError::Write)
    }

    /// Walks the input from the end backward, one buffer-sized chunk at
    /// a time, emitting each chunk reversed so the overall output is the
    /// byte-reversal of the whole stream.
    fn reverse_seekable<R, W>(
        &mut self,
        mut input: R,
        output: &mut W,
        len: u64,
    ) -> Result<()>
    where
        R: Read + Seek,
        W: Write,
    {
        debug!("input is seekable, {} bytes to reverse", len);

        let capacity = self.buffer.len() as u64;
        let mut remaining = len;

        // `remaining` is authoritative for termination; a failing seek
        // or a short read below means the stream lost bytes after the
        // end-of-stream probe.
        while remaining > 0 {
            let step = min(capacity, remaining);
            let start = remaining - step;

            input
                .seek(SeekFrom::Start(start))
                .map_err(|e| ReverseError::Seek(e.to_string()))?;

            let chunk = &mut self.buffer[..step as usize];
            input.read_exact(chunk).map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => ReverseError::Seek(
                    "input shrank while being reversed".to_string(),
                ),
                _ => ReverseError::Read(e),
            })?;

            chunk.reverse();
            output.write_all(chunk).map_err(ReverseError::Write)?;

            remaining = start;
            trace!("emitted {} bytes, {} left", step, remaining);
        }

        Ok(())
    }

    /// Captures the whole input into the working buffer in one bounded
    /// pass and emits it reversed. Inputs larger than the buffer are
    /// rejected.
    fn reverse_unseekable<R, W>(
        &mut self,
        mut input: R,
        output: &mut W,
    ) -> Result<()>
    where
        R: Read,
        W: Write,
    {
        debug!(
            "input is not seekable, buffering at most {} bytes",
            self.buffer.len()
        );

        let filled = fill_buffer(&mut input, &mut self.buffer)?;
        if filled == self.buffer.len() && !at_eof(&mut input)? {
            return Err(ReverseError::BufferTooSmall {
                capacity: self.buffer.len(),
            });
        }

        let chunk = &mut self.buffer[..filled];
        chunk.reverse();
        output.write_all(chunk).map_err(ReverseError::Write)
    }
}

/// Allocates the working buffer, halving the headroom above `floor`
/// until the allocator accepts the request. Failure at `floor` itself
/// is fatal.
fn allocate_buffer(cap: usize, floor: usize) -> Result<Vec<u8>> {
    let mut size = cap;
    loop {
        let mut buffer = Vec::new();
        if buffer.try_reserve_exact(size).is_ok() {
            buffer.resize(size, 0);
            if size < cap {
                debug!("working buffer shrunk to {} bytes", size);
            }
            return Ok(buffer);
        }
        if size <= floor {
            return Err(ReverseError::OutOfMemory { floor });
        }
        size = floor + ((size - floor) >> 1);
    }
}

/// Reads until `buf` is full or the stream ends, retrying interrupted
/// reads. Returns the number of bytes captured.
fn fill_buffer<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReverseError::Read(e)),
        }
    }
    Ok(filled)
}

/// One-byte probe distinguishing an exactly-full buffer from overflow.
fn at_eof<R: Read>(input: &mut R) -> Result<bool> {
    let mut probe = [0u8; 1];
    loop {
        match input.read(&mut probe) {
            Ok(0) => return Ok(true),
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReverseError::Read(e)),
        }
    }
}
