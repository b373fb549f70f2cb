//! Chunked sample source over any `Read`

use crate::constants::READ_CHUNK_SIZE;
use crate::error::DecodeError;
use std::io::{ErrorKind, Read};

#[cfg(feature = "logging")]
use tracing::{trace, warn};

/// Pulls raw samples from a reader one chunk at a time
///
/// Yields each byte of the capture in order. A read error is yielded once and
/// ends the stream; end of input ends it normally.
pub struct SampleReader<R> {
    reader: R,
    chunk: Vec<u8>,
    filled: usize,
    pos: usize,
    done: bool,
}

impl<R: Read> SampleReader<R> {
    /// Wrap a reader with the default chunk size
    pub fn new(reader: R) -> Self {
        Self::with_chunk_size(reader, READ_CHUNK_SIZE)
    }

    /// Wrap a reader, reading at most `chunk_size` bytes per call
    pub fn with_chunk_size(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk: vec![0u8; chunk_size.max(1)],
            filled: 0,
            pos: 0,
            done: false,
        }
    }

    /// Refill the chunk buffer. Returns false at end of input.
    fn refill(&mut self) -> Result<bool, DecodeError> {
        loop {
            match self.reader.read(&mut self.chunk) {
                Ok(n) => {
                    #[cfg(feature = "logging")]
                    trace!("Read chunk of {} samples", n);

                    self.filled = n;
                    self.pos = 0;
                    return Ok(n > 0);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl<R: Read> Iterator for SampleReader<R> {
    type Item = Result<u8, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.pos >= self.filled {
            match self.refill() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    #[cfg(feature = "logging")]
                    warn!("Sample read failed: {}", e);

                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        let sample = self.chunk[self.pos];
        self.pos += 1;
        Some(Ok(sample))
    }
}
