//! Sample quantization: raw interval bytes to clock periods

use crate::constants::{SAMPLE_DIVISOR, SAMPLE_OFFSET};
use crate::error::DecodeError;
use crate::types::ClockPeriod;

/// Convert one raw interval sample into a clock period count
///
/// `(sample + 6.666) / 13.333`, truncated. The offset is half a cell, so this
/// is the nearest whole number of cells for the capture's counter rate.
pub fn quantize(sample: u8) -> ClockPeriod {
    ((sample as f64 + SAMPLE_OFFSET) / SAMPLE_DIVISOR) as ClockPeriod
}

/// Lazily quantizes a fallible sample stream
///
/// Errors from the source are passed through unchanged and end the stream.
#[derive(Debug, Clone)]
pub struct Quantizer<I> {
    samples: I,
    failed: bool,
}

impl<I> Quantizer<I>
where
    I: Iterator<Item = Result<u8, DecodeError>>,
{
    /// Wrap a sample source
    pub fn new(samples: I) -> Self {
        Self {
            samples,
            failed: false,
        }
    }
}

impl<I> Iterator for Quantizer<I>
where
    I: Iterator<Item = Result<u8, DecodeError>>,
{
    type Item = Result<ClockPeriod, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.samples.next()? {
            Ok(sample) => Some(Ok(quantize(sample))),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Adapt an in-memory capture into an infallible sample source
pub fn samples_from_slice(data: &[u8]) -> impl Iterator<Item = Result<u8, DecodeError>> + '_ {
    data.iter().copied().map(Ok)
}
