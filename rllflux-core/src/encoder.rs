//! Flux capture synthesis
//!
//! Runs the decode pipeline backwards: record bytes to bits, bits to RLL(2,7)
//! cells, cells to clock periods, periods to raw samples. Used to build
//! captures for tests, benchmarks and fuzz seeds.

use crate::constants::{
    RecordKind, DATA_MARK_CHECK_LEN, DECODE_OFFSET, FILLER, MARK_PREAMBLE, MAX_SAMPLE_PERIOD,
    SAMPLE_DIVISOR, SEPARATOR, SYNC_PATTERN,
};
use crate::crc::{crc16, ecc56};
use crate::error::DecodeError;
use crate::rll::encode_bits;
use crate::types::{BitString, ClockPeriod};
use crate::waveform::Waveform;
use alloc::string::String;
use alloc::vec::Vec;

/// Sample byte for a clock period
///
/// Picks `floor(period * 13.333)`, which quantizes back to `period` with
/// about five counts of margin either side.
pub fn period_to_sample(period: ClockPeriod) -> Result<u8, DecodeError> {
    if period > MAX_SAMPLE_PERIOD {
        return Err(DecodeError::PeriodOutOfRange {
            period,
            max: MAX_SAMPLE_PERIOD,
        });
    }
    Ok((period as f64 * SAMPLE_DIVISOR) as u8)
}

/// Stored check bytes a controller appends to `bytes`
///
/// Two CRC-16 bytes for an address mark, seven ECC bytes for a data mark,
/// nothing for anything else. Big-endian, covering the preamble.
pub fn check_bytes(bytes: &[u8]) -> Vec<u8> {
    let Some(&mark) = bytes.first() else {
        return Vec::new();
    };
    let mut covered = Vec::with_capacity(bytes.len() + 1);
    covered.push(MARK_PREAMBLE);
    covered.extend_from_slice(bytes);
    match RecordKind::from_mark(mark) {
        RecordKind::DataMark => ecc56(&covered).to_be_bytes()[8 - DATA_MARK_CHECK_LEN..].to_vec(),
        RecordKind::AddressMark => crc16(&covered).to_be_bytes().to_vec(),
        RecordKind::Unknown => Vec::new(),
    }
}

/// Waveform of one record frame as it follows a sync pattern
pub fn record_waveform(sync_bit: bool, bytes: &[u8]) -> Result<Waveform, DecodeError> {
    let bits = BitString::from_record(sync_bit, bytes);
    let cells = encode_bits(&bits);
    let mut text = String::with_capacity(DECODE_OFFSET + cells.len() + 1);
    text.extend(core::iter::repeat(FILLER).take(DECODE_OFFSET));
    text.push_str(&cells);
    text.push(SEPARATOR);
    Waveform::parse(&text)
}

#[derive(Debug, Clone)]
enum Segment {
    Sync,
    Periods(Vec<ClockPeriod>),
    Record { bytes: Vec<u8>, with_check: bool },
}

/// Builder for synthetic flux captures
#[derive(Debug, Clone)]
pub struct TrackBuilder {
    segments: Vec<Segment>,
    sync_bit: bool,
}

impl TrackBuilder {
    /// Create an empty capture
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
            sync_bit: true,
        }
    }

    /// Value of the leading bit written before each record (default 1)
    pub fn sync_bit(mut self, bit: bool) -> Self {
        self.sync_bit = bit;
        self
    }

    /// Append a sync pattern
    pub fn sync(mut self) -> Self {
        self.segments.push(Segment::Sync);
        self
    }

    /// Append raw clock periods
    pub fn periods(mut self, periods: &[ClockPeriod]) -> Self {
        self.segments.push(Segment::Periods(periods.to_vec()));
        self
    }

    /// Append a record frame
    pub fn record(mut self, bytes: &[u8]) -> Self {
        self.segments.push(Segment::Record {
            bytes: bytes.to_vec(),
            with_check: false,
        });
        self
    }

    /// Append the stored CRC/ECC to the last record
    pub fn with_check(mut self) -> Self {
        if let Some(Segment::Record { with_check, .. }) = self.segments.last_mut() {
            *with_check = true;
        }
        self
    }

    /// Lay out the capture as clock periods
    pub fn build_periods(&self) -> Result<Vec<ClockPeriod>, DecodeError> {
        let mut out = Vec::new();
        for segment in &self.segments {
            match segment {
                Segment::Sync => out.extend_from_slice(&SYNC_PATTERN),
                Segment::Periods(periods) => out.extend_from_slice(periods),
                Segment::Record { bytes, with_check } => {
                    let mut bytes = bytes.clone();
                    if *with_check {
                        let check = check_bytes(&bytes);
                        bytes.extend_from_slice(&check);
                    }
                    let periods = record_waveform(self.sync_bit, &bytes)?.periods();
                    if let Some(at) = periods
                        .windows(SYNC_PATTERN.len())
                        .position(|w| w == SYNC_PATTERN)
                    {
                        return Err(DecodeError::EmbeddedSync(at));
                    }
                    out.extend_from_slice(&periods);
                }
            }
        }
        Ok(out)
    }

    /// Lay out the capture as raw samples
    pub fn build(&self) -> Result<Vec<u8>, DecodeError> {
        self.build_periods()?
            .into_iter()
            .map(period_to_sample)
            .collect()
    }
}

impl Default for TrackBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quantizer::quantize;

    #[test]
    fn test_period_samples_quantize_back() {
        for period in 1..=MAX_SAMPLE_PERIOD {
            let sample = period_to_sample(period).unwrap();
            assert_eq!(quantize(sample), period);
            assert_eq!(quantize(sample.saturating_sub(5)), period);
            assert_eq!(quantize(sample.saturating_add(5)), period);
        }
    }

    #[test]
    fn test_period_out_of_range() {
        assert_eq!(
            period_to_sample(20),
            Err(DecodeError::PeriodOutOfRange { period: 20, max: 19 })
        );
    }

    #[test]
    fn test_check_bytes() {
        assert_eq!(check_bytes(&[0xFE, 1, 2, 3]), vec![0xCD, 0x1F]);
        assert_eq!(check_bytes(&[0xF8]).len(), 7);
        assert!(check_bytes(&[0x00, 1]).is_empty());
        assert!(check_bytes(&[]).is_empty());
    }

    #[test]
    fn test_record_waveform_layout() {
        let wf = record_waveform(true, &[0xFE, 1, 2, 3, 0xCD, 0x1F]).unwrap();
        assert_eq!(wf.len(), 103);
        assert!(wf.as_str().starts_with("--|"));
        assert_eq!(
            &wf.periods()[..10],
            &[3, 4, 4, 4, 4, 3, 3, 3, 5, 3]
        );
    }

    #[test]
    fn test_sync_layout() {
        let periods = TrackBuilder::new().sync().periods(&[4]).sync().build_periods().unwrap();
        assert_eq!(periods, vec![8, 3, 4, 8, 3]);
    }

    #[test]
    fn test_records_never_encode_sync() {
        // A seven-zero run (period 8) always leaves three zeros before the
        // next transition, so a period of 3 cannot follow it
        for b in 0..=255u8 {
            for sync_bit in [false, true] {
                let builder = TrackBuilder::new()
                    .sync_bit(sync_bit)
                    .record(&[b, b ^ 0x5A, !b, b.rotate_left(3)]);
                assert!(builder.build_periods().is_ok(), "byte {:#04x}", b);
            }
        }
    }
}
