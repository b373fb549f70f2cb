//! Core types flowing through the decode pipeline

use crate::constants::RecordKind;
use alloc::string::String;
use alloc::vec::Vec;
use bytes::Bytes;
use core::fmt;

/// Number of base clock cells between two flux transitions
pub type ClockPeriod = u32;

/// Clock periods found between two sync patterns
///
/// The sync pattern itself is not part of the frame. The first and last
/// frames of a capture are boundary frames and may be partial.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// Position of this frame in the capture, starting at 0
    pub index: usize,

    /// Clock periods in capture order
    pub periods: Vec<ClockPeriod>,
}

impl Frame {
    /// Create a new frame
    pub fn new(index: usize, periods: Vec<ClockPeriod>) -> Self {
        Self { index, periods }
    }

    /// Number of periods in the frame
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// True if the frame holds no periods
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Decoded RLL bits of one frame, in transmission order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitString(Vec<bool>);

impl BitString {
    /// Create an empty bit string
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Build the bit string a controller writes for one record: a single
    /// sync bit followed by every byte MSB first
    pub fn from_record(sync_bit: bool, bytes: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(1 + bytes.len() * 8);
        bits.push(sync_bit);
        for byte in bytes {
            bits.extend((0..8).rev().map(|i| (byte >> i) & 1 == 1));
        }
        Self(bits)
    }

    /// Parse a text of `0` and `1` characters
    pub fn parse(text: &str) -> Option<Self> {
        text.chars()
            .map(|c| match c {
                '0' => Some(false),
                '1' => Some(true),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    /// Append the low `width` bits of `value`, MSB first
    pub fn push_bits(&mut self, value: u8, width: u8) {
        for i in (0..width).rev() {
            self.0.push((value >> i) & 1 == 1);
        }
    }

    /// Append a single bit
    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    /// Number of bits
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no bits were decoded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bits as a slice
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in &self.0 {
            f.write_str(if *bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// A classified record assembled from one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record kind, decided by the first byte
    pub kind: RecordKind,

    /// Total number of assembled bytes in the frame
    pub length: usize,

    /// CRC/ECC residue over preamble and payload; `None` for unknown records
    pub check: Option<u64>,

    /// Leading bytes covered by the check (or shown, for unknown records)
    pub payload: Bytes,
}

impl Record {
    /// Check value as printed in the dump: zero-padded lowercase hex for
    /// marks, `f` for unknown records
    pub fn check_hex(&self) -> String {
        match self.check {
            Some(check) => alloc::format!("{:0width$x}", check, width = self.kind.check_digits()),
            None => String::from("f"),
        }
    }

    /// Whether the stored CRC/ECC bytes agree with the record body
    ///
    /// The check covers the stored check bytes too, so a good record leaves a
    /// zero residue. Records cut short before their check bytes are never
    /// intact. `None` for unknown records.
    pub fn is_intact(&self) -> Option<bool> {
        let complete = self.payload.len() == self.kind.span();
        self.check.map(|check| complete && check == 0)
    }
}

/// Per-frame diagnostic, emitted before the frame's record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDiagnostic {
    /// Frame position in the capture
    pub index: usize,

    /// Length of the rendered waveform in clock cells
    pub waveform_len: usize,

    /// Number of bits recovered by the RLL decoder
    pub bits_len: usize,

    /// Waveform cells left when the RLL decoder stopped
    pub residue: usize,
}

impl FrameDiagnostic {
    /// True if decoding stopped with room left for at least one more code run
    pub fn is_truncated(&self) -> bool {
        self.residue >= crate::rll::MIN_RUN_LEN
    }
}

/// One observable event of the decode pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// A frame was decoded (always emitted, even without a record)
    Frame(FrameDiagnostic),

    /// A frame produced a non-empty record
    Record(Record),
}

impl DecodeEvent {
    /// The record carried by this event, if any
    pub fn record(&self) -> Option<&Record> {
        match self {
            DecodeEvent::Record(record) => Some(record),
            DecodeEvent::Frame(_) => None,
        }
    }
}
