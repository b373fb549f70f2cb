//! Constants and calibration values for WD RLL(2,7) flux decoding

use serde::{Deserialize, Serialize};

/// Offset added to a raw sample before dividing by [`SAMPLE_DIVISOR`].
///
/// Half of one clock cell, so that truncation of the quotient rounds to the
/// nearest cell count. Calibrated against the capture hardware's counter.
pub const SAMPLE_OFFSET: f64 = 6.666;

/// Number of counter ticks per RLL clock cell in a raw sample
pub const SAMPLE_DIVISOR: f64 = 13.333;

/// Largest clock period a single sample byte can express
pub const MAX_SAMPLE_PERIOD: u32 = 19;

/// Clock period sequence that separates frames in the flux stream
pub const SYNC_PATTERN: [u32; 2] = [8, 3];

/// Waveform positions skipped at the start of every frame (sync residue)
pub const DECODE_OFFSET: usize = 2;

/// Waveform symbol for a clock cell without a flux transition
pub const FILLER: char = '-';

/// Waveform symbol for a clock cell ending in a flux transition
pub const SEPARATOR: char = '|';

/// Leading byte of a data mark record
pub const DATA_MARK: u8 = 0xF8;

/// Mark byte the controller feeds into every CRC before the record bytes.
///
/// The decoder never sees it; it is consumed by the sync pattern.
pub const MARK_PREAMBLE: u8 = 0xA1;

/// Bytes of a data mark covered by the ECC (mark + 512 data + 7 check)
pub const DATA_MARK_SPAN: usize = 520;

/// Bytes of an address mark covered by the CRC (mark + 3 header + 2 check)
pub const ADDRESS_MARK_SPAN: usize = 6;

/// Bytes of an unclassified record shown in the hex dump
pub const UNKNOWN_SPAN: usize = 20;

/// Stored check bytes at the end of a data mark
pub const DATA_MARK_CHECK_LEN: usize = 7;

/// Chunk size used when pulling samples from a reader
pub const READ_CHUNK_SIZE: usize = 4096;

/// CRC-16/CCITT polynomial including the x^16 term
pub const CRC16_POLY: u32 = 0x1_1021;

/// Initial CRC-16 register value
pub const CRC16_INIT: u16 = 0xFFFF;

/// Width of the WD data-field ECC in bits
pub const ECC56_WIDTH: u32 = 56;

/// Bit positions set in the 56-bit ECC polynomial
pub const ECC56_TERMS: [u32; 11] = [56, 52, 50, 43, 41, 34, 30, 26, 24, 8, 0];

/// The 56-bit ECC polynomial including the x^56 term
pub const ECC56_POLY: u64 = {
    let mut poly = 0u64;
    let mut i = 0;
    while i < ECC56_TERMS.len() {
        poly |= 1 << ECC56_TERMS[i];
        i += 1;
    }
    poly
};

/// Initial ECC register value (all 56 bits set)
pub const ECC56_INIT: u64 = (1 << ECC56_WIDTH) - 1;

/// Kind of record, decided by its first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    /// Sector data field introduced by [`DATA_MARK`]
    DataMark,
    /// Sector ID field, first byte above [`DATA_MARK`]
    AddressMark,
    /// Anything else: noise, gaps, misaligned frames
    Unknown,
}

impl RecordKind {
    /// Classify a record by its leading byte
    pub const fn from_mark(mark: u8) -> Self {
        if mark == DATA_MARK {
            RecordKind::DataMark
        } else if mark > DATA_MARK {
            RecordKind::AddressMark
        } else {
            RecordKind::Unknown
        }
    }

    /// Two-character tag used in the dump output
    pub const fn tag(&self) -> &'static str {
        match self {
            RecordKind::DataMark => "DM",
            RecordKind::AddressMark => "AM",
            RecordKind::Unknown => "??",
        }
    }

    /// Number of leading record bytes covered by the check and shown in the dump
    pub const fn span(&self) -> usize {
        match self {
            RecordKind::DataMark => DATA_MARK_SPAN,
            RecordKind::AddressMark => ADDRESS_MARK_SPAN,
            RecordKind::Unknown => UNKNOWN_SPAN,
        }
    }

    /// Number of hex digits in the printed check value, 0 when none is computed
    pub const fn check_digits(&self) -> usize {
        match self {
            RecordKind::DataMark => 14,
            RecordKind::AddressMark => 4,
            RecordKind::Unknown => 0,
        }
    }
}
