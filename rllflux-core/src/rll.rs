//! RLL(2,7) run decoding and encoding
//!
//! The WD RLL(2,7) code maps 2, 3 or 4 data bits onto 4, 6 or 8 clock cells.
//! Decoding walks a rendered [`Waveform`] and matches the code table at the
//! current position, first match wins. When nothing matches, decoding of the
//! frame ends there and the bits found so far are the result; this is how
//! noise and the tail of a frame are dropped.

use crate::constants::DECODE_OFFSET;
use crate::types::BitString;
use crate::waveform::Waveform;
use alloc::string::String;

#[cfg(feature = "logging")]
use tracing::debug;

/// One entry of the RLL(2,7) code table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeRun {
    /// Waveform cells the run occupies
    pub pattern: &'static str,

    /// Decoded bits, right-aligned
    pub value: u8,

    /// Number of decoded bits
    pub width: u8,
}

impl CodeRun {
    const fn new(pattern: &'static str, value: u8, width: u8) -> Self {
        Self {
            pattern,
            value,
            width,
        }
    }

    /// True if the low `width` bits of `value` begin `bits`
    fn encodes(&self, bits: &[bool]) -> bool {
        bits.len() >= self.width as usize
            && bits
                .iter()
                .take(self.width as usize)
                .enumerate()
                .all(|(i, &bit)| ((self.value >> (self.width as usize - 1 - i)) & 1 == 1) == bit)
    }
}

/// The RLL(2,7) code table in match order
pub const RLL_2_7_TABLE: [CodeRun; 7] = [
    CodeRun::new("-|--", 0b10, 2),
    CodeRun::new("|---", 0b11, 2),
    CodeRun::new("|--|--", 0b000, 3),
    CodeRun::new("---|--", 0b010, 3),
    CodeRun::new("--|---", 0b011, 3),
    CodeRun::new("--|--|--", 0b0010, 4),
    CodeRun::new("----|---", 0b0011, 4),
];

/// Length of the shortest code run
pub const MIN_RUN_LEN: usize = 4;

/// Result of decoding one waveform
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RllDecode {
    /// Bits recovered, in order
    pub bits: BitString,

    /// Waveform position where decoding stopped
    pub stopped_at: usize,

    /// Waveform cells after `stopped_at` that were not decoded
    pub residue: usize,
}

/// Find the code run matching `cells` at its start
fn match_run(cells: &[u8]) -> Option<&'static CodeRun> {
    RLL_2_7_TABLE
        .iter()
        .find(|run| cells.starts_with(run.pattern.as_bytes()))
}

/// Decode a waveform into bits
///
/// Starts [`DECODE_OFFSET`] cells in, past the tail of the sync pattern.
pub fn decode_waveform(waveform: &Waveform) -> RllDecode {
    let cells = waveform.as_str().as_bytes();
    let mut bits = BitString::new();
    let mut pos = DECODE_OFFSET;

    while pos < cells.len() {
        match match_run(&cells[pos..]) {
            Some(run) => {
                bits.push_bits(run.value, run.width);
                pos += run.pattern.len();
            }
            None => break,
        }
    }

    let residue = cells.len().saturating_sub(pos);

    if residue >= MIN_RUN_LEN {
        #[cfg(feature = "logging")]
        debug!(
            "RLL decode stopped at cell {} of {}, {} bits kept",
            pos,
            cells.len(),
            bits.len()
        );
    }

    RllDecode {
        bits,
        stopped_at: pos.min(cells.len()),
        residue,
    }
}

/// Encode bits into RLL(2,7) waveform cells
///
/// A tail that does not complete a code word is padded with zero bits, so
/// the output may carry up to two bits more than `bits`.
pub fn encode_bits(bits: &BitString) -> String {
    let bits = bits.as_slice();
    let mut cells = String::with_capacity(bits.len() * 2 + 4);
    let mut pos = 0;

    while pos < bits.len() {
        let rest = &bits[pos..];
        match RLL_2_7_TABLE.iter().find(|run| run.encodes(rest)) {
            Some(run) => {
                cells.push_str(run.pattern);
                pos += run.width as usize;
            }
            None => {
                // Unterminated tail: at most three bits, none of them a full word
                let mut padded = [false; 4];
                padded[..rest.len()].copy_from_slice(rest);
                let run = (rest.len()..=padded.len())
                    .find_map(|len| RLL_2_7_TABLE.iter().find(|run| run.encodes(&padded[..len])))
                    .unwrap_or(&RLL_2_7_TABLE[2]);
                cells.push_str(run.pattern);
                break;
            }
        }
    }
    cells
}
