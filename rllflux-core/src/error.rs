//! Error types for rllflux operations

use alloc::string::String;

/// Errors that can occur while reading or synthesizing flux captures
///
/// Decoding itself never fails: a frame that stops matching the RLL table is
/// truncated, not rejected. Only the sample source and the track encoder
/// produce errors.
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// IO error while reading samples
    #[cfg_attr(feature = "std", error("IO error: {0}"))]
    Io(String),

    /// A clock period does not fit in one sample byte
    #[cfg_attr(feature = "std", error("Clock period {period} exceeds maximum {max}"))]
    PeriodOutOfRange {
        /// The offending period.
        period: u32,
        /// The largest period a sample byte can carry.
        max: u32,
    },

    /// Waveform text is not a filler/separator sequence ending in a separator
    #[cfg_attr(feature = "std", error("Invalid waveform: {0}"))]
    InvalidWaveform(String),

    /// An encoded record would contain the sync pattern and split in two
    #[cfg_attr(feature = "std", error("Encoded record contains the sync pattern at period {0}"))]
    EmbeddedSync(usize),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for DecodeError {
    fn from(err: std::io::Error) -> Self {
        DecodeError::Io(err.to_string())
    }
}
