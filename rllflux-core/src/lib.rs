//! # rllflux Core
//!
//! Decodes raw flux captures of Western Digital RLL(2,7) hard disks into the
//! address marks and data marks the controller wrote, with their CRC/ECC
//! residues. No track structure is assumed; frames are found by the clock
//! sync pattern alone.
//!
//! ## Modules
//!
//! - `constants`: Calibration values, code constants and record kinds
//! - `types`: Core types (Frame, BitString, Record, DecodeEvent)
//! - `quantizer`: Raw samples to clock periods
//! - `framer`: Clock periods to frames
//! - `waveform`: Frames to waveform text
//! - `rll`: RLL(2,7) run table, decoding and encoding
//! - `assembler`: Bits to bytes
//! - `crc`: CRC-16 and 56-bit ECC engines
//! - `classify`: Record classification and check values
//! - `decoder`: The full pipeline and decode statistics
//! - `encoder`: Synthetic capture construction

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod assembler;
pub mod classify;
pub mod constants;
pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod framer;
pub mod quantizer;
#[cfg(feature = "std")]
pub mod reader;
pub mod rll;
pub mod types;
pub mod waveform;

// Re-export commonly used types
pub use constants::RecordKind;
pub use decoder::{decode_stream, DecodeStats, TrackDecoder};
pub use error::DecodeError;
pub use types::{BitString, DecodeEvent, Frame, FrameDiagnostic, Record};
pub use waveform::Waveform;

/// Result type alias for rllflux operations
pub type Result<T> = core::result::Result<T, DecodeError>;
