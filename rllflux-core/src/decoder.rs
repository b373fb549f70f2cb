//! Track decoding pipeline
//!
//! Samples flow through five lazy stages: quantize to clock periods, split
//! into frames on the sync pattern, render each frame as a waveform, decode
//! RLL(2,7) runs into bits, and assemble bytes into a classified record. Only
//! the frame being decoded is held in memory.

use crate::assembler::assemble_bytes;
use crate::classify::classify_record;
use crate::constants::RecordKind;
use crate::error::DecodeError;
use crate::framer::Framer;
use crate::quantizer::{samples_from_slice, Quantizer};
use crate::rll::decode_waveform;
use crate::types::{DecodeEvent, Frame, FrameDiagnostic, Record};
use crate::waveform::render;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "std")]
use crate::reader::SampleReader;
#[cfg(feature = "std")]
use std::io::Read;

#[cfg(feature = "logging")]
use tracing::debug;

/// Decode one frame into its diagnostic and, if any bytes were recovered,
/// its record
pub fn decode_frame(frame: &Frame) -> (FrameDiagnostic, Option<Record>) {
    let waveform = render(frame);
    let rll = decode_waveform(&waveform);
    let diagnostic = FrameDiagnostic {
        index: frame.index,
        waveform_len: waveform.len(),
        bits_len: rll.bits.len(),
        residue: rll.residue,
    };
    let record = classify_record(assemble_bytes(&rll.bits));
    (diagnostic, record)
}

/// Pull-based decoder over a fallible sample source
///
/// Yields a [`DecodeEvent::Frame`] for every frame, followed by a
/// [`DecodeEvent::Record`] when the frame assembled into at least one byte.
/// A source error is yielded once and ends the stream.
pub struct TrackDecoder<I> {
    frames: Framer<Quantizer<I>>,
    pending: Option<Record>,
}

impl<I> TrackDecoder<I>
where
    I: Iterator<Item = Result<u8, DecodeError>>,
{
    /// Create a decoder over raw samples
    pub fn new(samples: I) -> Self {
        Self {
            frames: Framer::new(Quantizer::new(samples)),
            pending: None,
        }
    }
}

impl<I> Iterator for TrackDecoder<I>
where
    I: Iterator<Item = Result<u8, DecodeError>>,
{
    type Item = Result<DecodeEvent, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.pending.take() {
            return Some(Ok(DecodeEvent::Record(record)));
        }
        let frame = match self.frames.next()? {
            Ok(frame) => frame,
            Err(e) => return Some(Err(e)),
        };
        let (diagnostic, record) = decode_frame(&frame);
        self.pending = record;
        Some(Ok(DecodeEvent::Frame(diagnostic)))
    }
}

/// Decode a capture held in memory
pub fn decode_stream(data: &[u8]) -> Vec<DecodeEvent> {
    #[cfg(feature = "logging")]
    debug!("Decoding capture of {} samples", data.len());

    TrackDecoder::new(samples_from_slice(data))
        .filter_map(Result::ok)
        .collect()
}

/// Decode a capture read from `reader` in chunks
#[cfg(feature = "std")]
pub fn decode_reader<R: Read>(reader: R) -> TrackDecoder<SampleReader<R>> {
    TrackDecoder::new(SampleReader::new(reader))
}

/// Decode statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Frames seen, including empty boundary frames
    pub frames: usize,

    /// Frames whose RLL decode stopped with undecoded runs left
    pub truncated_frames: usize,

    /// Frames that assembled into no bytes
    pub empty_frames: usize,

    /// Sum of waveform lengths over all frames, in clock cells
    pub cells: usize,

    /// Data mark records
    pub data_marks: usize,

    /// Address mark records
    pub address_marks: usize,

    /// Unclassified records
    pub unknown_records: usize,

    /// Data marks whose ECC residue is zero
    pub intact_data_marks: usize,

    /// Address marks whose CRC residue is zero
    pub intact_address_marks: usize,
}

impl DecodeStats {
    /// Fold one event into the statistics
    pub fn observe(&mut self, event: &DecodeEvent) {
        match event {
            DecodeEvent::Frame(diag) => {
                self.frames += 1;
                self.cells += diag.waveform_len;
                if diag.is_truncated() {
                    self.truncated_frames += 1;
                }
                if crate::assembler::assembled_len(diag.bits_len) == 0 {
                    self.empty_frames += 1;
                }
            }
            DecodeEvent::Record(record) => {
                let intact = record.is_intact() == Some(true);
                match record.kind {
                    RecordKind::DataMark => {
                        self.data_marks += 1;
                        self.intact_data_marks += intact as usize;
                    }
                    RecordKind::AddressMark => {
                        self.address_marks += 1;
                        self.intact_address_marks += intact as usize;
                    }
                    RecordKind::Unknown => self.unknown_records += 1,
                }
            }
        }
    }

    /// Total records of any kind
    pub fn records(&self) -> usize {
        self.data_marks + self.address_marks + self.unknown_records
    }

    /// Share of address and data marks with a zero check residue, in percent
    pub fn intact_rate(&self) -> f64 {
        let marks = self.data_marks + self.address_marks;
        if marks == 0 {
            0.0
        } else {
            ((self.intact_data_marks + self.intact_address_marks) as f64 / marks as f64) * 100.0
        }
    }
}

/// Decode a capture held in memory and collect statistics
pub fn decode_stream_with_stats(data: &[u8]) -> (Vec<DecodeEvent>, DecodeStats) {
    let events = decode_stream(data);
    let mut stats = DecodeStats::default();
    for event in &events {
        stats.observe(event);
    }

    #[cfg(feature = "logging")]
    debug!(
        "Decode complete: {} frames, {} records ({} intact marks)",
        stats.frames,
        stats.records(),
        stats.intact_data_marks + stats.intact_address_marks
    );

    (events, stats)
}
