//! Fuzz entry points for the rllflux decode pipeline
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Call these from fuzz targets, e.g. `fuzz_target!(|data| fuzz_decode(data))`

use rllflux_core::{rll::decode_waveform, Waveform};

/// Decode arbitrary samples as a capture; must never panic
pub fn fuzz_decode(data: &[u8]) {
    use rllflux_core::decoder::decode_stream_with_stats;

    let (events, stats) = decode_stream_with_stats(data);
    assert_eq!(stats.frames + stats.records(), events.len());
}

/// Decode arbitrary samples through the chunked reader; must agree with the
/// in-memory path
pub fn fuzz_reader(data: &[u8]) {
    use rllflux_core::decoder::{decode_reader, decode_stream};

    let streamed: Result<Vec<_>, _> = decode_reader(std::io::Cursor::new(data)).collect();
    assert_eq!(streamed.ok(), Some(decode_stream(data)));
}

/// Interpret arbitrary bytes as waveform text; must never panic
pub fn fuzz_waveform(data: &[u8]) {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(waveform) = Waveform::parse(text) {
        let rll = decode_waveform(&waveform);
        assert_eq!(rll.stopped_at + rll.residue, waveform.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzz_decode_empty() {
        fuzz_decode(&[]);
    }

    #[test]
    fn test_fuzz_decode_random() {
        fuzz_decode(&[0x12, 0x34, 0x56, 0x78, 0x6A, 0x28, 0x6A, 0x28]);
    }

    #[test]
    fn test_fuzz_reader_empty() {
        fuzz_reader(&[]);
    }

    #[test]
    fn test_fuzz_reader_random() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i * 37 % 251) as u8).collect();
        fuzz_reader(&data);
    }

    #[test]
    fn test_fuzz_waveform() {
        fuzz_waveform(b"");
        fuzz_waveform(b"|");
        fuzz_waveform(b"--|---|--|---|------|---|");
        fuzz_waveform(&[0xFF, 0xFE]);
    }
}
