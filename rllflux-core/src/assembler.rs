//! Byte assembly from decoded bits

use crate::types::BitString;
use alloc::vec::Vec;
use bytes::Bytes;

/// Number of bytes [`assemble_bytes`] produces from `bit_len` bits
pub const fn assembled_len(bit_len: usize) -> usize {
    bit_len.saturating_sub(1) / 8
}

/// Group decoded bits into bytes, MSB first
///
/// The first bit is the sync bit left over from the mark and is dropped. A
/// trailing group shorter than eight bits is discarded.
pub fn assemble_bytes(bits: &BitString) -> Bytes {
    let body = bits.as_slice().get(1..).unwrap_or_default();
    let bytes: Vec<u8> = body
        .chunks_exact(8)
        .map(|group| group.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
        .collect();
    Bytes::from(bytes)
}
