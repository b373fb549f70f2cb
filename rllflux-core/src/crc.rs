//! CRC engines for WD address and data marks
//!
//! Address marks carry the usual CRC-16/CCITT. Data marks carry what WD calls
//! a 56-bit "ECC", which is a plain CRC with a 56-bit polynomial. Both are run
//! MSB first with an all-ones start value and no final XOR, and both are fed
//! the [`MARK_PREAMBLE`](crate::constants::MARK_PREAMBLE) byte ahead of the
//! record.

use crate::constants::{CRC16_INIT, CRC16_POLY, ECC56_INIT, ECC56_POLY, ECC56_WIDTH};

const CRC16_TABLE: [u16; 256] = {
    let mut table = [0u16; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ (CRC16_POLY as u16)
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Continue a CRC-16/CCITT (poly 0x1021, MSB first) over `data`
pub fn crc16_update(crc: u16, data: &[u8]) -> u16 {
    data.iter().fold(crc, |crc, &byte| {
        (crc << 8) ^ CRC16_TABLE[((crc >> 8) as u8 ^ byte) as usize]
    })
}

/// CRC-16/CCITT with initial value 0xFFFF and no final XOR
pub fn crc16(data: &[u8]) -> u16 {
    crc16_update(CRC16_INIT, data)
}

/// Continue the 56-bit ECC over `data`
///
/// Bit-serial: each byte is XORed into the top of the register, then the
/// register is shifted eight times, folding in the polynomial whenever a bit
/// is carried out of the 56-bit window.
pub fn ecc56_update(mut ecc: u64, data: &[u8]) -> u64 {
    let top = 1u64 << ECC56_WIDTH;
    for &byte in data {
        ecc ^= (byte as u64) << (ECC56_WIDTH - 8);
        for _ in 0..8 {
            ecc <<= 1;
            if ecc & top != 0 {
                ecc ^= ECC56_POLY;
            }
        }
    }
    ecc
}

/// 56-bit WD data-field ECC with an all-ones initial value
pub fn ecc56(data: &[u8]) -> u64 {
    ecc56_update(ECC56_INIT, data)
}
