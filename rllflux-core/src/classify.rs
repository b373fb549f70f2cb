//! Record classification and check computation

use crate::constants::{RecordKind, CRC16_INIT, ECC56_INIT, MARK_PREAMBLE};
use crate::crc::{crc16_update, ecc56_update};
use crate::types::Record;
use bytes::Bytes;

#[cfg(feature = "logging")]
use tracing::trace;

/// Classify assembled bytes and compute their check value
///
/// Returns `None` for an empty byte sequence. The check value is reported as
/// computed; a nonzero residue is not treated as an error here.
pub fn classify_record(bytes: Bytes) -> Option<Record> {
    let mark = *bytes.first()?;
    let kind = RecordKind::from_mark(mark);
    let payload = bytes.slice(..kind.span().min(bytes.len()));

    let check = match kind {
        RecordKind::DataMark => Some(ecc56_update(
            ecc56_update(ECC56_INIT, &[MARK_PREAMBLE]),
            &payload,
        )),
        RecordKind::AddressMark => Some(crc16_update(
            crc16_update(CRC16_INIT, &[MARK_PREAMBLE]),
            &payload,
        ) as u64),
        RecordKind::Unknown => None,
    };

    #[cfg(feature = "logging")]
    trace!(
        "Record {:?}: {} bytes, mark {:#04x}, check {:?}",
        kind,
        bytes.len(),
        mark,
        check
    );

    Some(Record {
        kind,
        length: bytes.len(),
        check,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::{crc16, ecc56};

    #[test]
    fn test_empty_is_no_record() {
        assert!(classify_record(Bytes::new()).is_none());
    }

    #[test]
    fn test_address_mark() {
        let rec = classify_record(Bytes::from_static(&[0xFE, 0, 0, 0, 0, 0, 0x55, 0x66])).unwrap();
        assert_eq!(rec.kind, RecordKind::AddressMark);
        assert_eq!(rec.length, 8);
        assert_eq!(rec.payload.as_ref(), &[0xFE, 0, 0, 0, 0, 0]);
        assert_eq!(rec.check, Some(0x9DBF));
        assert_eq!(rec.check_hex(), "9dbf");
        assert_eq!(rec.is_intact(), Some(false));
    }

    #[test]
    fn test_any_mark_above_data_mark_is_address_mark() {
        for mark in [0xF9u8, 0xFC, 0xFF] {
            let rec = classify_record(Bytes::from(vec![mark, 1, 2])).unwrap();
            assert_eq!(rec.kind, RecordKind::AddressMark);
            assert_eq!(rec.check, Some(crc16(&[0xA1, mark, 1, 2]) as u64));
        }
    }

    #[test]
    fn test_intact_address_mark() {
        let mut body = vec![0xFE, 0x01, 0x02, 0x03];
        let crc = crc16(&[0xA1, 0xFE, 0x01, 0x02, 0x03]);
        body.extend_from_slice(&crc.to_be_bytes());
        let rec = classify_record(Bytes::from(body)).unwrap();
        assert_eq!(rec.check_hex(), "0000");
        assert_eq!(rec.is_intact(), Some(true));
    }

    #[test]
    fn test_data_mark_span() {
        let mut body = vec![0xF8];
        body.extend_from_slice(&[0u8; 530]);
        let rec = classify_record(Bytes::from(body)).unwrap();
        assert_eq!(rec.kind, RecordKind::DataMark);
        assert_eq!(rec.length, 531);
        assert_eq!(rec.payload.len(), 520);
        assert_eq!(rec.check_hex(), "052a3e2737e413");
    }

    #[test]
    fn test_short_data_mark() {
        let rec = classify_record(Bytes::from_static(&[0xF8, 0x01])).unwrap();
        assert_eq!(rec.payload.len(), 2);
        assert_eq!(rec.check, Some(ecc56(&[0xA1, 0xF8, 0x01])));
        assert_eq!(rec.check_hex().len(), 14);
        assert_eq!(rec.is_intact(), Some(false));
    }

    #[test]
    fn test_unknown_record() {
        let body: Vec<u8> = (0..30).collect();
        let rec = classify_record(Bytes::from(body)).unwrap();
        assert_eq!(rec.kind, RecordKind::Unknown);
        assert_eq!(rec.length, 30);
        assert_eq!(rec.payload.len(), 20);
        assert_eq!(rec.check, None);
        assert_eq!(rec.check_hex(), "f");
        assert_eq!(rec.is_intact(), None);
    }

    #[test]
    fn test_just_below_data_mark_is_unknown() {
        let rec = classify_record(Bytes::from_static(&[0xF7])).unwrap();
        assert_eq!(rec.kind, RecordKind::Unknown);
    }
}
