//! GPMF record framing: `key | type | size | repeat | payload | padding`.

use crate::boxes::FourCC;
use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Size of the fixed record header.
pub const HEADER_SIZE: usize = 8;

/// Type byte marking a record whose payload is more records.
pub const CONTAINER_TAG: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHeader {
    pub key: FourCC,
    pub type_tag: u8,
    /// bytes per sample
    pub element_size: u8,
    /// samples in the record (string length for 1-byte `c` records)
    pub repeat_count: u16,
}

impl RecordHeader {
    pub fn new(key: FourCC, type_tag: u8, element_size: u8, repeat_count: u16) -> Self {
        Self {
            key,
            type_tag,
            element_size,
            repeat_count,
        }
    }

    /// Parse from the first 8 bytes of `buf`.
    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Self {
        Self {
            key: FourCC([buf[0], buf[1], buf[2], buf[3]]),
            type_tag: buf[4],
            element_size: buf[5],
            repeat_count: BigEndian::read_u16(&buf[6..8]),
        }
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut key = [0u8; 4];
        r.read_exact(&mut key)?;
        let type_tag = r.read_u8()?;
        let element_size = r.read_u8()?;
        let repeat_count = r.read_u16::<BigEndian>()?;
        Ok(Self {
            key: FourCC(key),
            type_tag,
            element_size,
            repeat_count,
        })
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.key.0)?;
        w.write_u8(self.type_tag)?;
        w.write_u8(self.element_size)?;
        w.write_u16::<BigEndian>(self.repeat_count)
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[..4].copy_from_slice(&self.key.0);
        out[4] = self.type_tag;
        out[5] = self.element_size;
        BigEndian::write_u16(&mut out[6..8], self.repeat_count);
        out
    }

    pub fn is_container(&self) -> bool {
        self.type_tag == CONTAINER_TAG
    }

    /// Type byte as a character, for messages.
    pub fn tag_char(&self) -> char {
        self.type_tag as char
    }

    /// `element_size * repeat_count`.
    pub fn payload_len(&self) -> usize {
        self.element_size as usize * self.repeat_count as usize
    }

    /// Payload length plus the zero bytes that align header + payload to 4.
    pub fn padded_len(&self) -> usize {
        padded_length(self.payload_len())
    }
}

/// Pad `payload_len` so that `8 + payload_len` lands on a multiple of 4.
pub fn padded_length(payload_len: usize) -> usize {
    payload_len + (4 - (HEADER_SIZE + payload_len) % 4) % 4
}

/// Decode the header at `pos` of `buf` within the budget `[pos, end)`.
///
/// `base` is the absolute offset of `buf[0]`, used for error reporting.
/// The header is rejected if its payload would cross `end`; padding is not
/// checked here because the final record of a range may omit it. A budget
/// reaching past `buf` is cut to `buf.len()`.
pub fn read_record_header(buf: &[u8], pos: usize, end: usize, base: u64) -> Result<RecordHeader> {
    let end = end.min(buf.len());
    let available = end.saturating_sub(pos);
    if available < HEADER_SIZE {
        return Err(Error::TruncatedHeader {
            offset: base + pos as u64,
            available: available as u64,
        });
    }

    let mut raw = [0u8; HEADER_SIZE];
    raw.copy_from_slice(&buf[pos..pos + HEADER_SIZE]);
    let header = RecordHeader::from_bytes(&raw);

    let needed = header.payload_len();
    let remaining = available - HEADER_SIZE;
    if needed > remaining {
        return Err(Error::TruncatedPayload {
            key: header.key,
            offset: base + pos as u64,
            needed: needed as u64,
            available: remaining as u64,
        });
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_aligns_whole_record() {
        assert_eq!(padded_length(0), 0);
        assert_eq!(padded_length(1), 4);
        assert_eq!(padded_length(3), 4);
        assert_eq!(padded_length(4), 4);
        assert_eq!(padded_length(5), 8);
        assert_eq!(padded_length(24), 24);
    }

    #[test]
    fn padding_properties_hold() {
        for len in 0..512usize {
            let p = padded_length(len);
            assert_eq!((HEADER_SIZE + p) % 4, 0);
            assert_eq!(p % 4, 0);
            assert!(p >= len && p - len < 4);
            assert_eq!(padded_length(p), p);
        }
    }

    #[test]
    fn header_bytes_round_trip() {
        let raw = [b'S', b'T', b'N', b'M', b'c', 1, 0x01, 0x02];
        let h = RecordHeader::from_bytes(&raw);
        assert_eq!(h.key, FourCC(*b"STNM"));
        assert_eq!(h.repeat_count, 258);
        assert_eq!(h.to_bytes(), raw);

        let mut written = Vec::new();
        h.write(&mut written).unwrap();
        assert_eq!(written, raw);
        assert_eq!(RecordHeader::read(&mut &raw[..]).unwrap(), h);
    }

    #[test]
    fn short_budget_is_truncated_header() {
        let buf = [0u8; 6];
        let err = read_record_header(&buf, 0, buf.len(), 100).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedHeader {
                offset: 100,
                available: 6
            }
        ));
    }

    #[test]
    fn budget_past_buffer_is_clamped() {
        let err = read_record_header(&[0u8; 4], 0, 100, 0).unwrap_err();
        assert!(matches!(err, Error::TruncatedHeader { available: 4, .. }));

        let mut buf = RecordHeader::new(FourCC(*b"TMPC"), b'f', 4, 2).to_bytes().to_vec();
        buf.extend_from_slice(&[0u8; 4]);
        let err = read_record_header(&buf, 0, 64, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedPayload {
                needed: 8,
                available: 4,
                ..
            }
        ));

        let err = read_record_header(&buf, 20, 64, 0).unwrap_err();
        assert!(matches!(err, Error::TruncatedHeader { available: 0, .. }));
    }
}
