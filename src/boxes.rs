use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Range;

/// Four-character code used both as MP4 box tag and GPMF record key.
///
/// The bytes are not required to be printable; display replaces anything
/// outside printable ASCII with `.`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct FourCC(pub [u8; 4]);

impl FourCC {
    pub const MOOV: FourCC = FourCC(*b"moov");
    pub const UDTA: FourCC = FourCC(*b"udta");
    pub const FTYP: FourCC = FourCC(*b"ftyp");
    /// `udta` child holding the GPMF settings stream on newer cameras.
    pub const GPMF: FourCC = FourCC(*b"GPMF");
    /// `udta` child holding manually tagged highlights.
    pub const HMMT: FourCC = FourCC(*b"HMMT");

    pub fn from_str(s: &str) -> Option<Self> {
        let b = s.as_bytes();
        if b.len() == 4 {
            Some(FourCC([b[0], b[1], b[2], b[3]]))
        } else {
            None
        }
    }

    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str_lossy(&self) -> String {
        self.0
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect()
    }
}

impl From<[u8; 4]> for FourCC {
    fn from(b: [u8; 4]) -> Self {
        FourCC(b)
    }
}

impl fmt::Debug for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl fmt::Display for FourCC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str_lossy())
    }
}

impl Serialize for FourCC {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.as_str_lossy())
    }
}

/// A located MP4 box: its tag and absolute byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Atom {
    pub tag: FourCC,
    /// file offset of the length field
    pub start: u64,
    /// one past the last byte of the box
    pub end: u64,
    /// 8, or 16 for 64-bit sizes
    pub header_size: u64,
}

impl Atom {
    /// Total size including the header.
    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    /// Range holding the box payload, i.e. where child boxes live.
    pub fn payload(&self) -> Range<u64> {
        (self.start + self.header_size)..self.end
    }

    pub fn payload_len(&self) -> u64 {
        self.end.saturating_sub(self.start + self.header_size)
    }
}
