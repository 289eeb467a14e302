use crate::timestamp::parse_timestamp;
use crate::error::Result;
use byteorder::{BigEndian, ByteOrder};
use serde::Serialize;
use time::OffsetDateTime;

/// Bytes in one `U` sample: `YYMMDDhhmmss.fff`.
pub const TIMESTAMP_WIDTH: usize = 16;

/// Typed view over the record type byte.
///
/// Anything not in this list is rejected (or skipped, in permissive mode)
/// by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// `\0`: payload is a sequence of nested records
    Container,
    /// `c`
    Char,
    /// `b`
    I8,
    /// `B`
    U8,
    /// `s`
    I16,
    /// `S`
    U16,
    /// `l`
    I32,
    /// `L`
    U32,
    /// `f`
    F32,
    /// `U`
    Timestamp,
    /// `?`: structure described elsewhere, payload left undecoded
    Complex,
}

impl TypeTag {
    pub fn from_byte(b: u8) -> Option<Self> {
        Some(match b {
            0 => TypeTag::Container,
            b'c' => TypeTag::Char,
            b'b' => TypeTag::I8,
            b'B' => TypeTag::U8,
            b's' => TypeTag::I16,
            b'S' => TypeTag::U16,
            b'l' => TypeTag::I32,
            b'L' => TypeTag::U32,
            b'f' => TypeTag::F32,
            b'U' => TypeTag::Timestamp,
            b'?' => TypeTag::Complex,
            _ => return None,
        })
    }

    pub fn as_byte(self) -> u8 {
        match self {
            TypeTag::Container => 0,
            TypeTag::Char => b'c',
            TypeTag::I8 => b'b',
            TypeTag::U8 => b'B',
            TypeTag::I16 => b's',
            TypeTag::U16 => b'S',
            TypeTag::I32 => b'l',
            TypeTag::U32 => b'L',
            TypeTag::F32 => b'f',
            TypeTag::Timestamp => b'U',
            TypeTag::Complex => b'?',
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            TypeTag::Container => "Nested records",
            TypeTag::Char => "Latin-1 text",
            TypeTag::I8 => "Signed 8-bit integer",
            TypeTag::U8 => "Unsigned 8-bit integer",
            TypeTag::I16 => "Signed 16-bit integer",
            TypeTag::U16 => "Unsigned 16-bit integer",
            TypeTag::I32 => "Signed 32-bit integer",
            TypeTag::U32 => "Unsigned 32-bit integer",
            TypeTag::F32 => "32-bit float",
            TypeTag::Timestamp => "UTC date and time",
            TypeTag::Complex => "Complex structure",
        }
    }

    /// Width of one scalar for numeric types.
    pub fn scalar_width(self) -> Option<usize> {
        match self {
            TypeTag::I8 | TypeTag::U8 => Some(1),
            TypeTag::I16 | TypeTag::U16 => Some(2),
            TypeTag::I32 | TypeTag::U32 | TypeTag::F32 => Some(4),
            _ => None,
        }
    }

    /// Whether `element_size` is usable for this type.
    pub fn accepts_element_size(self, element_size: u8) -> bool {
        match self {
            TypeTag::Container | TypeTag::Complex => true,
            TypeTag::Timestamp => element_size as usize == TIMESTAMP_WIDTH,
            _ => {
                element_size != 0
                    && self
                        .scalar_width()
                        .is_none_or(|w| element_size as usize % w == 0)
            }
        }
    }
}

/// One decoded sample.
///
/// Numeric variants hold `element_size / width` scalars, one per
/// sub-element of the sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    Text(String),
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    /// `None` when the raw characters did not form a valid date.
    #[serde(with = "time::serde::rfc3339::option")]
    Timestamp(Option<OffsetDateTime>),
}

impl DecodedValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<OffsetDateTime> {
        match self {
            DecodedValue::Timestamp(t) => *t,
            _ => None,
        }
    }

    /// Numeric samples widened to `f64`, e.g. for applying `SCAL` divisors.
    pub fn to_f64s(&self) -> Option<Vec<f64>> {
        fn widen<T: Copy + Into<f64>>(v: &[T]) -> Vec<f64> {
            v.iter().map(|&x| x.into()).collect()
        }
        Some(match self {
            DecodedValue::I8(v) => widen(v),
            DecodedValue::U8(v) => widen(v),
            DecodedValue::I16(v) => widen(v),
            DecodedValue::U16(v) => widen(v),
            DecodedValue::I32(v) => widen(v),
            DecodedValue::U32(v) => widen(v),
            DecodedValue::F32(v) => widen(v),
            DecodedValue::Text(_) | DecodedValue::Timestamp(_) => return None,
        })
    }

    /// Number of scalars in the sample; text and timestamps count as one.
    pub fn len(&self) -> usize {
        match self {
            DecodedValue::I8(v) => v.len(),
            DecodedValue::U8(v) => v.len(),
            DecodedValue::I16(v) => v.len(),
            DecodedValue::U16(v) => v.len(),
            DecodedValue::I32(v) => v.len(),
            DecodedValue::U32(v) => v.len(),
            DecodedValue::F32(v) => v.len(),
            DecodedValue::Text(_) | DecodedValue::Timestamp(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Text up to the first NUL, bytes taken as Latin-1.
pub fn latin1_until_nul(raw: &[u8]) -> String {
    raw.iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Decode one sample's raw bytes.
///
/// Returns `Ok(None)` for types that carry no value of their own
/// (containers and `?`). Timestamp failures surface as `InvalidTimestamp`
/// for the caller to recover from.
pub fn decode_element(tag: TypeTag, raw: &[u8]) -> Result<Option<DecodedValue>> {
    let value = match tag {
        TypeTag::Container | TypeTag::Complex => return Ok(None),
        TypeTag::Char => DecodedValue::Text(latin1_until_nul(raw)),
        TypeTag::I8 => DecodedValue::I8(raw.iter().map(|&b| b as i8).collect()),
        TypeTag::U8 => DecodedValue::U8(raw.to_vec()),
        TypeTag::I16 => DecodedValue::I16(raw.chunks_exact(2).map(BigEndian::read_i16).collect()),
        TypeTag::U16 => DecodedValue::U16(raw.chunks_exact(2).map(BigEndian::read_u16).collect()),
        TypeTag::I32 => DecodedValue::I32(raw.chunks_exact(4).map(BigEndian::read_i32).collect()),
        TypeTag::U32 => DecodedValue::U32(raw.chunks_exact(4).map(BigEndian::read_u32).collect()),
        TypeTag::F32 => DecodedValue::F32(raw.chunks_exact(4).map(BigEndian::read_f32).collect()),
        TypeTag::Timestamp => DecodedValue::Timestamp(Some(parse_timestamp(raw)?)),
    };
    Ok(Some(value))
}
