//! `moov/udta/HMMT`: manually tagged highlight times.

use crate::boxes::{Atom, FourCC};
use crate::error::{Error, Result};
use crate::parser::locate_path;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{Read, Seek, SeekFrom};

/// Read the highlight list from an `HMMT` box: a `u32` count followed by
/// that many big-endian `i32` offsets in milliseconds from clip start.
pub fn read_highlights<R: Read + Seek>(r: &mut R, atom: &Atom) -> Result<Vec<i32>> {
    let payload_len = atom.payload_len();
    if payload_len < 4 {
        return Err(Error::TruncatedPayload {
            key: atom.tag,
            offset: atom.start,
            needed: 4,
            available: payload_len,
        });
    }

    r.seek(SeekFrom::Start(atom.payload().start))?;
    let count = r.read_u32::<BigEndian>()? as u64;
    let needed = count * 4;
    if needed > payload_len - 4 {
        return Err(Error::TruncatedPayload {
            key: atom.tag,
            offset: atom.start,
            needed,
            available: payload_len - 4,
        });
    }

    let mut times = Vec::with_capacity(count as usize);
    for _ in 0..count {
        times.push(r.read_i32::<BigEndian>()?);
    }
    Ok(times)
}

/// Locate `moov/udta/HMMT` in `[0, size)` and read it.
pub fn find_highlights<R: Read + Seek>(r: &mut R, size: u64) -> Result<Vec<i32>> {
    let atom = locate_path(r, 0, size, &[FourCC::MOOV, FourCC::UDTA, FourCC::HMMT])?;
    read_highlights(r, &atom)
}

/// Format milliseconds as `H:MM:SS.mmm`.
pub fn format_millis(ms: i32) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let (secs, millis) = (ms / 1000, ms % 1000);
    format!(
        "{sign}{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        millis
    )
}
