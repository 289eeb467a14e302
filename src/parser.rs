//! MP4 box walking: flat scans of length-prefixed, tagged boxes inside a
//! byte range, and descent into named children.

use crate::boxes::{Atom, FourCC};
use crate::error::{Error, Result};
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Read the box header at the current stream position.
///
/// Returns `Ok(None)` when fewer than 8 bytes are left before `end` or the
/// source runs out; a short tail is end of stream, not an error.
pub fn read_box_header<R: Read + Seek>(r: &mut R, end: u64) -> Result<Option<Atom>> {
    let start = r.stream_position()?;
    if end.saturating_sub(start) < 8 {
        return Ok(None);
    }

    let size32 = match r.read_u32::<BigEndian>() {
        Ok(v) => v,
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut typ = [0u8; 4];
    match r.read_exact(&mut typ) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    }
    let tag = FourCC(typ);

    let (size, header_size) = match size32 {
        0 => (end - start, 8),
        1 => {
            if end - start < 16 {
                return Err(Error::MalformedBox {
                    tag,
                    offset: start,
                    size: 1,
                    message: "64-bit size field cut off by end of range".into(),
                });
            }
            match r.read_u64::<BigEndian>() {
                Ok(v) => (v, 16),
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(None),
                Err(e) => return Err(e.into()),
            }
        }
        n => (n as u64, 8),
    };

    if size < header_size {
        return Err(Error::MalformedBox {
            tag,
            offset: start,
            size,
            message: format!("size smaller than header ({header_size} bytes)"),
        });
    }

    let box_end = start.checked_add(size).filter(|e| *e <= end);
    let Some(box_end) = box_end else {
        return Err(Error::MalformedBox {
            tag,
            offset: start,
            size,
            message: format!("extends past end of range at {end}"),
        });
    };

    log::trace!("box {tag} [{start}, {box_end}) header={header_size}");

    Ok(Some(Atom {
        tag,
        start,
        end: box_end,
        header_size,
    }))
}

/// Scan `[start, end)` and return every top-level box fully inside it,
/// in stream order.
pub fn find_boxes<R: Read + Seek>(r: &mut R, start: u64, end: u64) -> Result<Vec<Atom>> {
    let mut atoms = Vec::new();
    r.seek(SeekFrom::Start(start))?;
    while let Some(atom) = read_box_header(r, end)? {
        r.seek(SeekFrom::Start(atom.end))?;
        atoms.push(atom);
    }
    Ok(atoms)
}

/// First box tagged `tag` among the top-level boxes of `[start, end)`.
pub fn find_box<R: Read + Seek>(r: &mut R, start: u64, end: u64, tag: FourCC) -> Result<Atom> {
    find_boxes(r, start, end)?
        .into_iter()
        .find(|a| a.tag == tag)
        .ok_or_else(|| Error::BoxNotFound {
            tag,
            context: format!("range [{start}, {end})"),
        })
}

/// Descend through nested boxes, e.g. `moov` → `udta` → `GPMF`.
///
/// Each step scans the payload of the box found by the previous one.
pub fn locate_path<R: Read + Seek>(
    r: &mut R,
    start: u64,
    end: u64,
    path: &[FourCC],
) -> Result<Atom> {
    let mut range = start..end;
    let mut found: Option<Atom> = None;
    let mut walked = Vec::with_capacity(path.len());

    for &tag in path {
        let atom = find_boxes(r, range.start, range.end)?
            .into_iter()
            .find(|a| a.tag == tag)
            .ok_or_else(|| Error::BoxNotFound {
                tag,
                context: if walked.is_empty() {
                    "top level".to_string()
                } else {
                    walked.join("/")
                },
            })?;
        walked.push(tag.to_string());
        range = atom.payload();
        found = Some(atom);
    }

    found.ok_or_else(|| Error::BoxNotFound {
        tag: FourCC::default(),
        context: "empty box path".into(),
    })
}
