use crate::{
    boxes::{Atom, FourCC},
    decoder::{DecodeObserver, DecodeOptions, LogObserver, decode_slice},
    error::{Error, Result},
    node::Gpmf,
    parser::{locate_path, read_box_header},
    util::{hex_dump, read_range},
};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Decode the GPMF records in `[start, end)` of a byte source.
///
/// The range is read once; nested containers are decoded as sub-ranges of
/// that buffer. Error offsets are absolute positions in the source.
///
/// # Example
/// ```no_run
/// use gpmfbox::{decode_range, DecodeOptions};
/// use std::fs::File;
///
/// let mut file = File::open("GOPR0001.gpmf")?;
/// let size = file.metadata()?.len();
/// let gpmf = decode_range(&mut file, 0, size, &DecodeOptions::default(), &mut ())?;
/// println!("{} top-level records", gpmf.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn decode_range<R: Read + Seek>(
    r: &mut R,
    start: u64,
    end: u64,
    opts: &DecodeOptions,
    observer: &mut dyn DecodeObserver,
) -> Result<Gpmf> {
    let buf = read_range(r, start, end)?;
    decode_slice(&buf, start, opts, observer)
}

/// Locate `moov/udta/<tag>` in `[0, size)`.
pub fn locate_metadata<R: Read + Seek>(r: &mut R, size: u64, tag: FourCC) -> Result<Atom> {
    locate_path(r, 0, size, &[FourCC::MOOV, FourCC::UDTA, tag])
}

/// Whether the source starts with an `ftyp` box.
pub fn is_mp4<R: Read + Seek>(r: &mut R, size: u64) -> Result<bool> {
    r.seek(SeekFrom::Start(0))?;
    match read_box_header(r, size) {
        Ok(Some(atom)) => Ok(atom.tag == FourCC::FTYP),
        Ok(None) | Err(Error::MalformedBox { .. }) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Decode either an MP4 (its `moov/udta/<tag>` box) or a raw GPMF stream.
pub fn decode_reader<R: Read + Seek>(
    r: &mut R,
    tag: FourCC,
    opts: &DecodeOptions,
    observer: &mut dyn DecodeObserver,
) -> Result<Gpmf> {
    let size = r.seek(SeekFrom::End(0))?;
    if is_mp4(r, size)? {
        let atom = locate_metadata(r, size, tag)?;
        log::info!("{} box at [{}, {})", atom.tag, atom.start, atom.end);
        let payload = atom.payload();
        decode_range(r, payload.start, payload.end, opts, observer)
    } else {
        log::info!("no ftyp box, decoding {size} bytes as raw GPMF");
        decode_range(r, 0, size, opts, observer)
    }
}

/// Open `path` and decode its `udta/GPMF` box (MP4) or whole contents (raw
/// GPMF), logging each record at debug level.
pub fn decode_file(path: impl AsRef<Path>, opts: &DecodeOptions) -> Result<Gpmf> {
    let mut f = File::open(path)?;
    decode_reader(&mut f, FourCC::GPMF, opts, &mut LogObserver)
}

/// Result of a hex dump operation containing the formatted hex output.
#[derive(Serialize)]
pub struct HexDump {
    /// Starting offset of the dumped data
    pub offset: u64,
    /// Actual number of bytes that were read and dumped
    pub length: u64,
    /// Formatted hex dump string with addresses and ASCII representation
    pub hex: String,
}

/// Hex-dump up to `max_len` bytes from `offset`, never reading past `size`.
pub fn hex_range<R: Read + Seek>(
    r: &mut R,
    size: u64,
    offset: u64,
    max_len: u64,
) -> Result<HexDump> {
    let to_read = size.saturating_sub(offset).min(max_len);
    if to_read == 0 {
        return Ok(HexDump {
            offset,
            length: 0,
            hex: String::new(),
        });
    }

    let data = read_range(r, offset, offset + to_read)?;
    Ok(HexDump {
        offset,
        length: to_read,
        hex: hex_dump(&data, offset),
    })
}
