use std::fmt::Write as _;
use std::io::{Read, Seek, SeekFrom};

/// Read the bytes of `[start, end)`.
pub fn read_range<R: Read + Seek>(r: &mut R, start: u64, end: u64) -> std::io::Result<Vec<u8>> {
    r.seek(SeekFrom::Start(start))?;
    let mut v = vec![0u8; end.saturating_sub(start) as usize];
    r.read_exact(&mut v)?;
    Ok(v)
}

/// Classic 16-bytes-per-line hexdump with an ASCII column.
pub fn hex_dump(bytes: &[u8], start_offset: u64) -> String {
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let offs = start_offset + (i as u64) * 16;
        let mut hexs = String::with_capacity(49);
        for (j, b) in chunk.iter().enumerate() {
            if j == 8 {
                hexs.push(' ');
            }
            let _ = write!(hexs, "{b:02x} ");
        }
        let ascii: String = chunk
            .iter()
            .map(|&c| if (32..=126).contains(&c) { c as char } else { '.' })
            .collect();
        let _ = writeln!(out, "{offs:08x}  {hexs:<49}  |{ascii}|");
    }
    out
}
