use gpmfbox::boxes::FourCC;
use gpmfbox::{
    DecodeOptions, Error, decode_file, decode_range, decode_reader, find_highlights, is_mp4,
    locate_metadata, locate_path,
};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::PathBuf;

fn mp4_box(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(tag);
    v.extend_from_slice(payload);
    v
}

fn record(key: &[u8; 4], tag: u8, size: u8, repeat: u16, payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(key);
    v.push(tag);
    v.push(size);
    v.extend_from_slice(&repeat.to_be_bytes());
    v.extend_from_slice(payload);
    while v.len() % 4 != 0 {
        v.push(0);
    }
    v
}

fn settings_stream() -> Vec<u8> {
    let mut v = record(b"FIRM", b'c', 1, 15, b"H22.01.01.10.70");
    v.extend(record(b"MUID", b'L', 4, 2, &[0, 0, 0, 1, 0, 0, 0, 2]));
    v
}

/// [ftyp] [mdat] [moov [mvhd] [udta [HMMT] [<meta_tag>]]]
fn make_mp4(meta_tag: &[u8; 4], meta: &[u8]) -> Vec<u8> {
    let mut hmmt = Vec::new();
    hmmt.extend_from_slice(&2u32.to_be_bytes());
    hmmt.extend_from_slice(&1534i32.to_be_bytes());
    hmmt.extend_from_slice(&62_000i32.to_be_bytes());

    let mut udta = mp4_box(b"HMMT", &hmmt);
    udta.extend(mp4_box(meta_tag, meta));

    let mut moov = mp4_box(b"mvhd", &[0u8; 20]);
    moov.extend(mp4_box(b"udta", &udta));

    let mut v = mp4_box(b"ftyp", b"mp41\0\0\0\0mp41");
    v.extend(mp4_box(b"mdat", &[0x55; 32]));
    v.extend(mp4_box(b"moov", &moov));
    v
}

fn temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(bytes).unwrap();
    path
}

#[test]
fn located_range_decodes_to_records() {
    let data = make_mp4(b"META", &settings_stream());
    let size = data.len() as u64;
    let mut cur = Cursor::new(data);

    let meta = locate_path(&mut cur, 0, size, &[FourCC::MOOV, FourCC::UDTA, FourCC(*b"META")])
        .unwrap();
    assert_eq!(meta.end, size);
    assert_eq!(meta.payload_len(), settings_stream().len() as u64);

    let payload = meta.payload();
    let gpmf =
        decode_range(&mut cur, payload.start, payload.end, &DecodeOptions::default(), &mut ())
            .unwrap();
    assert_eq!(gpmf.len(), 2);
    assert_eq!(gpmf.nodes[0].text(), Some("H22.01.01.10.70"));
}

#[test]
fn empty_metadata_box_yields_no_records() {
    let data = make_mp4(b"META", &[]);
    let size = data.len() as u64;
    let mut cur = Cursor::new(data);

    let meta = locate_metadata(&mut cur, size, FourCC(*b"META")).unwrap();
    let payload = meta.payload();
    assert!(payload.is_empty());
    let gpmf =
        decode_range(&mut cur, payload.start, payload.end, &DecodeOptions::default(), &mut ())
            .unwrap();
    assert!(gpmf.is_empty());
}

#[test]
fn truncation_error_points_into_the_file() {
    // MUID claims 3 samples but only 2 fit inside the box
    let mut meta = record(b"MUID", b'L', 4, 3, &[0u8; 12]);
    meta.truncate(16);
    let data = make_mp4(b"GPMF", &meta);
    let size = data.len() as u64;
    let mut cur = Cursor::new(data);

    let atom = locate_metadata(&mut cur, size, FourCC::GPMF).unwrap();
    let err = decode_reader(&mut cur, FourCC::GPMF, &DecodeOptions::default(), &mut ())
        .unwrap_err();
    assert!(matches!(err, Error::TruncatedPayload { offset, .. } if offset == atom.start + 8));
}

#[test]
fn missing_metadata_box_is_reported() {
    let data = make_mp4(b"META", &settings_stream());
    let size = data.len() as u64;
    let mut cur = Cursor::new(data);

    let err = locate_metadata(&mut cur, size, FourCC::GPMF).unwrap_err();
    assert!(matches!(err, Error::BoxNotFound { tag, .. } if tag == FourCC::GPMF));
}

#[test]
fn detects_mp4_and_raw_streams() {
    let mp4 = make_mp4(b"GPMF", &settings_stream());
    let size = mp4.len() as u64;
    assert!(is_mp4(&mut Cursor::new(mp4), size).unwrap());

    let raw = settings_stream();
    let size = raw.len() as u64;
    assert!(!is_mp4(&mut Cursor::new(raw), size).unwrap());
}

#[test]
fn decode_file_handles_mp4_and_raw() {
    let mp4 = temp_file("gpmfbox_decode_file_test.mp4", &make_mp4(b"GPMF", &settings_stream()));
    let gpmf = decode_file(&mp4, &DecodeOptions::default()).expect("decode mp4 failed");
    assert_eq!(gpmf.len(), 2);

    let raw = temp_file("gpmfbox_decode_file_test.gpmf", &settings_stream());
    let gpmf_raw = decode_file(&raw, &DecodeOptions::default()).expect("decode raw failed");
    assert_eq!(gpmf, gpmf_raw);
}

#[test]
fn reads_highlight_times() {
    let data = make_mp4(b"GPMF", &settings_stream());
    let size = data.len() as u64;
    let mut cur = Cursor::new(data);

    let times = find_highlights(&mut cur, size).unwrap();
    assert_eq!(times, [1534, 62_000]);
}

#[test]
fn highlight_count_beyond_box_is_truncated() {
    let mut hmmt = Vec::new();
    hmmt.extend_from_slice(&5u32.to_be_bytes());
    hmmt.extend_from_slice(&1000i32.to_be_bytes());
    let udta = mp4_box(b"HMMT", &hmmt);
    let mut data = mp4_box(b"ftyp", b"mp41");
    data.extend(mp4_box(b"moov", &mp4_box(b"udta", &udta)));
    let size = data.len() as u64;

    let err = find_highlights(&mut Cursor::new(data), size).unwrap_err();
    assert!(matches!(err, Error::TruncatedPayload { needed: 20, available: 4, .. }));
}
