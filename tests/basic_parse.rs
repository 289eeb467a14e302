use gpmfbox::boxes::FourCC;
use gpmfbox::error::Error;
use gpmfbox::parser::{find_box, find_boxes, locate_path, read_box_header};
use std::io::Cursor;

fn mp4_box(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&(8 + payload.len() as u32).to_be_bytes());
    v.extend_from_slice(tag);
    v.extend_from_slice(payload);
    v
}

fn make_minimal_file() -> Vec<u8> {
    // [ftyp] [free] [moov [udta [HMMT]]]
    let mut ftyp = Vec::new();
    ftyp.extend_from_slice(b"isom");
    ftyp.extend_from_slice(&512u32.to_be_bytes());
    ftyp.extend_from_slice(b"isom");

    let hmmt = mp4_box(b"HMMT", &0u32.to_be_bytes());
    let udta = mp4_box(b"udta", &hmmt);

    let mut v = mp4_box(b"ftyp", &ftyp);
    v.extend(mp4_box(b"free", &[]));
    v.extend(mp4_box(b"moov", &udta));
    v
}

#[test]
fn read_single_ftyp_header() {
    let data = make_minimal_file();
    let len = data.len() as u64;
    let mut cur = Cursor::new(data);

    let atom = read_box_header(&mut cur, len)
        .expect("read_box_header failed")
        .expect("no box");

    assert_eq!(atom.start, 0);
    assert_eq!(atom.end, 20);
    assert_eq!(atom.tag, FourCC(*b"ftyp"));
    assert_eq!(atom.header_size, 8);
    assert_eq!(atom.payload(), 8..20);
}

#[test]
fn top_level_boxes_have_absolute_ranges() {
    let data = make_minimal_file();
    let len = data.len() as u64;
    let mut cur = Cursor::new(data);

    let atoms = find_boxes(&mut cur, 0, len).unwrap();
    let tags: Vec<String> = atoms.iter().map(|a| a.tag.to_string()).collect();
    assert_eq!(tags, ["ftyp", "free", "moov"]);
    assert_eq!((atoms[1].start, atoms[1].end), (20, 28));
    assert_eq!((atoms[2].start, atoms[2].end), (28, len));
}

#[test]
fn descends_into_children() {
    let data = make_minimal_file();
    let len = data.len() as u64;
    let mut cur = Cursor::new(data);

    let moov = find_box(&mut cur, 0, len, FourCC::MOOV).unwrap();
    let udta = find_box(&mut cur, moov.start + 8, moov.end, FourCC::UDTA).unwrap();
    let hmmt = find_box(&mut cur, udta.start + 8, udta.end, FourCC::HMMT).unwrap();
    assert_eq!(hmmt.start, 44);
    assert_eq!(hmmt.end, len);

    let via_path = locate_path(&mut cur, 0, len, &[FourCC::MOOV, FourCC::UDTA, FourCC::HMMT])
        .unwrap();
    assert_eq!(via_path, hmmt);
}

#[test]
fn short_tail_ends_the_scan() {
    let mut data = make_minimal_file();
    let len = data.len() as u64;
    data.extend_from_slice(&[0, 0, 0]);
    let mut cur = Cursor::new(data);

    let atoms = find_boxes(&mut cur, 0, len + 3).unwrap();
    assert_eq!(atoms.len(), 3);
}

#[test]
fn range_longer_than_source_ends_the_scan() {
    let data = make_minimal_file();
    let len = data.len() as u64;
    let mut cur = Cursor::new(data);

    let atoms = find_boxes(&mut cur, 0, len + 100).unwrap();
    assert_eq!(atoms.len(), 3);
}

#[test]
fn source_ending_inside_large_size_ends_the_scan() {
    let mut data = Vec::new();
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&[0, 0, 0, 0]);
    let mut cur = Cursor::new(data);

    let atoms = find_boxes(&mut cur, 0, 64).unwrap();
    assert!(atoms.is_empty());
}

#[test]
fn box_smaller_than_header_is_malformed() {
    let mut data = Vec::new();
    data.extend_from_slice(&4u32.to_be_bytes());
    data.extend_from_slice(b"bad!");
    data.extend_from_slice(&[0u8; 8]);
    let mut cur = Cursor::new(data);

    let err = find_boxes(&mut cur, 0, 16).unwrap_err();
    assert!(matches!(err, Error::MalformedBox { offset: 0, size: 4, .. }));
}

#[test]
fn box_past_range_end_is_malformed() {
    let data = mp4_box(b"moov", &[0u8; 24]);
    let mut cur = Cursor::new(data);

    // scan only the first 16 bytes of a 32-byte box
    let err = find_boxes(&mut cur, 0, 16).unwrap_err();
    assert!(matches!(err, Error::MalformedBox { tag, .. } if tag == FourCC::MOOV));
}

#[test]
fn large_and_open_ended_sizes() {
    let mut data = Vec::new();
    // 64-bit size: 24 bytes total
    data.extend_from_slice(&1u32.to_be_bytes());
    data.extend_from_slice(b"mdat");
    data.extend_from_slice(&24u64.to_be_bytes());
    data.extend_from_slice(&[0xAA; 8]);
    // size 0: runs to end of range
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(b"free");
    data.extend_from_slice(&[0u8; 12]);
    let len = data.len() as u64;
    let mut cur = Cursor::new(data);

    let atoms = find_boxes(&mut cur, 0, len).unwrap();
    assert_eq!(atoms.len(), 2);
    assert_eq!(atoms[0].header_size, 16);
    assert_eq!(atoms[0].payload(), 16..24);
    assert_eq!((atoms[1].start, atoms[1].end), (24, len));
}

#[test]
fn missing_box_reports_path() {
    let data = make_minimal_file();
    let len = data.len() as u64;
    let mut cur = Cursor::new(data);

    let err = locate_path(&mut cur, 0, len, &[FourCC::MOOV, FourCC::UDTA, FourCC::GPMF])
        .unwrap_err();
    match err {
        Error::BoxNotFound { tag, context } => {
            assert_eq!(tag, FourCC::GPMF);
            assert_eq!(context, "moov/udta");
        }
        other => panic!("unexpected error {other:?}"),
    }
}
