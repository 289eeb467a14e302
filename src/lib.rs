//! Decode GoPro GPMF metadata: locate the metadata box inside the MP4 box
//! hierarchy, then turn its KLV records into a tree of typed samples.
//!
//! ```no_run
//! use gpmfbox::{decode_file, DecodeOptions, FourCC};
//!
//! let gpmf = decode_file("GX010001.MP4", &DecodeOptions::default())?;
//! if let Some(firm) = gpmf.find(&FourCC(*b"FIRM")) {
//!     println!("firmware {:?}", firm.text());
//! }
//! # Ok::<(), gpmfbox::Error>(())
//! ```

pub mod api;
pub mod boxes;
pub mod decoder;
pub mod error;
pub mod highlights;
pub mod known_keys;
pub mod node;
pub mod parser;
pub mod record;
pub mod timestamp;
pub mod types;
pub mod util;

pub use api::{HexDump, decode_file, decode_range, decode_reader, hex_range, is_mp4, locate_metadata};
pub use boxes::{Atom, FourCC};
pub use decoder::{
    DecodeObserver, DecodeOptions, LogObserver, UnsupportedTypePolicy, decode, decode_slice,
};
pub use error::{Error, Result};
pub use highlights::{find_highlights, read_highlights};
pub use known_keys::KnownKey;
pub use node::{Content, Gpmf, Node};
pub use parser::{find_box, find_boxes, locate_path, read_box_header};
pub use record::{RecordHeader, padded_length, read_record_header};
pub use types::{DecodedValue, TypeTag, decode_element};
