use std::io;

use thiserror::Error;

use crate::boxes::FourCC;

#[derive(Debug, Error)]
pub enum Error {
    /// Passthrough for IO errors (open/read/seek).
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A box header's declared length does not fit its enclosing range.
    #[error("malformed box {tag} at offset {offset}: size {size}: {message}")]
    MalformedBox {
        tag: FourCC,
        offset: u64,
        size: u64,
        message: String,
    },

    /// A required box is absent from the scanned range.
    #[error("box {tag} not found in {context}")]
    BoxNotFound { tag: FourCC, context: String },

    /// Fewer than 8 bytes left where a record header was expected.
    #[error("truncated record header at offset {offset}: {available} bytes available")]
    TruncatedHeader { offset: u64, available: u64 },

    /// A record payload would cross the end of its enclosing range.
    #[error(
        "truncated payload for {key} at offset {offset}: needs {needed} bytes, {available} available"
    )]
    TruncatedPayload {
        key: FourCC,
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Type tag outside the known table.
    #[error("unsupported type {tag:?} for {key} at offset {offset}")]
    UnsupportedType { key: FourCC, offset: u64, tag: char },

    /// Element size that cannot hold a whole number of scalars.
    #[error("invalid element size {size} for type {tag:?} in {key} at offset {offset}")]
    InvalidElementSize {
        key: FourCC,
        offset: u64,
        tag: char,
        size: u8,
    },

    /// Fixed-width timestamp fields did not parse.
    #[error("invalid timestamp {raw:?}: {message}")]
    InvalidTimestamp { raw: String, message: String },

    /// Container nesting beyond the configured limit.
    #[error("nesting deeper than {max_depth} levels at {key}, offset {offset}")]
    DepthExceeded {
        key: FourCC,
        offset: u64,
        max_depth: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
