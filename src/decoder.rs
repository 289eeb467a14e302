//! Recursive GPMF decoding over a bounded byte range.
//!
//! Nesting is walked with an explicit stack of frames, one per open
//! container, so hostile input cannot exhaust the call stack. Each frame owns
//! a sub-range of the one shared buffer and the nodes decoded so far.

use crate::error::{Error, Result};
use crate::node::{Gpmf, Node};
use crate::record::{HEADER_SIZE, RecordHeader, read_record_header};
use crate::types::{DecodedValue, TypeTag, decode_element};

/// What to do with a type byte outside the known table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedTypePolicy {
    /// Abort the decode with `UnsupportedType`.
    #[default]
    Fail,
    /// Keep the record with no samples, like `?`.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub unsupported: UnsupportedTypePolicy,
    /// Deepest container nesting accepted.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            unsupported: UnsupportedTypePolicy::Fail,
            max_depth: 64,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip unknown type tags instead of failing.
    pub fn permissive(mut self, yes: bool) -> Self {
        self.unsupported = if yes {
            UnsupportedTypePolicy::Skip
        } else {
            UnsupportedTypePolicy::Fail
        };
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Receives decode progress. All methods default to doing nothing.
pub trait DecodeObserver {
    /// A header was read at absolute `offset`; `depth` is 0 for top level.
    fn record(&mut self, _depth: usize, _offset: u64, _header: &RecordHeader) {}

    /// A record's payload was left undecoded (`?`, or an unknown tag under
    /// [`UnsupportedTypePolicy::Skip`]).
    fn skipped(&mut self, _offset: u64, _header: &RecordHeader) {}

    /// A timestamp sample failed to parse and was replaced by `None`.
    fn invalid_timestamp(&mut self, _offset: u64, _header: &RecordHeader, _err: &Error) {}
}

/// Observer that discards everything.
impl DecodeObserver for () {}

/// Forwards decode events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl DecodeObserver for LogObserver {
    fn record(&mut self, depth: usize, offset: u64, h: &RecordHeader) {
        log::debug!(
            "{:indent$}<{}> <{}> {} {} @{offset}",
            "",
            h.key,
            if h.is_container() { String::new() } else { h.tag_char().to_string() },
            h.element_size,
            h.repeat_count,
            indent = depth * 2,
        );
    }

    fn skipped(&mut self, offset: u64, h: &RecordHeader) {
        log::warn!(
            "skipping {} bytes of {} (type {:?}) at offset {offset}",
            h.payload_len(),
            h.key,
            h.tag_char()
        );
    }

    fn invalid_timestamp(&mut self, offset: u64, h: &RecordHeader, err: &Error) {
        log::warn!("{} at offset {offset}: {err}", h.key);
    }
}

struct Frame {
    /// header of the open container; `None` for the root range
    parent: Option<RecordHeader>,
    cursor: usize,
    end: usize,
    nodes: Vec<Node>,
}

/// Decode every record in `buf`, where `buf[0]` sits at absolute offset
/// `base`.
///
/// Stops exactly at the end of `buf`; any header or payload that would read
/// past the end of its enclosing range fails instead of reading on.
pub fn decode_slice(
    buf: &[u8],
    base: u64,
    opts: &DecodeOptions,
    observer: &mut dyn DecodeObserver,
) -> Result<Gpmf> {
    let mut stack = vec![Frame {
        parent: None,
        cursor: 0,
        end: buf.len(),
        nodes: Vec::new(),
    }];

    loop {
        let depth = stack.len().saturating_sub(1);
        let Some(frame) = stack.last_mut() else {
            return Ok(Gpmf::default());
        };

        if frame.cursor >= frame.end {
            // Closed level: hand the nodes to the enclosing container.
            let Some(done) = stack.pop() else { continue };
            let Some(header) = done.parent else {
                return Ok(Gpmf::new(done.nodes));
            };
            if let Some(outer) = stack.last_mut() {
                outer.nodes.push(Node::container(header, done.nodes));
            }
            continue;
        }

        let pos = frame.cursor;
        let offset = base + pos as u64;
        let header = read_record_header(buf, pos, frame.end, base)?;
        observer.record(depth, offset, &header);

        let payload_start = pos + HEADER_SIZE;
        let payload_end = payload_start + header.payload_len();
        // The last record of a range may leave its padding out.
        frame.cursor = (payload_start + header.padded_len()).min(frame.end);

        if header.is_container() {
            if depth >= opts.max_depth {
                return Err(Error::DepthExceeded {
                    key: header.key,
                    offset,
                    max_depth: opts.max_depth,
                });
            }
            stack.push(Frame {
                parent: Some(header),
                cursor: payload_start,
                end: payload_end,
                nodes: Vec::new(),
            });
            continue;
        }

        let payload = &buf[payload_start..payload_end];
        let samples = decode_samples(&header, offset, payload, opts, observer)?;
        frame.nodes.push(Node::leaf(header, samples));
    }
}

/// Split a typed payload into samples and decode each one.
fn decode_samples(
    header: &RecordHeader,
    offset: u64,
    payload: &[u8],
    opts: &DecodeOptions,
    observer: &mut dyn DecodeObserver,
) -> Result<Vec<DecodedValue>> {
    let tag = match TypeTag::from_byte(header.type_tag) {
        Some(TypeTag::Complex) => {
            observer.skipped(offset, header);
            return Ok(Vec::new());
        }
        Some(tag) => tag,
        None => match opts.unsupported {
            UnsupportedTypePolicy::Skip => {
                observer.skipped(offset, header);
                return Ok(Vec::new());
            }
            UnsupportedTypePolicy::Fail => {
                return Err(Error::UnsupportedType {
                    key: header.key,
                    offset,
                    tag: header.tag_char(),
                });
            }
        },
    };

    if !tag.accepts_element_size(header.element_size) {
        return Err(Error::InvalidElementSize {
            key: header.key,
            offset,
            tag: header.tag_char(),
            size: header.element_size,
        });
    }

    // A 1-byte `c` record is one string `repeat_count` bytes long.
    if tag == TypeTag::Char && header.element_size == 1 {
        return Ok(decode_element(tag, payload)?.into_iter().collect());
    }

    let mut samples = Vec::with_capacity(header.repeat_count as usize);
    for chunk in payload.chunks_exact(header.element_size as usize) {
        match decode_element(tag, chunk) {
            Ok(Some(value)) => samples.push(value),
            Ok(None) => {}
            Err(err @ Error::InvalidTimestamp { .. }) => {
                observer.invalid_timestamp(offset, header, &err);
                samples.push(DecodedValue::Timestamp(None));
            }
            Err(err) => return Err(err),
        }
    }
    Ok(samples)
}

/// Decode with default options and no observer.
pub fn decode(buf: &[u8]) -> Result<Gpmf> {
    decode_slice(buf, 0, &DecodeOptions::default(), &mut ())
}
