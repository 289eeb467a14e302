use crate::boxes::FourCC;
use crate::record::RecordHeader;
use crate::types::{DecodedValue, TypeTag};
use serde::{Serialize, Serializer};

/// Either nested records or the samples of a typed record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Content {
    Children(Vec<Node>),
    Samples(Vec<DecodedValue>),
}

/// One decoded GPMF record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub key: FourCC,
    #[serde(rename = "type", serialize_with = "serialize_type_tag")]
    pub type_tag: u8,
    pub element_size: u8,
    pub repeat_count: u16,
    #[serde(flatten)]
    pub content: Content,
}

fn serialize_type_tag<S: Serializer>(tag: &u8, s: S) -> Result<S::Ok, S::Error> {
    if *tag == 0 {
        s.serialize_str("")
    } else {
        s.serialize_char(*tag as char)
    }
}

impl Node {
    pub fn container(header: RecordHeader, children: Vec<Node>) -> Self {
        Self::with_content(header, Content::Children(children))
    }

    pub fn leaf(header: RecordHeader, samples: Vec<DecodedValue>) -> Self {
        Self::with_content(header, Content::Samples(samples))
    }

    fn with_content(header: RecordHeader, content: Content) -> Self {
        Self {
            key: header.key,
            type_tag: header.type_tag,
            element_size: header.element_size,
            repeat_count: header.repeat_count,
            content,
        }
    }

    pub fn key(&self) -> &FourCC {
        &self.key
    }

    /// `None` for tags only kept by permissive decoding.
    pub fn type_tag(&self) -> Option<TypeTag> {
        TypeTag::from_byte(self.type_tag)
    }

    pub fn header(&self) -> RecordHeader {
        RecordHeader::new(self.key, self.type_tag, self.element_size, self.repeat_count)
    }

    pub fn is_container(&self) -> bool {
        matches!(self.content, Content::Children(_))
    }

    /// Nested records; empty for typed records.
    pub fn children(&self) -> &[Node] {
        match &self.content {
            Content::Children(c) => c,
            Content::Samples(_) => &[],
        }
    }

    /// Samples; empty for containers and undecoded records.
    pub fn samples(&self) -> &[DecodedValue] {
        match &self.content {
            Content::Samples(s) => s,
            Content::Children(_) => &[],
        }
    }

    /// The text of a single-string record, e.g. `STNM` or `DVNM`.
    pub fn text(&self) -> Option<&str> {
        match self.samples() {
            [DecodedValue::Text(s)] => Some(s.as_str()),
            _ => None,
        }
    }

    /// First direct child with `key`.
    pub fn find(&self, key: &FourCC) -> Option<&Node> {
        self.children().iter().find(|n| &n.key == key)
    }

    /// All direct children with `key`, in stream order.
    pub fn find_all(&self, key: &FourCC) -> Vec<&Node> {
        find_all(self.children(), key)
    }

    pub fn nth(&self, index: usize) -> Option<&Node> {
        self.children().get(index)
    }

    /// Follow `path` one level per key, first match at each level.
    pub fn find_path(&self, path: &[FourCC]) -> Option<&Node> {
        find_path(self.children(), path)
    }

    /// First descendant with `key`, depth-first in stream order.
    pub fn find_recursive(&self, key: &FourCC) -> Option<&Node> {
        find_recursive(self.children(), key)
    }
}

pub(crate) fn find_all<'a>(nodes: &'a [Node], key: &FourCC) -> Vec<&'a Node> {
    nodes.iter().filter(|n| &n.key == key).collect()
}

pub(crate) fn find_path<'a>(nodes: &'a [Node], path: &[FourCC]) -> Option<&'a Node> {
    let (first, rest) = path.split_first()?;
    let node = nodes.iter().find(|n| &n.key == first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        find_path(node.children(), rest)
    }
}

pub(crate) fn find_recursive<'a>(nodes: &'a [Node], key: &FourCC) -> Option<&'a Node> {
    for node in nodes {
        if &node.key == key {
            return Some(node);
        }
        if let Some(found) = find_recursive(node.children(), key) {
            return Some(found);
        }
    }
    None
}

/// Decoded top-level records of one metadata range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Gpmf {
    pub nodes: Vec<Node>,
}

impl Gpmf {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn first(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn nth(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn find(&self, key: &FourCC) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.key == key)
    }

    pub fn find_all(&self, key: &FourCC) -> Vec<&Node> {
        find_all(&self.nodes, key)
    }

    pub fn find_path(&self, path: &[FourCC]) -> Option<&Node> {
        find_path(&self.nodes, path)
    }

    pub fn find_recursive(&self, key: &FourCC) -> Option<&Node> {
        find_recursive(&self.nodes, key)
    }

    /// Stream names (`STNM`) of every `DEVC/STRM`, in stream order.
    pub fn stream_names(&self) -> Vec<&str> {
        self.find_all(&FourCC(*b"DEVC"))
            .into_iter()
            .flat_map(|devc| devc.find_all(&FourCC(*b"STRM")))
            .filter_map(|strm| strm.find(&FourCC(*b"STNM")).and_then(Node::text))
            .collect()
    }
}

impl IntoIterator for Gpmf {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}
