//! Tagged node tree with source location tracking.

use crate::SourceInfo;
use std::fmt;

/// One node of a parsed document.
///
/// Unlike `yaml_rust2::Yaml`, a node keeps the tag written on it and the raw
/// text of scalars. Type resolution of plain scalars (`42`, `true`, `~`) is
/// left to the consumer, because a tagged scalar must be handed to its tag
/// handler verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,

    /// Source location for this node.
    pub source_info: SourceInfo,

    /// YAML tag information.
    ///
    /// Local tags keep their `!` prefix (`"!EnvVar"`); core schema tags are
    /// stored fully qualified (`"tag:yaml.org,2002:str"`). The second element
    /// is the location of the tagged node.
    pub tag: Option<(String, SourceInfo)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Scalar(ScalarNode),
    Sequence(Vec<Node>),
    Mapping(Vec<NodeEntry>),
}

/// A scalar as written in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarNode {
    pub value: String,
    pub style: ScalarStyle,
}

/// How a scalar was written. Only plain scalars take part in type resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStyle {
    Plain,
    Quoted,
    Block,
}

/// A key-value pair of a mapping.
///
/// Keys are always scalars; their text is stored as written.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEntry {
    pub key: String,
    pub key_source: SourceInfo,
    pub value: Node,
}

/// The shape of a node, as far as tag handlers are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeShape::Scalar => "scalar",
            NodeShape::Sequence => "sequence",
            NodeShape::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

impl Node {
    pub fn new(kind: NodeKind, source_info: SourceInfo) -> Self {
        Self {
            kind,
            source_info,
            tag: None,
        }
    }

    pub fn scalar(value: impl Into<String>, style: ScalarStyle, source_info: SourceInfo) -> Self {
        Self::new(
            NodeKind::Scalar(ScalarNode {
                value: value.into(),
                style,
            }),
            source_info,
        )
    }

    /// The node an empty document reads as: a plain empty scalar, i.e. null.
    pub fn null(source_info: SourceInfo) -> Self {
        Self::scalar("", ScalarStyle::Plain, source_info)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some((tag.into(), self.source_info.clone()));
        self
    }

    pub fn shape(&self) -> NodeShape {
        match self.kind {
            NodeKind::Scalar(_) => NodeShape::Scalar,
            NodeKind::Sequence(_) => NodeShape::Sequence,
            NodeKind::Mapping(_) => NodeShape::Mapping,
        }
    }

    pub fn tag_name(&self) -> Option<&str> {
        self.tag.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, NodeKind::Scalar(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self.kind, NodeKind::Sequence(_))
    }

    pub fn is_mapping(&self) -> bool {
        matches!(self.kind, NodeKind::Mapping(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match &self.kind {
            NodeKind::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[NodeEntry]> {
        match &self.kind {
            NodeKind::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a mapping value by key. Returns the last entry for repeated keys.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping()?
            .iter()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    /// Number of children (sequence length or mapping entry count).
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Scalar(_) => 0,
            NodeKind::Sequence(items) => items.len(),
            NodeKind::Mapping(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
