//! YAML parser that builds tagged `Node` trees.

use crate::{Error, Node, NodeEntry, NodeKind, Result, ScalarStyle, SourceInfo};
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

/// Prefix of the YAML core schema tags (`!!str`, `!!int`, ...).
pub const CORE_TAG_PREFIX: &str = "tag:yaml.org,2002:";

/// Parse YAML from a string, producing a `Node` tree.
///
/// Only the first document of a stream is read. An empty stream (or one that
/// holds only comments) reads as a null scalar.
///
/// # Example
///
/// ```rust
/// use jconfigure_yaml::parse;
///
/// let node = parse("title: My Document").unwrap();
/// assert!(node.is_mapping());
/// ```
///
/// # Errors
///
/// Returns an error if the YAML is invalid or uses a non-scalar mapping key.
pub fn parse(content: &str) -> Result<Node> {
    parse_impl(content, None)
}

/// Parse YAML from a string with an associated filename.
///
/// The filename is attached to the source location of every node and of
/// parse errors.
///
/// ```rust
/// use jconfigure_yaml::parse_file;
///
/// let node = parse_file("title: Test", "config.yaml").unwrap();
/// assert_eq!(node.source_info.file, Some("config.yaml".into()));
/// ```
pub fn parse_file(content: &str, filename: &str) -> Result<Node> {
    parse_impl(content, Some(filename))
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<Node> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = NodeBuilder::new(filename);

    parser
        .load(&mut builder, false) // false = single document only
        .map_err(|err| with_filename(Error::from(err), filename))?;

    builder.result()
}

fn with_filename(err: Error, filename: Option<&str>) -> Error {
    match (err, filename) {
        (Error::ParseError { message, location }, Some(file)) => Error::ParseError {
            message,
            location: location.map(|loc| loc.with_file(file)),
        },
        (err, _) => err,
    }
}

/// Builder that implements MarkedEventReceiver to construct a `Node` tree.
struct NodeBuilder {
    filename: Option<String>,

    /// Collections being constructed
    stack: Vec<BuildNode>,

    /// Completed anchored nodes by anchor id, for alias expansion
    anchors: HashMap<usize, Node>,

    root: Option<Node>,

    /// First structural error; events keep flowing after it is set
    error: Option<Error>,
}

enum BuildNode {
    Sequence {
        start_marker: Marker,
        anchor_id: usize,
        tag: Option<String>,
        items: Vec<Node>,
    },

    Mapping {
        start_marker: Marker,
        anchor_id: usize,
        tag: Option<String>,
        entries: Vec<NodeEntry>,
        pending_key: Option<(String, SourceInfo)>,
    },
}

impl NodeBuilder {
    fn new(filename: Option<&str>) -> Self {
        Self {
            filename: filename.map(str::to_string),
            stack: Vec::new(),
            anchors: HashMap::new(),
            root: None,
            error: None,
        }
    }

    fn result(self) -> Result<Node> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(Error::InvalidStructure {
                message: "unterminated collection".into(),
                location: None,
            });
        }

        let empty_location = match &self.filename {
            Some(file) => SourceInfo::default().with_file(file.clone()),
            None => SourceInfo::default(),
        };
        Ok(self.root.unwrap_or_else(|| Node::null(empty_location)))
    }

    fn fail(&mut self, message: impl Into<String>, location: SourceInfo) {
        if self.error.is_none() {
            self.error = Some(Error::InvalidStructure {
                message: message.into(),
                location: Some(location),
            });
        }
    }

    fn make_source_info(&self, marker: &Marker, len: usize) -> SourceInfo {
        let info = SourceInfo::from_marker(marker, len);
        match &self.filename {
            Some(filename) => info.with_file(filename.clone()),
            None => info,
        }
    }

    fn record_anchor(&mut self, anchor_id: usize, node: &Node) {
        if anchor_id > 0 {
            self.anchors.insert(anchor_id, node.clone());
        }
    }

    fn push_complete(&mut self, node: Node) {
        let Some(parent) = self.stack.last_mut() else {
            if self.root.is_none() {
                self.root = Some(node);
            }
            return;
        };

        let bad_key = match parent {
            BuildNode::Sequence { items, .. } => {
                items.push(node);
                None
            }
            BuildNode::Mapping {
                entries,
                pending_key,
                ..
            } => match pending_key.take() {
                Some((key, key_source)) => {
                    entries.push(NodeEntry {
                        key,
                        key_source,
                        value: node,
                    });
                    None
                }
                None => {
                    let shape = node.shape();
                    match node.kind {
                        NodeKind::Scalar(scalar) => {
                            *pending_key = Some((scalar.value, node.source_info));
                            None
                        }
                        _ => {
                            // Keep key/value alternation intact so later
                            // events still line up.
                            *pending_key = Some((String::new(), node.source_info.clone()));
                            Some((shape, node.source_info))
                        }
                    }
                }
            },
        };

        if let Some((shape, location)) = bad_key {
            self.fail(format!("mapping keys must be scalars, found a {shape}"), location);
        }
    }
}

fn tag_name(tag: &Tag) -> String {
    match tag.handle.as_str() {
        "!!" => format!("{CORE_TAG_PREFIX}{}", tag.suffix),
        // A lone `!` is the non-specific tag, which forces a string.
        "" if tag.suffix == "!" => format!("{CORE_TAG_PREFIX}str"),
        "!" if tag.suffix.is_empty() => format!("{CORE_TAG_PREFIX}str"),
        "!" => format!("!{}", tag.suffix),
        handle => format!("{handle}{}", tag.suffix),
    }
}

fn scalar_style(style: TScalarStyle) -> ScalarStyle {
    match style {
        TScalarStyle::Plain => ScalarStyle::Plain,
        TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted => ScalarStyle::Quoted,
        _ => ScalarStyle::Block,
    }
}

impl MarkedEventReceiver for NodeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::Scalar(value, style, anchor_id, tag) => {
                let source_info = self.make_source_info(&marker, value.len());
                let mut node = Node::scalar(value, scalar_style(style), source_info);
                if let Some(tag) = tag {
                    node = node.with_tag(tag_name(&tag));
                }

                self.record_anchor(anchor_id, &node);
                self.push_complete(node);
            }

            Event::SequenceStart(anchor_id, tag) => {
                self.stack.push(BuildNode::Sequence {
                    start_marker: marker,
                    anchor_id,
                    tag: tag.as_ref().map(tag_name),
                    items: Vec::new(),
                });
            }

            Event::MappingStart(anchor_id, tag) => {
                self.stack.push(BuildNode::Mapping {
                    start_marker: marker,
                    anchor_id,
                    tag: tag.as_ref().map(tag_name),
                    entries: Vec::new(),
                    pending_key: None,
                });
            }

            Event::SequenceEnd | Event::MappingEnd => {
                let Some(build_node) = self.stack.pop() else {
                    let location = self.make_source_info(&marker, 0);
                    self.fail("collection end without a start", location);
                    return;
                };

                let (start_marker, anchor_id, tag, kind) = match build_node {
                    BuildNode::Sequence {
                        start_marker,
                        anchor_id,
                        tag,
                        items,
                    } => (start_marker, anchor_id, tag, NodeKind::Sequence(items)),
                    BuildNode::Mapping {
                        start_marker,
                        anchor_id,
                        tag,
                        entries,
                        ..
                    } => (start_marker, anchor_id, tag, NodeKind::Mapping(entries)),
                };

                let len = marker.index().saturating_sub(start_marker.index());
                let mut node = Node::new(kind, self.make_source_info(&start_marker, len));
                if let Some(tag) = tag {
                    node = node.with_tag(tag);
                }

                self.record_anchor(anchor_id, &node);
                self.push_complete(node);
            }

            Event::Alias(anchor_id) => match self.anchors.get(&anchor_id).cloned() {
                Some(node) => self.push_complete(node),
                None => {
                    let location = self.make_source_info(&marker, 0);
                    self.fail("alias refers to an unknown anchor", location.clone());
                    self.push_complete(Node::null(location));
                }
            },

            // Stream and document boundaries carry no content.
            _ => {}
        }
    }
}
