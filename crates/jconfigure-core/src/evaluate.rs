//! The tag dispatcher: turns a parsed document into a [`ConfigValue`].
//!
//! Evaluation is bottom-up. Untagged nodes evaluate structurally; a tagged
//! node has its shape checked against the handler first, then its children
//! are evaluated, and only then is the handler invoked with the results.

use crate::context::EvaluationContext;
use crate::error::{Cause, ConfigError, Result};
use crate::format::Format;
use crate::tags::{BUILTIN_TAGS, TagArgs, TagRegistry};
use crate::value::ConfigValue;
use indexmap::IndexMap;
use jconfigure_yaml::{CORE_TAG_PREFIX, Node, NodeEntry, NodeKind, ScalarStyle, resolve_plain_scalar};
use std::path::Path;

const MERGE_KEY: &str = "<<";
const CORE_STR_TAG: &str = "tag:yaml.org,2002:str";

/// Evaluate a document with the built-in tags.
///
/// `context.current_file()` names the document in errors and anchors
/// relative includes.
pub fn evaluate(raw: &[u8], format: Format, context: &EvaluationContext) -> Result<ConfigValue> {
    evaluate_with_registry(raw, format, context, &BUILTIN_TAGS)
}

/// Evaluate a document with a caller-supplied tag registry.
pub fn evaluate_with_registry(
    raw: &[u8],
    format: Format,
    context: &EvaluationContext,
    registry: &TagRegistry,
) -> Result<ConfigValue> {
    let file_parsing = |cause: Cause| ConfigError::FileParsing {
        path: context.current_file().to_path_buf(),
        cause,
    };

    match format {
        Format::Json => serde_json::from_slice::<serde_json::Value>(raw)
            .map(ConfigValue::from)
            .map_err(|e| file_parsing(e.into())),
        Format::Yaml => {
            let content = std::str::from_utf8(raw).map_err(|e| file_parsing(e.into()))?;
            let filename = context.current_file().to_string_lossy();
            let node = jconfigure_yaml::parse_file(content, &filename)
                .map_err(|e| file_parsing(e.into()))?;
            Evaluator::new(registry, context).evaluate_node(&node)
        }
    }
}

/// Read and evaluate a file, picking the format from its extension.
pub fn evaluate_file(
    path: &Path,
    bindings: IndexMap<String, ConfigValue>,
    registry: &TagRegistry,
) -> Result<ConfigValue> {
    let file_parsing = |cause: Cause| ConfigError::FileParsing {
        path: path.to_path_buf(),
        cause,
    };

    let format = Format::from_path(path).ok_or_else(|| {
        file_parsing(Cause::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "unsupported file extension",
        )))
    })?;
    let raw = std::fs::read(path).map_err(|e| file_parsing(e.into()))?;
    let context = EvaluationContext::with_bindings(path, bindings);
    evaluate_with_registry(&raw, format, &context, registry)
}

/// Walks a node tree within one context.
///
/// Nested includes build a new `Evaluator` over a derived context and the
/// same registry.
pub struct Evaluator<'a> {
    registry: &'a TagRegistry,
    context: &'a EvaluationContext,
}

impl<'a> Evaluator<'a> {
    pub fn new(registry: &'a TagRegistry, context: &'a EvaluationContext) -> Self {
        Self { registry, context }
    }

    pub fn context(&self) -> &'a EvaluationContext {
        self.context
    }

    pub fn registry(&self) -> &'a TagRegistry {
        self.registry
    }

    pub fn evaluate_node(&self, node: &Node) -> Result<ConfigValue> {
        match node.tag_name() {
            Some(tag) if tag.starts_with(CORE_TAG_PREFIX) => self.evaluate_core_tagged(node, tag),
            Some(tag) => self.evaluate_tagged(node, tag),
            None => self.evaluate_untagged(node),
        }
    }

    fn evaluate_untagged(&self, node: &Node) -> Result<ConfigValue> {
        match &node.kind {
            NodeKind::Scalar(scalar) => Ok(match scalar.style {
                ScalarStyle::Plain => resolve_plain_scalar(&scalar.value).into(),
                ScalarStyle::Quoted | ScalarStyle::Block => ConfigValue::String(scalar.value.clone()),
            }),
            NodeKind::Sequence(items) => items
                .iter()
                .map(|item| self.evaluate_node(item))
                .collect::<Result<Vec<_>>>()
                .map(ConfigValue::Array),
            NodeKind::Mapping(entries) => self.evaluate_mapping(entries).map(ConfigValue::Map),
        }
    }

    // `!!str` forces a string; any other core tag leaves resolution alone.
    fn evaluate_core_tagged(&self, node: &Node, tag: &str) -> Result<ConfigValue> {
        match &node.kind {
            NodeKind::Scalar(scalar) if tag == CORE_STR_TAG => {
                Ok(ConfigValue::String(scalar.value.clone()))
            }
            _ => self.evaluate_untagged(node),
        }
    }

    fn evaluate_tagged(&self, node: &Node, tag: &str) -> Result<ConfigValue> {
        let location = node.tag.as_ref().map(|(_, source_info)| source_info.clone());

        let Some(handler) = self.registry.get(tag) else {
            let known: Vec<&str> = self.registry.names().collect();
            return Err(ConfigError::TagConstruction {
                tag: tag.to_string(),
                file: self.context.current_file().to_path_buf(),
                location,
                reason: format!("Unknown tag, expected one of: {}", known.join(", ")),
                cause: None,
            });
        };

        let shape = node.shape();
        if !handler.supports(shape) {
            return Err(ConfigError::UnsupportedNodeType {
                tag: tag.to_string(),
                shape,
                file: self.context.current_file().to_path_buf(),
                location,
            });
        }

        let args = match &node.kind {
            NodeKind::Scalar(scalar) => TagArgs::Scalar(scalar.value.clone()),
            NodeKind::Sequence(items) => TagArgs::Positional(
                items
                    .iter()
                    .map(|item| self.evaluate_node(item))
                    .collect::<Result<_>>()?,
            ),
            NodeKind::Mapping(entries) => TagArgs::Named(self.evaluate_mapping(entries)?),
        };

        handler
            .apply(args, self)
            .map_err(|failure| ConfigError::TagConstruction {
                tag: tag.to_string(),
                file: self.context.current_file().to_path_buf(),
                location,
                reason: failure.reason,
                cause: failure.cause,
            })
    }

    /// Evaluate mapping entries, honoring `<<` merge keys.
    ///
    /// Merged entries come first and never override explicit keys; among
    /// several merged mappings the earliest wins. A repeated explicit key
    /// keeps its first position and its last value.
    fn evaluate_mapping(&self, entries: &[NodeEntry]) -> Result<IndexMap<String, ConfigValue>> {
        let mut merged = IndexMap::new();
        let mut explicit = IndexMap::new();

        for entry in entries {
            let value = self.evaluate_node(&entry.value)?;
            if entry.key == MERGE_KEY {
                self.merge_into(&mut merged, value, entry)?;
            } else {
                explicit.insert(entry.key.clone(), value);
            }
        }

        if merged.is_empty() {
            return Ok(explicit);
        }
        merged.extend(explicit);
        Ok(merged)
    }

    fn merge_into(
        &self,
        merged: &mut IndexMap<String, ConfigValue>,
        value: ConfigValue,
        entry: &NodeEntry,
    ) -> Result<()> {
        let sources = match value {
            ConfigValue::Map(map) => vec![map],
            ConfigValue::Array(items) if items.iter().all(ConfigValue::is_map) => items
                .into_iter()
                .filter_map(|item| match item {
                    ConfigValue::Map(map) => Some(map),
                    _ => None,
                })
                .collect(),
            other => {
                return Err(ConfigError::FileParsing {
                    path: self.context.current_file().to_path_buf(),
                    cause: Cause::Yaml(jconfigure_yaml::Error::InvalidStructure {
                        message: format!(
                            "merge key value must be a mapping or a list of mappings, found {}",
                            other.kind_name()
                        ),
                        location: Some(entry.key_source.clone()),
                    }),
                });
            }
        };

        for source in sources {
            for (key, value) in source {
                merged.entry(key).or_insert(value);
            }
        }
        Ok(())
    }
}
