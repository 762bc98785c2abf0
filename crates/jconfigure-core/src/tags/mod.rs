//! Tag registry and the built-in tag handlers.
//!
//! A tag handler is a pure function from already-evaluated arguments (plus
//! the [`Evaluator`] for context and nested includes) to a [`ConfigValue`].
//! Each handler declares up front which node shapes it accepts; the
//! dispatcher rejects any other shape before evaluating children.
//!
//! Arguments arrive in one of three forms:
//!
//! - scalar node: the raw scalar text, seen as the first positional argument
//! - sequence node: positional arguments
//! - mapping node: keyword arguments
//!
//! Handlers that accept both sequences and mappings treat position `n` and
//! the keyword of the same parameter as aliases.

mod chain;
mod include;
mod lookup;
mod paths;
mod string_format;

use crate::error::Cause;
use crate::evaluate::Evaluator;
use crate::value::ConfigValue;
use indexmap::IndexMap;
use jconfigure_yaml::NodeShape;
use once_cell::sync::Lazy;

/// Process-wide registry of the built-in tags, built once on first use.
pub static BUILTIN_TAGS: Lazy<TagRegistry> = Lazy::new(TagRegistry::builtin);

const SCALAR_OR_MAPPING: &[NodeShape] = &[NodeShape::Scalar, NodeShape::Mapping];
const SEQUENCE_OR_MAPPING: &[NodeShape] = &[NodeShape::Sequence, NodeShape::Mapping];

/// The built-in tag handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagHandler {
    /// `!EnvVar`: read a process environment variable.
    EnvVar,
    /// `!ContextValue`: read a caller-supplied context binding.
    ContextValue,
    /// `!JoinFilePaths`: join path segments with the platform separator.
    JoinFilePaths,
    /// `!Chain`: concatenate lists.
    Chain,
    /// `!StringFormat`: substitute arguments into a template.
    StringFormat,
    /// `!IncludeJson`: parse a JSON file relative to the current file.
    IncludeJson,
    /// `!IncludeYaml`: evaluate a YAML file relative to the current file.
    IncludeYaml,
    /// `!IncludeText`: read a text file relative to the current file, trimmed.
    IncludeText,
}

impl TagHandler {
    pub const ALL: [TagHandler; 8] = [
        TagHandler::EnvVar,
        TagHandler::ContextValue,
        TagHandler::JoinFilePaths,
        TagHandler::Chain,
        TagHandler::StringFormat,
        TagHandler::IncludeJson,
        TagHandler::IncludeYaml,
        TagHandler::IncludeText,
    ];

    /// The tag as written in documents.
    pub fn name(self) -> &'static str {
        match self {
            TagHandler::EnvVar => "!EnvVar",
            TagHandler::ContextValue => "!ContextValue",
            TagHandler::JoinFilePaths => "!JoinFilePaths",
            TagHandler::Chain => "!Chain",
            TagHandler::StringFormat => "!StringFormat",
            TagHandler::IncludeJson => "!IncludeJson",
            TagHandler::IncludeYaml => "!IncludeYaml",
            TagHandler::IncludeText => "!IncludeText",
        }
    }

    pub fn supported_shapes(self) -> &'static [NodeShape] {
        match self {
            TagHandler::EnvVar
            | TagHandler::ContextValue
            | TagHandler::IncludeJson
            | TagHandler::IncludeYaml
            | TagHandler::IncludeText => SCALAR_OR_MAPPING,
            TagHandler::JoinFilePaths | TagHandler::Chain | TagHandler::StringFormat => {
                SEQUENCE_OR_MAPPING
            }
        }
    }

    pub fn supports(self, shape: NodeShape) -> bool {
        self.supported_shapes().contains(&shape)
    }

    /// Run the handler on evaluated arguments.
    pub(crate) fn apply(
        self,
        args: TagArgs,
        evaluator: &Evaluator<'_>,
    ) -> Result<ConfigValue, TagFailure> {
        let args = Arguments::from(args);
        match self {
            TagHandler::EnvVar => lookup::env_var(args),
            TagHandler::ContextValue => lookup::context_value(args, evaluator.context()),
            TagHandler::JoinFilePaths => paths::join_file_paths(args),
            TagHandler::Chain => chain::chain(args),
            TagHandler::StringFormat => string_format::string_format(args),
            TagHandler::IncludeJson => include::include_json(args, evaluator),
            TagHandler::IncludeYaml => include::include_yaml(args, evaluator),
            TagHandler::IncludeText => include::include_text(args, evaluator),
        }
    }
}

/// Immutable mapping from tag name to handler.
///
/// The default registry holds the built-in vocabulary under its canonical
/// names. Custom registries can restrict the vocabulary or register extra
/// spellings, which is mostly useful in tests.
#[derive(Debug, Clone)]
pub struct TagRegistry {
    handlers: IndexMap<String, TagHandler>,
}

impl TagRegistry {
    /// A registry that knows no tags at all.
    pub fn empty() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// All built-in tags under their canonical names.
    pub fn builtin() -> Self {
        TagHandler::ALL
            .into_iter()
            .fold(Self::empty(), |registry, handler| {
                registry.with(handler.name(), handler)
            })
    }

    /// Register `handler` under `name` (including the leading `!`).
    pub fn with(mut self, name: impl Into<String>, handler: TagHandler) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<TagHandler> {
        self.handlers.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Evaluated children of a tagged node.
#[derive(Debug, Clone, PartialEq)]
pub enum TagArgs {
    /// Raw text of a tagged scalar.
    Scalar(String),
    /// Evaluated items of a tagged sequence.
    Positional(Vec<ConfigValue>),
    /// Evaluated entries of a tagged mapping.
    Named(IndexMap<String, ConfigValue>),
}

/// Why a handler could not produce a value.
#[derive(Debug)]
pub struct TagFailure {
    pub reason: String,
    pub cause: Option<Cause>,
}

impl TagFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            cause: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

/// Parameter access shared by the handlers.
///
/// Every parameter is addressed by both its position and its keyword;
/// whichever matches the form the arguments came in is used. Arguments that
/// no handler asked for are reported by [`Arguments::finish`].
pub(crate) struct Arguments {
    positional: Vec<Option<ConfigValue>>,
    named: IndexMap<String, ConfigValue>,
    is_named: bool,
}

impl From<TagArgs> for Arguments {
    fn from(args: TagArgs) -> Self {
        match args {
            TagArgs::Scalar(text) => Self {
                positional: vec![Some(ConfigValue::String(text))],
                named: IndexMap::new(),
                is_named: false,
            },
            TagArgs::Positional(items) => Self {
                positional: items.into_iter().map(Some).collect(),
                named: IndexMap::new(),
                is_named: false,
            },
            TagArgs::Named(entries) => Self {
                positional: Vec::new(),
                named: entries,
                is_named: true,
            },
        }
    }
}

impl Arguments {
    /// Take a parameter by position or keyword.
    pub(crate) fn take(&mut self, position: usize, name: &str) -> Option<ConfigValue> {
        if self.is_named {
            self.named.shift_remove(name)
        } else {
            self.positional.get_mut(position).and_then(Option::take)
        }
    }

    /// Take a required string parameter.
    pub(crate) fn take_string(
        &mut self,
        position: usize,
        name: &str,
    ) -> Result<String, TagFailure> {
        match self.take(position, name) {
            Some(ConfigValue::String(s)) => Ok(s),
            Some(_) => Err(TagFailure::new(format!(
                "{} must be a string!",
                self.describe(position, name)
            ))),
            None => Err(TagFailure::new(format!("Missing required argument '{name}'"))),
        }
    }

    /// Take every positional argument, or the list under `name` for keyword
    /// arguments.
    pub(crate) fn take_variadic(&mut self, name: &str) -> Result<Vec<ConfigValue>, TagFailure> {
        if !self.is_named {
            return Ok(self.positional.drain(..).flatten().collect());
        }

        match self.named.shift_remove(name) {
            Some(ConfigValue::Array(items)) => Ok(items),
            Some(other) => Err(TagFailure::new(format!(
                "'{name}' keyword argument must be a list, got {}",
                other.kind_name()
            ))),
            None => Ok(Vec::new()),
        }
    }

    /// Human readable name of a parameter slot in the form the arguments
    /// came in: `First list argument` or `'string' keyword argument`.
    pub(crate) fn describe(&self, position: usize, name: &str) -> String {
        if self.is_named {
            format!("'{name}' keyword argument")
        } else {
            format!("{} list argument", ordinal(position))
        }
    }

    /// Fail on arguments no parameter consumed.
    pub(crate) fn finish(self) -> Result<(), TagFailure> {
        if let Some(name) = self.named.keys().next() {
            return Err(TagFailure::new(format!("Unexpected keyword argument '{name}'")));
        }
        if let Some(position) = self.positional.iter().position(Option::is_some) {
            return Err(TagFailure::new(format!(
                "Unexpected {} list argument",
                ordinal(position).to_lowercase()
            )));
        }
        Ok(())
    }
}

fn ordinal(position: usize) -> String {
    const WORDS: [&str; 5] = ["First", "Second", "Third", "Fourth", "Fifth"];
    WORDS.get(position).map_or_else(
        || format!("Argument #{}", position + 1),
        |word| word.to_string(),
    )
}
