//! # jconfigure-yaml
//!
//! Tag-aware YAML reading with source location tracking.
//!
//! This crate turns YAML text into a [`Node`] tree: every node is a scalar,
//! a sequence or a mapping, optionally carries a tag (`!EnvVar`,
//! `!IncludeYaml`, ...), and records where it came from. The tree is the input
//! of the tag evaluator in `jconfigure-core`, which needs three things the
//! stock `yaml-rust2` loader does not give it:
//!
//! - the tag of every node, including collections
//! - the raw text and style of scalars, so tagged scalars can be read verbatim
//! - line/column information for file-scoped error messages
//!
//! ## Aliases
//!
//! Aliases are expanded while the tree is built: an anchored node is recorded
//! once it is complete and every `*alias` inserts a copy of it. Consumers
//! therefore never see an alias, and a tag applied to an aliased node sees the
//! fully expanded children.
//!
//! ## Example
//!
//! ```rust
//! use jconfigure_yaml::parse;
//!
//! let node = parse("home: !EnvVar HOME").unwrap();
//! let home = node.get("home").unwrap();
//! assert_eq!(home.tag_name(), Some("!EnvVar"));
//! assert_eq!(home.as_scalar().unwrap().value, "HOME");
//! ```

mod error;
mod node;
mod parser;
mod scalar;
mod source_info;

pub use error::{Error, Result};
pub use node::{Node, NodeEntry, NodeKind, NodeShape, ScalarNode, ScalarStyle};
pub use parser::{CORE_TAG_PREFIX, parse, parse_file};
pub use scalar::{ScalarValue, resolve_plain_scalar};
pub use source_info::SourceInfo;
