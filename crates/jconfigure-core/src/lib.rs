//! # jconfigure-core
//!
//! Layered application configuration with tag-evaluated documents.
//!
//! A configuration is assembled from JSON and YAML files found by basename
//! across a list of directories: first the defaults, then every active
//! profile, each file deep-merged over the result so far. YAML documents may
//! use a small tag vocabulary that is evaluated while the file is read:
//!
//! | Tag | Result |
//! |-----|--------|
//! | `!EnvVar` | a process environment variable, with optional default |
//! | `!ContextValue` | a caller-supplied binding, with optional default |
//! | `!JoinFilePaths` | path segments joined with the platform separator |
//! | `!Chain` | several lists concatenated |
//! | `!StringFormat` | a template with positional or named substitution |
//! | `!IncludeJson` | a JSON file, relative to the current file |
//! | `!IncludeYaml` | a YAML file evaluated with the same tags and bindings |
//! | `!IncludeText` | the trimmed content of a text file |
//!
//! Tags evaluate bottom-up: arguments of a tag are fully evaluated, nested
//! tags and aliases included, before the tag itself runs.
//!
//! ## Example
//!
//! ```rust
//! use jconfigure_core::{EvaluationContext, Format, evaluate};
//!
//! let doc = b"greeting: !StringFormat ['{} is a {}', [echo, cat]]";
//! let context = EvaluationContext::new("app.yaml");
//! let config = evaluate(doc, Format::Yaml, &context).unwrap();
//! assert_eq!(config.get("greeting").and_then(|v| v.as_str()), Some("echo is a cat"));
//! ```

pub mod context;
pub mod error;
pub mod evaluate;
pub mod format;
pub mod loader;
pub mod merge;
pub mod tags;
pub mod value;

pub use context::EvaluationContext;
pub use error::{Cause, ConfigError, Result};
pub use evaluate::{Evaluator, evaluate, evaluate_file, evaluate_with_registry};
pub use format::{Format, SUPPORTED_FILE_EXTENSIONS};
pub use loader::{ConfigLoader, LoadOptions, load};
pub use merge::{merge, merge_all};
pub use tags::{BUILTIN_TAGS, TagArgs, TagFailure, TagHandler, TagRegistry};
pub use value::ConfigValue;
