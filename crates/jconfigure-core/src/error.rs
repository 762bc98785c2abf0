//! Error types for evaluation and loading.

use jconfigure_yaml::{NodeShape, SourceInfo};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while evaluating or loading configuration files.
///
/// Every variant aborts the file currently being evaluated. Whether that
/// aborts a whole multi-file load is up to
/// [`LoadOptions::fail_on_parse_error`](crate::LoadOptions::fail_on_parse_error).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An expected basename was found in none of the configuration directories.
    #[error("No files found for basename {basename} in any directory")]
    FilesNotFound { basename: String },

    /// The file could not be read or is not well-formed JSON/YAML.
    #[error("Failed to parse {}: {cause}", path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        cause: Cause,
    },

    /// A tag was used incorrectly or could not produce a value.
    ///
    /// `reason` is a stable, literal message; callers may match on it.
    #[error("{tag} failed in {}: {reason}", site(file, location))]
    TagConstruction {
        tag: String,
        file: PathBuf,
        location: Option<SourceInfo>,
        reason: String,
        #[source]
        cause: Option<Cause>,
    },

    /// A tag was applied to a node shape its handler does not accept.
    #[error("{tag} does not support {shape} nodes (in {})", site(file, location))]
    UnsupportedNodeType {
        tag: String,
        shape: NodeShape,
        file: PathBuf,
        location: Option<SourceInfo>,
    },
}

/// Underlying failure wrapped by [`ConfigError`].
#[derive(Debug, Error)]
pub enum Cause {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] jconfigure_yaml::Error),

    #[error("top-level value must be a mapping, found {0}")]
    NotAMapping(&'static str),

    /// A nested evaluation failed, e.g. inside an included YAML file.
    #[error(transparent)]
    Config(#[from] Box<ConfigError>),
}

impl ConfigError {
    /// The literal reason of a `TagConstruction` error.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ConfigError::TagConstruction { reason, .. } => Some(reason),
            _ => None,
        }
    }

    /// The tag involved, for tag errors.
    pub fn tag(&self) -> Option<&str> {
        match self {
            ConfigError::TagConstruction { tag, .. }
            | ConfigError::UnsupportedNodeType { tag, .. } => Some(tag),
            _ => None,
        }
    }
}

fn site(file: &std::path::Path, location: &Option<SourceInfo>) -> String {
    match location {
        Some(loc) => format!("{}:{}:{}", file.display(), loc.line, loc.col),
        None => file.display().to_string(),
    }
}

/// Result type alias for jconfigure-core operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_tag_construction_display() {
        let err = ConfigError::TagConstruction {
            tag: "!StringFormat".into(),
            file: PathBuf::from("config/app.yaml"),
            location: Some(SourceInfo::new(None, 0, 3, 9, 0)),
            reason: "First list argument must be a string!".into(),
            cause: None,
        };
        assert_eq!(
            err.to_string(),
            "!StringFormat failed in config/app.yaml:3:9: First list argument must be a string!"
        );
        assert_eq!(err.reason(), Some("First list argument must be a string!"));
        assert_eq!(err.tag(), Some("!StringFormat"));
    }

    #[test]
    fn test_unsupported_node_type_display() {
        let err = ConfigError::UnsupportedNodeType {
            tag: "!EnvVar".into(),
            shape: NodeShape::Sequence,
            file: PathBuf::from("app.yaml"),
            location: None,
        };
        assert_eq!(err.to_string(), "!EnvVar does not support sequence nodes (in app.yaml)");
    }

    #[test]
    fn test_nested_cause_is_exposed_as_source() {
        let inner = ConfigError::FilesNotFound {
            basename: "prod".into(),
        };
        let outer = ConfigError::TagConstruction {
            tag: "!IncludeYaml".into(),
            file: PathBuf::from("app.yaml"),
            location: None,
            reason: "Failed to evaluate included YAML file sub.yaml".into(),
            cause: Some(Cause::Config(Box::new(inner))),
        };

        let source = outer.source().expect("cause should be the source");
        assert_eq!(source.to_string(), "No files found for basename prod in any directory");
    }
}
