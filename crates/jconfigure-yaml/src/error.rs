//! Error types for YAML reading.

use crate::SourceInfo;
use thiserror::Error;

/// Result type alias for jconfigure-yaml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a node tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// YAML syntax error reported by the scanner
    #[error("Parse error: {message}")]
    ParseError {
        message: String,
        location: Option<SourceInfo>,
    },

    /// Well-formed YAML that cannot be represented as a node tree
    #[error("Invalid YAML structure{}: {message}", at(location))]
    InvalidStructure {
        message: String,
        location: Option<SourceInfo>,
    },
}

impl Error {
    pub fn location(&self) -> Option<&SourceInfo> {
        match self {
            Error::ParseError { location, .. } | Error::InvalidStructure { location, .. } => {
                location.as_ref()
            }
        }
    }
}

fn at(location: &Option<SourceInfo>) -> String {
    location
        .as_ref()
        .map(|loc| format!(" at {}", loc))
        .unwrap_or_default()
}

impl From<yaml_rust2::ScanError> for Error {
    fn from(err: yaml_rust2::ScanError) -> Self {
        // The scanner message already embeds line and column.
        let location = SourceInfo::from_marker(err.marker(), 0);
        Error::ParseError {
            message: err.to_string(),
            location: Some(location),
        }
    }
}
