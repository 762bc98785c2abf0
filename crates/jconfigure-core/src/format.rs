//! Supported configuration file formats.

use std::fmt;
use std::path::Path;

/// Extensions probed for every basename, in merge order.
pub const SUPPORTED_FILE_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// Document format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Strict JSON, no tags.
    Json,
    /// YAML with the jconfigure tag vocabulary.
    Yaml,
}

impl Format {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("JSON"),
            Format::Yaml => f.write_str("YAML"),
        }
    }
}
