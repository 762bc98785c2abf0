//! `!JoinFilePaths`.

use super::{Arguments, TagFailure};
use crate::value::ConfigValue;
use std::path::PathBuf;

/// Joins segments the way `PathBuf::push` does: an absolute segment
/// replaces everything before it.
pub(crate) fn join_file_paths(mut args: Arguments) -> Result<ConfigValue, TagFailure> {
    let segments = args.take_variadic("paths")?;
    args.finish()?;

    if segments.is_empty() {
        return Err(TagFailure::new(
            "No paths provided, provide them either with a 'paths' mapping, or a list of paths",
        ));
    }

    let mut path = PathBuf::new();
    for segment in &segments {
        match segment {
            ConfigValue::String(s) => path.push(s),
            other => {
                return Err(TagFailure::new(format!(
                    "All paths must be strings, got {} {other}",
                    other.kind_name()
                )));
            }
        }
    }

    Ok(ConfigValue::String(path.to_string_lossy().into_owned()))
}
