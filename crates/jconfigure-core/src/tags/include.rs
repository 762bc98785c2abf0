//! `!IncludeJson`, `!IncludeYaml` and `!IncludeText`.
//!
//! Filenames resolve against the directory of the file being evaluated,
//! never the process working directory, and are made absolute.

use super::{Arguments, TagFailure};
use crate::evaluate::Evaluator;
use crate::value::ConfigValue;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub(crate) fn include_json(
    args: Arguments,
    evaluator: &Evaluator<'_>,
) -> Result<ConfigValue, TagFailure> {
    let path = resolve(args, evaluator, "!IncludeJson")?;
    let content = read(&path)?;

    serde_json::from_str::<serde_json::Value>(&content)
        .map(ConfigValue::from)
        .map_err(|e| {
            TagFailure::new(format!("Failed to parse included JSON file {}", path.display()))
                .with_cause(e)
        })
}

pub(crate) fn include_yaml(
    args: Arguments,
    evaluator: &Evaluator<'_>,
) -> Result<ConfigValue, TagFailure> {
    let path = resolve(args, evaluator, "!IncludeYaml")?;
    if evaluator.context().is_including(&path) {
        return Err(TagFailure::new(format!(
            "Circular include of {}",
            path.display()
        )));
    }
    let content = read(&path)?;

    let node = jconfigure_yaml::parse_file(&content, &path.to_string_lossy()).map_err(|e| {
        TagFailure::new(format!("Failed to parse included YAML file {}", path.display()))
            .with_cause(e)
    })?;

    let context = evaluator.context().for_included_file(&path);
    Evaluator::new(evaluator.registry(), &context)
        .evaluate_node(&node)
        .map_err(|e| {
            TagFailure::new(format!(
                "Failed to evaluate included YAML file {}",
                path.display()
            ))
            .with_cause(Box::new(e))
        })
}

pub(crate) fn include_text(
    args: Arguments,
    evaluator: &Evaluator<'_>,
) -> Result<ConfigValue, TagFailure> {
    let path = resolve(args, evaluator, "!IncludeText")?;
    let content = read(&path)?;
    Ok(ConfigValue::String(content.trim().to_string()))
}

fn resolve(
    mut args: Arguments,
    evaluator: &Evaluator<'_>,
    tag: &str,
) -> Result<PathBuf, TagFailure> {
    let filename = args.take_string(0, "filename")?;
    args.finish()?;

    let context = evaluator.context();
    let path = std::path::absolute(context.current_dir().join(&filename)).map_err(|e| {
        TagFailure::new(format!("Failed to resolve included file {filename}")).with_cause(e)
    })?;
    debug!(
        tag,
        from = %context.current_file().display(),
        path = %path.display(),
        depth = context.include_depth(),
        "Including file"
    );
    Ok(path)
}

fn read(path: &std::path::Path) -> Result<String, TagFailure> {
    fs::read_to_string(path).map_err(|e| {
        TagFailure::new(format!("Failed to read included file {}", path.display())).with_cause(e)
    })
}
