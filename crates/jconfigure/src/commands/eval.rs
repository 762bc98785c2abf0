//! Eval command implementation.
//!
//! Evaluates one file with the full tag vocabulary, without discovery or
//! merging. Handy for checking what a single file contributes.

use anyhow::{Context, Result};
use jconfigure_core::{BUILTIN_TAGS, evaluate_file};
use std::path::PathBuf;
use tracing::info;

use super::{OutputFormat, parse_bindings, render};

/// Arguments for the eval command
#[derive(Debug)]
pub struct EvalArgs {
    pub file: PathBuf,
    /// KEY=VALUE bindings
    pub context: Vec<String>,
    pub output: OutputFormat,
}

/// Execute the eval command
pub fn execute(args: EvalArgs) -> Result<()> {
    let bindings = parse_bindings(&args.context)?;
    info!("Evaluating {}", args.file.display());

    let value = evaluate_file(&args.file, bindings, &BUILTIN_TAGS)
        .with_context(|| format!("Failed to evaluate {}", args.file.display()))?;

    println!("{}", render(&value, args.output)?);
    Ok(())
}
