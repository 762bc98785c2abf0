//! Load command implementation.

use anyhow::{Context, Result};
use jconfigure_core::{ConfigLoader, LoadOptions};
use std::path::PathBuf;
use tracing::debug;

use super::{OutputFormat, parse_bindings, render};

/// Arguments for the load command
#[derive(Debug)]
pub struct LoadArgs {
    /// Directories to search; empty means the environment default
    pub config_dirs: Vec<PathBuf>,
    /// Active profiles; empty means the environment default
    pub profiles: Vec<String>,
    pub defaults_basename: String,
    pub fail_on_missing_files: bool,
    pub ignore_parse_errors: bool,
    /// KEY=VALUE bindings
    pub context: Vec<String>,
    pub output: OutputFormat,
}

/// Execute the load command
pub fn execute(args: LoadArgs) -> Result<()> {
    let options = options_from_args(&args)?;
    debug!(?options, "Resolved load options");

    let config = ConfigLoader::new(options)
        .load()
        .context("Failed to load configuration")?;

    println!("{}", render(&config, args.output)?);
    Ok(())
}

fn options_from_args(args: &LoadArgs) -> Result<LoadOptions> {
    let mut options = LoadOptions::from_env()
        .with_defaults_basename(args.defaults_basename.clone())
        .with_fail_on_missing_files(args.fail_on_missing_files)
        .with_fail_on_parse_error(!args.ignore_parse_errors)
        .with_bindings(parse_bindings(&args.context)?);

    if !args.config_dirs.is_empty() {
        options = options.with_config_dirs(args.config_dirs.iter().cloned());
    }
    if !args.profiles.is_empty() {
        options = options.with_active_profiles(args.profiles.iter().cloned());
    }
    Ok(options)
}
