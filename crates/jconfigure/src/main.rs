//! jconfigure CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "jconfigure")]
#[command(version)]
#[command(about = "Load layered, tag-evaluated configuration files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load defaults and active profiles from the config directories and print the merged tree
    Load {
        /// Directory to search (repeatable; defaults to $JCONFIGURE_CONFIG_DIRECTORIES or ./config)
        #[arg(short = 'd', long = "config-dir")]
        config_dirs: Vec<PathBuf>,

        /// Active profile (repeatable; defaults to $JCONFIGURE_ACTIVE_PROFILES)
        #[arg(short = 'p', long = "profile")]
        profiles: Vec<String>,

        /// Basename of the files loaded before any profile
        #[arg(long, default_value = "defaults")]
        defaults_basename: String,

        /// Fail when a basename is found in no directory
        #[arg(long)]
        fail_on_missing_files: bool,

        /// Skip files that fail to parse instead of aborting
        #[arg(long)]
        ignore_parse_errors: bool,

        /// Binding for !ContextValue (KEY=VALUE, value read as a YAML scalar)
        #[arg(short = 'c', long = "context")]
        context: Vec<String>,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },

    /// Evaluate a single JSON or YAML file and print the result
    Eval {
        /// File to evaluate
        file: PathBuf,

        /// Binding for !ContextValue (KEY=VALUE, value read as a YAML scalar)
        #[arg(short = 'c', long = "context")]
        context: Vec<String>,

        /// Output format
        #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jconfigure=info,jconfigure_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            config_dirs,
            profiles,
            defaults_basename,
            fail_on_missing_files,
            ignore_parse_errors,
            context,
            output,
        } => commands::load::execute(commands::load::LoadArgs {
            config_dirs,
            profiles,
            defaults_basename,
            fail_on_missing_files,
            ignore_parse_errors,
            context,
            output,
        }),
        Commands::Eval {
            file,
            context,
            output,
        } => commands::eval::execute(commands::eval::EvalArgs {
            file,
            context,
            output,
        }),
    }
}
