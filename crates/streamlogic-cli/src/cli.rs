//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogLevel;

#[derive(Parser)]
#[command(name = "streamlogic")]
#[command(
    author,
    version,
    about = "Render stream planning problems and decode solver plans",
    long_about = None
)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Don't load configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a raw problem file into solver input text
    Render {
        /// Problem file with raw values in (:init ...) and (:goal ...)
        input: PathBuf,

        /// Write the rendered problem here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the session's object table (JSON) here
        #[arg(long)]
        objects: Option<PathBuf>,

        /// Override the problem name
        #[arg(long)]
        name: Option<String>,
    },

    /// Decode a solver plan back into raw values
    Decode {
        /// Solver plan file
        plan: PathBuf,

        /// Object table written by `render --objects`
        #[arg(long)]
        objects: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: PlanFormat,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Create default configuration file
    Init,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlanFormat {
    Text,
    Json,
}
