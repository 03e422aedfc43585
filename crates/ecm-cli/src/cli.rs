//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// ECM CLI - Extract Energy Conservation Measures from building audit text.
#[derive(Debug, Parser)]
#[command(name = "ecm")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "ECM_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (ECM names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract ECM records from a text or markdown document
    Extract(ExtractArgs),

    /// Print the prompt that would be sent for a document
    Prompt(InputArgs),

    /// Validate a saved model reply without calling a model
    Validate(ValidateArgs),

    /// Show or initialize the configuration
    Config(ConfigArgs),
}

/// Where to read input from.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Input file
    #[arg(conflicts_with = "stdin")]
    pub file: Option<PathBuf>,

    /// Read input from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Model override
    #[arg(short, long)]
    pub model: Option<String>,

    /// Provider override (cborg, openrouter)
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Source identifier (defaults to the file name)
    #[arg(short, long)]
    pub source_id: Option<String>,

    /// Print nested records instead of flat ones
    #[arg(long)]
    pub nested: bool,

    /// Reject units outside the canonical sets
    #[arg(long)]
    pub strict_units: bool,
}

/// Arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print nested records instead of flat ones
    #[arg(long)]
    pub nested: bool,

    /// Reject units outside the canonical sets
    #[arg(long)]
    pub strict_units: bool,
}

/// Arguments for the config command.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the default configuration file
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
