//! Clap argument types.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Resolve and verify Kinesis endpoint configurations.
#[derive(Parser, Debug)]
#[command(name = "kinesis-endpoint", version = kinesis_endpoint::constants::VERSION)]
pub struct Cli {
    /// Log resolution steps (overridden by KINESIS_ENDPOINT_LOG).
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Resolve an endpoint URI into its effective configuration.
    Resolve(ResolveArgs),

    /// Check an endpoint URI's parameters and report every problem found.
    Verify(VerifyArgs),

    /// List the options an endpoint URI accepts.
    Options,

    /// Print version information.
    Version,
}

/// Arguments for the `resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Endpoint URI, e.g. `aws-kinesis:orders?region=eu-west-1`.
    pub uri: String,

    /// Config file layered over the working-directory and global configs.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Register a pre-built client with this id (repeatable).
    #[arg(long = "client", value_name = "ID")]
    pub clients: Vec<String>,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `verify` subcommand.
#[derive(Parser, Debug)]
pub struct VerifyArgs {
    /// Endpoint URI to verify.
    pub uri: String,

    /// Output format.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
