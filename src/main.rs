//! kinesis-endpoint: Kinesis endpoint configuration CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Command, OutputFormat, ResolveArgs, VerifyArgs};
use kinesis_endpoint::client::{ClientHandle, ClientRegistry, NamedClient, StaticRegistry};
use kinesis_endpoint::config::Config;
use kinesis_endpoint::constants;
use kinesis_endpoint::endpoint::{EndpointUri, KinesisComponent};
use kinesis_endpoint::env::Env;
use kinesis_endpoint::verify::verify_parameters;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    match cli.command {
        Command::Resolve(args) => run_resolve(args),
        Command::Verify(args) => run_verify(args),
        Command::Options => {
            print!("{}", cli::render_options());
            Ok(0)
        }
        Command::Version => {
            println!("{} {}", constants::APP_NAME, constants::VERSION);
            Ok(0)
        }
    }
}

/// Resolve an endpoint URI against the layered component defaults.
fn run_resolve(args: ResolveArgs) -> Result<i32> {
    let work_dir = std::env::current_dir().context("failed to determine working directory")?;
    let config = Config::load(Some(&work_dir), args.config.as_deref(), &Env::real())
        .context("failed to load configuration")?;

    let registry: Arc<dyn ClientRegistry> = Arc::new(StaticRegistry::new(
        args.clients
            .iter()
            .map(|id| ClientHandle::new(NamedClient::new(id.as_str()))),
    ));
    let component = KinesisComponent::from_config(&config, registry);

    let endpoint = component
        .create_endpoint(&args.uri)
        .with_context(|| format!("failed to resolve {}", args.uri))?;

    match args.format {
        OutputFormat::Text => print!("{}", cli::render_configuration(endpoint.configuration())),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(endpoint.configuration())?
        ),
    }
    Ok(0)
}

/// Verify an endpoint URI's parameters; exits non-zero when problems are found.
fn run_verify(args: VerifyArgs) -> Result<i32> {
    let uri = EndpointUri::parse(&args.uri)?;
    let result = verify_parameters(&uri.parameters);

    match args.format {
        OutputFormat::Text => print!("{}", cli::render_verification(&result)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(if result.is_ok() { 0 } else { 1 })
}
