//! Instance right-sizing CLI

mod commands;
mod config;
mod output;
mod providers;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use commands::{load_run_input, RunInput};
use config::CliConfig;
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rsz")]
#[command(about = "Utilization-driven instance right-sizing", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, env = "RSZ_FORMAT", default_value = "text")]
    format: OutputFormat,

    /// Write the decision artifact to this path instead of the default
    #[arg(long, global = true)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an instance's utilization and recommend a resize
    Analyze {
        /// Instance identifier (e.g. i-0abc123)
        instance_id: Option<String>,

        /// Region the instance runs in
        region: Option<String>,

        /// JSON run document supplying the arguments instead
        #[arg(long, conflicts_with_all = ["instance_id", "region"])]
        input: Option<PathBuf>,
    },

    /// Check whether a requested instance type is a valid upgrade
    ValidateRequest {
        /// Instance identifier (e.g. i-0abc123)
        instance_id: Option<String>,

        /// Region the instance runs in
        region: Option<String>,

        /// The instance type being requested
        #[arg(long)]
        desired_type: Option<String>,

        /// JSON run document supplying the arguments instead
        #[arg(long, conflicts_with_all = ["instance_id", "region", "desired_type"])]
        input: Option<PathBuf>,
    },
}

/// Resolve positional arguments or a run document into one input set.
fn resolve_input(
    instance_id: Option<String>,
    region: Option<String>,
    desired_type: Option<String>,
    input: Option<PathBuf>,
) -> Result<RunInput> {
    if let Some(path) = input {
        return load_run_input(&path);
    }
    match (instance_id, region) {
        (Some(instance_id), Some(region)) => Ok(RunInput {
            instance_id,
            region,
            desired_instance_type: desired_type,
        }),
        _ => bail!("Provide <INSTANCE_ID> <REGION> or --input <FILE>"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load()?;

    match cli.command {
        Commands::Analyze {
            instance_id,
            region,
            input,
        } => {
            let run = resolve_input(instance_id, region, None, input)?;
            commands::analyze::run(&config, &run.instance_id, &run.region, cli.format, cli.output)
                .await
        }
        Commands::ValidateRequest {
            instance_id,
            region,
            desired_type,
            input,
        } => {
            let run = resolve_input(instance_id, region, desired_type, input)?;
            let desired = match run.desired_instance_type.as_deref() {
                Some(desired) => desired.to_string(),
                None => bail!("A desired instance type is required (--desired-type or the input document)"),
            };
            commands::validate::run(
                &config,
                &run.instance_id,
                &run.region,
                &desired,
                cli.format,
                cli.output,
            )
            .await
        }
    }
}
