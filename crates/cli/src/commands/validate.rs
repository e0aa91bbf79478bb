//! `rsz validate-request`: compatibility check for a requested type

use crate::config::CliConfig;
use crate::output::{self, OutputFormat};
use crate::providers::{FileCatalogSource, FleetProvider};
use anyhow::Result;
use rightsizer::catalog::CachedCatalog;
use rightsizer::models::InstanceType;
use rightsizer::oracle::ChatCompletionsOracle;
use rightsizer::recorder;
use rightsizer::sizing::ThresholdPolicy;
use rightsizer::telemetry::MetadataSource;
use rightsizer::Pipeline;
use std::path::{Path, PathBuf};
use tracing::debug;

pub async fn run(
    config: &CliConfig,
    instance_id: &str,
    region: &str,
    desired_type: &str,
    format: OutputFormat,
    output_path: Option<PathBuf>,
) -> Result<()> {
    debug!(instance_id, region, desired_type, "Starting compatibility check");
    let fleet = FleetProvider::new(&config.fleet_file);
    let catalog = CachedCatalog::new(
        FileCatalogSource::new(&config.catalog_file),
        &config.cache_file,
    );

    let descriptor = fleet.describe(instance_id, region).await?;
    let universe = catalog
        .list_valid_types(region, descriptor.architecture)
        .await?;
    let requested = InstanceType::from(desired_type);

    let policy = ThresholdPolicy::new(config.low_threshold, config.high_threshold)?;
    let oracle = ChatCompletionsOracle::new(config.oracle_config())?;
    let pipeline = Pipeline::new(policy, oracle);

    let validation = pipeline
        .validate_request(&descriptor, &requested, &universe)
        .await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&validation)?);
        }
        OutputFormat::Text => {
            println!("{}", output::validation_table(&validation));
            if validation.is_valid_upgrade {
                output::print_success(&format!(
                    "Requested change to {} judged a valid upgrade: {}",
                    validation.requested_instance_type, validation.reason
                ));
            } else {
                output::print_error(&format!(
                    "Requested change to {} rejected: {}",
                    validation.requested_instance_type, validation.reason
                ));
            }
        }
    }

    let artifact_path =
        output_path.unwrap_or_else(|| Path::new(recorder::VALIDATION_FILE).to_path_buf());
    recorder::persist(&artifact_path, &validation)?;
    output::print_success(&format!("Output saved to {}", artifact_path.display()));

    Ok(())
}
