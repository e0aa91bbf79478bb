//! `rsz analyze`: utilization-driven resize recommendation

use crate::config::CliConfig;
use crate::output::{self, OutputFormat};
use crate::providers::{FileCatalogSource, FleetProvider};
use anyhow::Result;
use rightsizer::catalog::CachedCatalog;
use rightsizer::oracle::ChatCompletionsOracle;
use rightsizer::recorder;
use rightsizer::sizing::ThresholdPolicy;
use rightsizer::telemetry::{MetadataSource, MetricsSource};
use rightsizer::Pipeline;
use std::path::{Path, PathBuf};
use tracing::debug;

pub async fn run(
    config: &CliConfig,
    instance_id: &str,
    region: &str,
    format: OutputFormat,
    output_path: Option<PathBuf>,
) -> Result<()> {
    debug!(instance_id, region, "Starting analysis run");
    let fleet = FleetProvider::new(&config.fleet_file);
    let catalog = CachedCatalog::new(
        FileCatalogSource::new(&config.catalog_file),
        &config.cache_file,
    );

    let descriptor = fleet.describe(instance_id, region).await?;
    let universe = catalog
        .list_valid_types(region, descriptor.architecture)
        .await?;
    let utilization = fleet.average_utilization(instance_id, region).await?;

    let policy = ThresholdPolicy::new(config.low_threshold, config.high_threshold)?;
    let oracle = ChatCompletionsOracle::new(config.oracle_config())?;
    let pipeline = Pipeline::new(policy, oracle);

    let recommendation = pipeline.analyze(&descriptor, utilization, &universe).await;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&recommendation)?);
        }
        OutputFormat::Text => {
            println!("{}", output::recommendation_table(&recommendation));
            if recommendation.action_required {
                output::print_success(&format!(
                    "Recommendation validated: proceed to {} to {}",
                    recommendation.decision,
                    recommendation
                        .ai_suggested_instance_type
                        .as_deref()
                        .unwrap_or("-"),
                ));
            } else if let Some(suggested) = &recommendation.ai_suggested_instance_type {
                output::print_error(&format!(
                    "Suggested instance type ({}) failed validation. Action aborted.",
                    suggested
                ));
            } else if recommendation.decision.is_actionable() {
                output::print_warning(&format!(
                    "Decision {} recorded without a validated suggestion; no action will be taken.",
                    recommendation.decision
                ));
            } else {
                output::print_info("No resizing required based on thresholds.");
            }
        }
    }

    let artifact_path = output_path
        .unwrap_or_else(|| Path::new(recorder::RECOMMENDATION_FILE).to_path_buf());
    recorder::persist(&artifact_path, &recommendation)?;
    output::print_success(&format!("Output saved to {}", artifact_path.display()));

    Ok(())
}
