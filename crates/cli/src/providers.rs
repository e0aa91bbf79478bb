//! File-backed data providers
//!
//! The core consumes telemetry, metadata, and the candidate universe
//! through traits. These implementations read local JSON documents and
//! are the seam where a cloud provider SDK plugs in for production use.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rightsizer::catalog::CatalogSource;
use rightsizer::models::{Architecture, InstanceDescriptor, InstanceType};
use rightsizer::telemetry::{MetadataSource, MetricsSource, UtilizationSample};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// One instance entry in the fleet document.
#[derive(Debug, Clone, Deserialize)]
struct FleetEntry {
    instance_type: InstanceType,
    architecture: Architecture,
    #[serde(default = "default_operating_system")]
    operating_system: String,
    /// Averaged over the 7-day window; absent means no data points.
    #[serde(default)]
    average_cpu_usage_percent: Option<f64>,
}

fn default_operating_system() -> String {
    "Linux/UNIX".to_string()
}

/// Fleet document: `{ "<region>": { "<instance_id>": { ... } } }`.
#[derive(Debug, Default, Deserialize)]
struct FleetDocument(HashMap<String, HashMap<String, FleetEntry>>);

/// Metadata and metrics provider backed by a fleet document.
pub struct FleetProvider {
    path: PathBuf,
}

impl FleetProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<FleetDocument> {
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read fleet document {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Malformed fleet document {}", self.path.display()))
    }

    fn entry(&self, instance_id: &str, region: &str) -> Result<FleetEntry> {
        let fleet = self.load()?;
        fleet
            .0
            .get(region)
            .and_then(|instances| instances.get(instance_id))
            .cloned()
            .with_context(|| format!("Instance ID {} not found in {}", instance_id, region))
    }
}

#[async_trait]
impl MetadataSource for FleetProvider {
    async fn describe(&self, instance_id: &str, region: &str) -> Result<InstanceDescriptor> {
        let entry = self.entry(instance_id, region)?;
        Ok(InstanceDescriptor {
            instance_id: instance_id.to_string(),
            region: region.to_string(),
            instance_type: entry.instance_type,
            architecture: entry.architecture,
            operating_system: entry.operating_system,
        })
    }
}

#[async_trait]
impl MetricsSource for FleetProvider {
    async fn average_utilization(
        &self,
        instance_id: &str,
        region: &str,
    ) -> Result<UtilizationSample> {
        let entry = self.entry(instance_id, region)?;
        Ok(entry
            .average_cpu_usage_percent
            .map(UtilizationSample::over_default_window)
            .unwrap_or_else(UtilizationSample::empty))
    }
}

/// Catalog source backed by a document keyed `{region}_{architecture}`.
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn list_valid_types(
        &self,
        region: &str,
        architecture: Architecture,
    ) -> Result<Vec<String>> {
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read catalog {}", self.path.display()))?;
        let catalog: HashMap<String, Vec<String>> = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed catalog {}", self.path.display()))?;

        let key = format!("{}_{}", region, architecture);
        match catalog.get(&key) {
            Some(types) => Ok(types.clone()),
            None => bail!("No catalog data for {}", key),
        }
    }
}

/// Write a minimal fleet/catalog pair, used by tests.
#[cfg(test)]
pub fn write_fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let fleet_path = dir.join("fleet.json");
    std::fs::write(
        &fleet_path,
        serde_json::json!({
            "us-east-1": {
                "i-0abc123": {
                    "instance_type": "t3.large",
                    "architecture": "x86_64",
                    "average_cpu_usage_percent": 90.0
                },
                "i-0quiet": {
                    "instance_type": "t2.micro",
                    "architecture": "x86_64"
                }
            }
        })
        .to_string(),
    )
    .unwrap();

    let catalog_path = dir.join("instance_catalog.json");
    std::fs::write(
        &catalog_path,
        serde_json::json!({
            "us-east-1_x86_64": ["t2.micro", "t2.small", "t3.large", "t3.xlarge"]
        })
        .to_string(),
    )
    .unwrap();

    (fleet_path, catalog_path)
}
