//! CLI configuration
//!
//! Loaded from the environment with an `RSZ_` prefix; every field has a
//! default so the tool runs unconfigured against local documents. The
//! oracle settings become an explicit [`OracleConfig`], never ambient
//! reads inside the pipeline.

use anyhow::{Context, Result};
use rightsizer::oracle::OracleConfig;
use rightsizer::sizing::{DEFAULT_HIGH_PERCENT, DEFAULT_LOW_PERCENT};
use serde::Deserialize;

/// CLI configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Base URL of the OpenAI-compatible oracle endpoint
    #[serde(default = "default_oracle_url")]
    pub oracle_url: String,

    /// Oracle model identifier
    #[serde(default = "default_oracle_model")]
    pub oracle_model: String,

    /// Bearer token for the oracle endpoint
    #[serde(default)]
    pub oracle_api_key: Option<String>,

    /// Downgrade threshold in percent
    #[serde(default = "default_low_threshold")]
    pub low_threshold: f64,

    /// Upgrade threshold in percent
    #[serde(default = "default_high_threshold")]
    pub high_threshold: f64,

    /// Fleet document with instance metadata and utilization
    #[serde(default = "default_fleet_file")]
    pub fleet_file: String,

    /// Catalog document with valid types per region and architecture
    #[serde(default = "default_catalog_file")]
    pub catalog_file: String,

    /// Candidate-universe cache file
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
}

fn default_oracle_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_oracle_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_low_threshold() -> f64 {
    DEFAULT_LOW_PERCENT
}

fn default_high_threshold() -> f64 {
    DEFAULT_HIGH_PERCENT
}

fn default_fleet_file() -> String {
    "fleet.json".to_string()
}

fn default_catalog_file() -> String {
    "instance_catalog.json".to_string()
}

fn default_cache_file() -> String {
    "instance_types_cache.json".to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            oracle_url: default_oracle_url(),
            oracle_model: default_oracle_model(),
            oracle_api_key: None,
            low_threshold: default_low_threshold(),
            high_threshold: default_high_threshold(),
            fleet_file: default_fleet_file(),
            catalog_file: default_catalog_file(),
            cache_file: default_cache_file(),
        }
    }
}

impl CliConfig {
    /// Load configuration from the environment. A malformed `RSZ_*`
    /// value is a fatal input error, not a fallback to defaults.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("RSZ"))
            .build()?;

        config
            .try_deserialize()
            .context("Invalid RSZ_* configuration")
    }

    /// Oracle configuration assembled from the loaded values.
    pub fn oracle_config(&self) -> OracleConfig {
        OracleConfig {
            base_url: self.oracle_url.clone(),
            model: self.oracle_model.clone(),
            api_key: self.oracle_api_key.clone(),
            ..OracleConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment_policy() {
        let config = CliConfig::default();
        assert_eq!(config.low_threshold, 30.0);
        assert_eq!(config.high_threshold, 50.0);
        assert_eq!(config.cache_file, "instance_types_cache.json");
    }

    #[test]
    fn test_malformed_environment_value_is_fatal() {
        // A bad threshold must fail the whole load, not silently reset
        // every other RSZ_* setting (credentials included) to defaults.
        std::env::set_var("RSZ_LOW_THRESHOLD", "not-a-number");
        std::env::set_var("RSZ_ORACLE_API_KEY", "sk-live");

        let result = CliConfig::load();

        std::env::remove_var("RSZ_LOW_THRESHOLD");
        std::env::remove_var("RSZ_ORACLE_API_KEY");

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid RSZ_* configuration"));
    }

    #[test]
    fn test_oracle_config_carries_credentials() {
        let config = CliConfig {
            oracle_api_key: Some("sk-test".to_string()),
            ..CliConfig::default()
        };
        let oracle = config.oracle_config();
        assert_eq!(oracle.api_key.as_deref(), Some("sk-test"));
        assert_eq!(oracle.base_url, "https://api.groq.com/openai/v1");
    }
}
