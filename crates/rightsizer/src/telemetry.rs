//! Interface boundary for utilization telemetry and instance metadata
//!
//! The pipeline never talks to a cloud provider directly; it consumes
//! these traits. Implementations live with the caller (a provider SDK
//! adapter in production, file- or map-backed fakes in tests).

use crate::models::InstanceDescriptor;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Fixed observation window for utilization queries.
pub const OBSERVATION_WINDOW_DAYS: u32 = 7;

/// Hourly sample granularity within the window.
pub const SAMPLE_PERIOD_SECS: u32 = 3600;

/// Average utilization over the observation window. Ephemeral, derived
/// per run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UtilizationSample {
    pub average_percent: f64,
    pub window_days: u32,
    pub period_secs: u32,
}

impl UtilizationSample {
    pub fn over_default_window(average_percent: f64) -> Self {
        Self {
            average_percent,
            window_days: OBSERVATION_WINDOW_DAYS,
            period_secs: SAMPLE_PERIOD_SECS,
        }
    }

    /// An empty metrics window reports zero utilization, not an error.
    pub fn empty() -> Self {
        Self::over_default_window(0.0)
    }
}

/// Source of averaged utilization metrics.
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Average utilization over the fixed window; implementations return
    /// [`UtilizationSample::empty`] when no data points exist.
    async fn average_utilization(
        &self,
        instance_id: &str,
        region: &str,
    ) -> Result<UtilizationSample>;
}

/// Source of instance metadata snapshots.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Describe an instance. A missing resource is a fatal input error
    /// for the run.
    async fn describe(&self, instance_id: &str, region: &str) -> Result<InstanceDescriptor>;
}
