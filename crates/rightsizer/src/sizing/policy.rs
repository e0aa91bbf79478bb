//! Utilization threshold policy
//!
//! Maps an average utilization percentage to a directional decision. The
//! cut points are a deployment choice, injected at construction rather
//! than hard-coded.

use crate::models::Decision;
use anyhow::{bail, Result};

/// Default cut points matching the historical deployment policy.
pub const DEFAULT_LOW_PERCENT: f64 = 30.0;
pub const DEFAULT_HIGH_PERCENT: f64 = 50.0;

/// Two-sided threshold policy: below `low` is a downgrade, above `high`
/// is an upgrade, the closed band between them retains.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    low: f64,
    high: f64,
}

impl ThresholdPolicy {
    /// Create a policy. `low > high` is rejected; `low == high` is legal
    /// and degenerates the retain band to the single point `u == low`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        if low > high {
            bail!("invalid threshold policy: low {} exceeds high {}", low, high);
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Total, deterministic mapping from utilization to decision.
    pub fn decide(&self, utilization_percent: f64) -> Decision {
        if utilization_percent < self.low {
            Decision::Downgrade
        } else if utilization_percent > self.high {
            Decision::Upgrade
        } else {
            Decision::Retain
        }
    }
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_PERCENT,
            high: DEFAULT_HIGH_PERCENT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_boundaries() {
        let policy = ThresholdPolicy::new(30.0, 50.0).unwrap();

        assert_eq!(policy.decide(29.999), Decision::Downgrade);
        assert_eq!(policy.decide(30.0), Decision::Retain);
        assert_eq!(policy.decide(40.0), Decision::Retain);
        assert_eq!(policy.decide(50.0), Decision::Retain);
        assert_eq!(policy.decide(50.001), Decision::Upgrade);
    }

    #[test]
    fn test_extremes_are_total() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.decide(0.0), Decision::Downgrade);
        assert_eq!(policy.decide(100.0), Decision::Upgrade);
    }

    #[test]
    fn test_degenerate_band_is_single_point() {
        let policy = ThresholdPolicy::new(40.0, 40.0).unwrap();
        assert_eq!(policy.decide(40.0), Decision::Retain);
        assert_eq!(policy.decide(39.9), Decision::Downgrade);
        assert_eq!(policy.decide(40.1), Decision::Upgrade);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        assert!(ThresholdPolicy::new(60.0, 30.0).is_err());
    }
}
