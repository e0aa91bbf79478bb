//! Core data models for the right-sizing pipeline

use serde::{Deserialize, Serialize};
use std::fmt;

/// An instance type identifier in `<family>.<size>` form (e.g. `t3.large`).
///
/// The wrapper performs no validation on construction; malformed
/// identifiers simply yield `None` from [`InstanceType::size`] and rank
/// as unranked downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceType(String);

impl InstanceType {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The family token before the separator (`t3` in `t3.large`).
    /// For an identifier with no separator the whole string is the family.
    pub fn family(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }

    /// The size token after the separator, if present.
    pub fn size(&self) -> Option<&str> {
        let mut parts = self.0.splitn(2, '.');
        parts.next();
        parts.next().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Processor architecture of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    I386,
    X86_64,
    Arm64,
}

impl Architecture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::I386 => "i386",
            Architecture::X86_64 => "x86_64",
            Architecture::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a queried instance, created once per pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceDescriptor {
    pub instance_id: String,
    pub region: String,
    pub instance_type: InstanceType,
    pub architecture: Architecture,
    /// Best-effort operating system hint (platform details string).
    #[serde(default = "default_operating_system")]
    pub operating_system: String,
}

pub(crate) fn default_operating_system() -> String {
    "Linux/UNIX".to_string()
}

/// Directional outcome of the threshold policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Upgrade,
    Downgrade,
    Retain,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Upgrade => "upgrade",
            Decision::Downgrade => "downgrade",
            Decision::Retain => "retain",
        }
    }

    /// True for the two directions that can lead to a resize.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Decision::Retain)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final decision artifact, the single source of truth consumed by the
/// instance control service. `action_required` is derived from
/// `validated` at construction and nowhere else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeRecommendation {
    pub instance_id: String,
    pub region: String,
    pub current_instance_type: InstanceType,
    pub architecture: Architecture,
    pub average_cpu_usage_percent: f64,
    pub decision: Decision,
    pub ai_suggested_instance_type: Option<String>,
    pub validated: bool,
    pub action_required: bool,
}

impl ResizeRecommendation {
    pub fn new(
        descriptor: &InstanceDescriptor,
        average_cpu_usage_percent: f64,
        decision: Decision,
        ai_suggested_instance_type: Option<String>,
        validated: bool,
    ) -> Self {
        Self {
            instance_id: descriptor.instance_id.clone(),
            region: descriptor.region.clone(),
            current_instance_type: descriptor.instance_type.clone(),
            architecture: descriptor.architecture,
            average_cpu_usage_percent: round2(average_cpu_usage_percent),
            decision,
            ai_suggested_instance_type,
            validated,
            // Sole gate authorizing a mutating resize downstream.
            action_required: validated,
        }
    }
}

/// Artifact of the compatibility-check workflow for an externally
/// requested type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResizeValidation {
    pub instance_id: String,
    pub region: String,
    pub current_instance_type: InstanceType,
    pub requested_instance_type: InstanceType,
    pub architecture: Architecture,
    pub operating_system: String,
    pub compatibility_decision: String,
    pub reason: String,
    pub is_valid_upgrade: bool,
}

/// Round to two decimal places for the recorded utilization figure.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
