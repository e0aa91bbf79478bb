//! Interface boundary of the instance control service
//!
//! The control service consumes the decision artifact and performs the
//! stop/modify/start sequence. The core only defines the contract: the
//! `action_required` gate, the dry-run sentinel semantics, and the
//! rollback record persisted before any mutation.

use crate::models::{InstanceType, ResizeRecommendation};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default rollback record file written before a mutation.
pub const ROLLBACK_FILE: &str = "rollback.json";

/// How a resize is reverted if it has to be rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackStrategy {
    /// Re-modify the instance type back to the recorded previous value.
    TypeRevert,
    /// Restore the boot volume from pre-resize snapshots, then delete
    /// the transient volume and snapshots.
    SnapshotRestore,
}

/// Pre-change state persisted before the control service mutates
/// anything. The variant matches the configured [`RollbackStrategy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollbackArtifact {
    Snapshot {
        instance_id: String,
        region: String,
        original_instance_type: InstanceType,
        snapshot_ids: Vec<String>,
    },
    TypeOnly {
        previous_instance_type: InstanceType,
    },
}

/// Outcome of the pre-mutation permission dry-run. Providers signal a
/// would-have-succeeded dry-run through a dedicated error sentinel;
/// anything else aborts before mutating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DryRunOutcome {
    WouldSucceed,
    Denied(String),
}

/// Control-plane operations, implemented against the provider API by the
/// external service. The core's guarantee to implementations: `execute`
/// is only ever invoked with `recommendation.action_required == true`.
#[async_trait]
pub trait InstanceControl: Send + Sync {
    /// Permission check without side effects.
    async fn dry_run(&self, instance_id: &str, region: &str, target: &InstanceType)
        -> Result<DryRunOutcome>;

    /// Persist the rollback record, then stop, modify, and start.
    async fn execute(
        &self,
        recommendation: &ResizeRecommendation,
        strategy: RollbackStrategy,
    ) -> Result<RollbackArtifact>;

    /// Revert a prior resize using its rollback record.
    async fn rollback(&self, artifact: &RollbackArtifact) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_only_artifact_shape() {
        let artifact = RollbackArtifact::TypeOnly {
            previous_instance_type: InstanceType::from("t3.large"),
        };
        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["previous_instance_type"], "t3.large");
        assert!(json.get("snapshot_ids").is_none());
    }

    #[test]
    fn test_snapshot_artifact_round_trip() {
        let artifact = RollbackArtifact::Snapshot {
            instance_id: "i-0abc123".to_string(),
            region: "us-east-1".to_string(),
            original_instance_type: InstanceType::from("m6i.xlarge"),
            snapshot_ids: vec!["snap-1".to_string(), "snap-2".to_string()],
        };
        let json = serde_json::to_string(&artifact).unwrap();
        let reread: RollbackArtifact = serde_json::from_str(&json).unwrap();
        assert_eq!(reread, artifact);
    }

    #[test]
    fn test_untagged_deserialization_picks_the_right_variant() {
        let reread: RollbackArtifact =
            serde_json::from_str(r#"{"previous_instance_type": "t2.micro"}"#).unwrap();
        assert_eq!(
            reread,
            RollbackArtifact::TypeOnly {
                previous_instance_type: InstanceType::from("t2.micro"),
            }
        );
    }
}
