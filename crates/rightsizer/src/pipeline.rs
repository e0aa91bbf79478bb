//! The decision-and-validation pipeline
//!
//! Per run: threshold evaluation, feasibility guard, shortlist
//! construction, one advisory oracle call, and the validation gate. Every
//! path terminates in a recommendation; oracle failures resolve to a
//! rejected decision, never a crash. Runs share no mutable state and may
//! execute concurrently for independent instances.

use crate::models::{Decision, InstanceDescriptor, InstanceType, ResizeRecommendation,
    ResizeValidation};
use crate::oracle::{
    compatibility_prompt, suggestion_prompt, CompatibilityFacts, OracleProvider,
};
use crate::sizing::{build_shortlist, can_move, ThresholdPolicy};
use crate::telemetry::UtilizationSample;
use crate::validate;
use tracing::{debug, info, warn};

/// Right-sizing pipeline with an injected threshold policy and oracle.
pub struct Pipeline<O> {
    policy: ThresholdPolicy,
    oracle: O,
}

impl<O: OracleProvider> Pipeline<O> {
    pub fn new(policy: ThresholdPolicy, oracle: O) -> Self {
        Self { policy, oracle }
    }

    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    /// Turn a utilization signal into a validated, bounded resize
    /// decision for one instance.
    pub async fn analyze(
        &self,
        descriptor: &InstanceDescriptor,
        utilization: UtilizationSample,
        universe: &[String],
    ) -> ResizeRecommendation {
        let current = &descriptor.instance_type;
        let decision = self.policy.decide(utilization.average_percent);
        debug!(
            instance_id = %descriptor.instance_id,
            utilization = utilization.average_percent,
            decision = %decision,
            "Threshold evaluated"
        );

        if !decision.is_actionable() {
            return ResizeRecommendation::new(
                descriptor,
                utilization.average_percent,
                decision,
                None,
                false,
            );
        }

        let shortlist = build_shortlist(current, universe);

        // Infeasible moves retain without spending an oracle call.
        if !can_move(decision, current, &shortlist) {
            info!(
                instance_id = %descriptor.instance_id,
                current_type = %current,
                decision = %decision,
                "No candidate in the requested direction; retaining"
            );
            return ResizeRecommendation::new(
                descriptor,
                utilization.average_percent,
                Decision::Retain,
                None,
                false,
            );
        }

        debug!(
            instance_id = %descriptor.instance_id,
            shortlist_len = shortlist.len(),
            "Consulting advisory oracle"
        );
        let prompt = suggestion_prompt(current, descriptor.architecture, decision, &shortlist);

        let (suggested, validated) = match self.oracle.complete(&prompt).await {
            Ok(reply) => {
                let vetted = validate::membership(&reply, universe);
                match &vetted {
                    validate::Vetted::Accepted(t) => {
                        info!(instance_id = %descriptor.instance_id, suggested = %t, "Suggestion validated");
                    }
                    validate::Vetted::Rejected { reason, .. } => {
                        warn!(instance_id = %descriptor.instance_id, reason = %reason, "Suggestion rejected");
                    }
                }
                (Some(reply), vetted.is_accepted())
            }
            Err(e) => {
                warn!(instance_id = %descriptor.instance_id, error = %e, "Oracle call failed; recording unvalidated decision");
                (None, false)
            }
        };

        // Intent is recorded even when unvalidated; only the
        // action_required gate depends on validation.
        ResizeRecommendation::new(
            descriptor,
            utilization.average_percent,
            decision,
            suggested,
            validated,
        )
    }

    /// Compatibility-check workflow: judge an externally requested type
    /// against derived ground-truth facts.
    pub async fn validate_request(
        &self,
        descriptor: &InstanceDescriptor,
        requested: &InstanceType,
        universe: &[String],
    ) -> ResizeValidation {
        let facts = CompatibilityFacts::derive(&descriptor.instance_type, requested, universe);
        debug!(
            instance_id = %descriptor.instance_id,
            requested = %requested,
            available = facts.requested_available_for_arch,
            size_increase = facts.is_size_increase,
            same_family = facts.is_same_family,
            "Compatibility facts derived"
        );

        let prompt = compatibility_prompt(descriptor, requested, &facts);
        let verdict = match self.oracle.complete(&prompt).await {
            Ok(reply) => validate::parse_verdict(&reply),
            Err(e) => {
                warn!(instance_id = %descriptor.instance_id, error = %e, "Oracle call failed; treating request as NOT_VALID");
                validate::CompatibilityVerdict {
                    decision: "NOT_VALID".to_string(),
                    reason: format!("advisory oracle unavailable: {}", e),
                    is_valid_upgrade: false,
                }
            }
        };

        ResizeValidation {
            instance_id: descriptor.instance_id.clone(),
            region: descriptor.region.clone(),
            current_instance_type: descriptor.instance_type.clone(),
            requested_instance_type: requested.clone(),
            architecture: descriptor.architecture,
            operating_system: descriptor.operating_system.clone(),
            compatibility_decision: verdict.decision,
            reason: verdict.reason,
            is_valid_upgrade: verdict.is_valid_upgrade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_operating_system, Architecture};
    use crate::oracle::OracleError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Scripted oracle: canned reply (or failure) plus a call counter.
    struct MockOracle {
        reply: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl MockOracle {
        fn replying(reply: &str) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    reply: Some(reply.to_string()),
                    calls: calls.clone(),
                },
                calls,
            )
        }

        fn failing() -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    reply: None,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait]
    impl OracleProvider for MockOracle {
        async fn complete(&self, _prompt: &str) -> Result<String, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(OracleError::EmptyResponse)
        }
    }

    fn descriptor(instance_type: &str) -> InstanceDescriptor {
        InstanceDescriptor {
            instance_id: "i-0abc123".to_string(),
            region: "us-east-1".to_string(),
            instance_type: InstanceType::from(instance_type),
            architecture: Architecture::X86_64,
            operating_system: default_operating_system(),
        }
    }

    fn universe(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    fn policy() -> ThresholdPolicy {
        ThresholdPolicy::new(30.0, 50.0).unwrap()
    }

    #[tokio::test]
    async fn test_retain_band_never_consults_oracle() {
        let (oracle, calls) = MockOracle::replying("t3.xlarge");
        let pipeline = Pipeline::new(policy(), oracle);

        let rec = pipeline
            .analyze(
                &descriptor("t3.large"),
                UtilizationSample::over_default_window(40.0),
                &universe(&["t3.large", "t3.xlarge"]),
            )
            .await;

        assert_eq!(rec.decision, Decision::Retain);
        assert!(!rec.action_required);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_infeasible_downgrade_retains_without_oracle_call() {
        // t2.micro at 5% wants a downgrade, but micro is already the
        // smallest ranked size in the shortlist.
        let (oracle, calls) = MockOracle::replying("t2.nano");
        let pipeline = Pipeline::new(policy(), oracle);

        let rec = pipeline
            .analyze(
                &descriptor("t2.micro"),
                UtilizationSample::over_default_window(5.0),
                &universe(&["t2.micro", "t2.small", "t2.medium"]),
            )
            .await;

        assert_eq!(rec.decision, Decision::Retain);
        assert!(!rec.validated);
        assert!(!rec.action_required);
        assert!(rec.ai_suggested_instance_type.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_validated_upgrade_authorizes_action() {
        let (oracle, calls) = MockOracle::replying("t3.xlarge");
        let pipeline = Pipeline::new(policy(), oracle);

        let rec = pipeline
            .analyze(
                &descriptor("t3.large"),
                UtilizationSample::over_default_window(90.0),
                &universe(&["t3.large", "t3.xlarge", "t4g.xlarge"]),
            )
            .await;

        assert_eq!(rec.decision, Decision::Upgrade);
        assert_eq!(rec.ai_suggested_instance_type.as_deref(), Some("t3.xlarge"));
        assert!(rec.validated);
        assert!(rec.action_required);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_hallucinated_type_is_rejected_but_intent_recorded() {
        let (oracle, _) = MockOracle::replying("t3.huge");
        let pipeline = Pipeline::new(policy(), oracle);

        let rec = pipeline
            .analyze(
                &descriptor("t3.large"),
                UtilizationSample::over_default_window(90.0),
                &universe(&["t3.large", "t3.xlarge"]),
            )
            .await;

        assert_eq!(rec.decision, Decision::Upgrade);
        assert_eq!(rec.ai_suggested_instance_type.as_deref(), Some("t3.huge"));
        assert!(!rec.validated);
        assert!(!rec.action_required);
    }

    #[tokio::test]
    async fn test_oracle_failure_resolves_to_unvalidated_decision() {
        let (oracle, calls) = MockOracle::failing();
        let pipeline = Pipeline::new(policy(), oracle);

        let rec = pipeline
            .analyze(
                &descriptor("t3.large"),
                UtilizationSample::over_default_window(90.0),
                &universe(&["t3.large", "t3.xlarge"]),
            )
            .await;

        assert_eq!(rec.decision, Decision::Upgrade);
        assert!(rec.ai_suggested_instance_type.is_none());
        assert!(!rec.action_required);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_compatibility_workflow_valid_upgrade() {
        let (oracle, _) =
            MockOracle::replying("VALID. The t2.medium offers more resources within the family.");
        let pipeline = Pipeline::new(policy(), oracle);

        let validation = pipeline
            .validate_request(
                &descriptor("t2.micro"),
                &InstanceType::from("t2.medium"),
                &universe(&["t2.micro", "t2.medium"]),
            )
            .await;

        assert_eq!(validation.compatibility_decision, "VALID");
        assert!(validation.is_valid_upgrade);
        assert!(validation.reason.contains("more resources"));
    }

    #[tokio::test]
    async fn test_compatibility_workflow_downgrade_rejected() {
        let (oracle, _) =
            MockOracle::replying("NOT_VALID. This is a downgrade in size within the same family.");
        let pipeline = Pipeline::new(policy(), oracle);

        let validation = pipeline
            .validate_request(
                &descriptor("t2.large"),
                &InstanceType::from("t2.medium"),
                &universe(&["t2.large", "t2.medium"]),
            )
            .await;

        assert_eq!(validation.compatibility_decision, "NOT_VALID");
        assert!(!validation.is_valid_upgrade);
    }

    #[tokio::test]
    async fn test_compatibility_workflow_oracle_failure_is_not_valid() {
        let (oracle, _) = MockOracle::failing();
        let pipeline = Pipeline::new(policy(), oracle);

        let validation = pipeline
            .validate_request(
                &descriptor("t2.micro"),
                &InstanceType::from("t2.medium"),
                &universe(&["t2.micro", "t2.medium"]),
            )
            .await;

        assert_eq!(validation.compatibility_decision, "NOT_VALID");
        assert!(validation.reason.contains("oracle unavailable"));
    }
}
