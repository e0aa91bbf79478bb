//! Validation gate for untrusted oracle output
//!
//! Every oracle reply passes through here before it can influence the
//! decision artifact. Membership is exact string equality against the
//! authoritative universe; the compatibility verdict parse treats
//! anything that is not literally `VALID` as `NOT_VALID`.

use crate::models::InstanceType;
use serde::{Deserialize, Serialize};

/// Outcome of vetting a suggested type. Tagged so downstream code cannot
/// forget to check validity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Vetted {
    Accepted(InstanceType),
    Rejected { suggested: String, reason: String },
}

impl Vetted {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Vetted::Accepted(_))
    }
}

/// Exact membership check of a suggested identifier in the candidate
/// universe. Case-sensitive, no normalization beyond the oracle's own
/// trim.
pub fn membership(suggested: &str, universe: &[String]) -> Vetted {
    if universe.iter().any(|t| t == suggested) {
        Vetted::Accepted(InstanceType::new(suggested.to_string()))
    } else {
        Vetted::Rejected {
            suggested: suggested.to_string(),
            reason: format!(
                "suggested type '{}' is not a member of the candidate universe",
                suggested
            ),
        }
    }
}

/// Parsed compatibility verdict from the oracle's
/// `VALID/NOT_VALID. <reason>` sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityVerdict {
    pub decision: String,
    pub reason: String,
    pub is_valid_upgrade: bool,
}

/// Parse the leading token up to the first period, uppercase-normalize,
/// and compare to `VALID`. Malformed replies parse as `NOT_VALID`.
pub fn parse_verdict(reply: &str) -> CompatibilityVerdict {
    let mut parts = reply.splitn(2, '.');
    let token = parts.next().unwrap_or("").trim().to_uppercase();
    let reason = parts
        .next()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| "No reason provided.".to_string());

    let is_valid_upgrade = token == "VALID";
    CompatibilityVerdict {
        decision: if is_valid_upgrade { "VALID" } else { "NOT_VALID" }.to_string(),
        reason,
        is_valid_upgrade,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> Vec<String> {
        vec!["t3.large".to_string(), "t3.xlarge".to_string()]
    }

    #[test]
    fn test_membership_is_exact() {
        assert!(membership("t3.xlarge", &universe()).is_accepted());
        assert!(!membership("t3.huge", &universe()).is_accepted());
        // Case-sensitive, no trimming.
        assert!(!membership("T3.XLARGE", &universe()).is_accepted());
        assert!(!membership(" t3.xlarge", &universe()).is_accepted());
    }

    #[test]
    fn test_rejection_carries_the_untrusted_text() {
        match membership("t3.huge", &universe()) {
            Vetted::Rejected { suggested, reason } => {
                assert_eq!(suggested, "t3.huge");
                assert!(reason.contains("t3.huge"));
            }
            Vetted::Accepted(_) => panic!("non-member must be rejected"),
        }
    }

    #[test]
    fn test_parse_valid_verdict() {
        let verdict = parse_verdict("VALID. The t2.medium offers more resources.");
        assert!(verdict.is_valid_upgrade);
        assert_eq!(verdict.decision, "VALID");
        assert_eq!(verdict.reason, "The t2.medium offers more resources.");
    }

    #[test]
    fn test_parse_not_valid_verdict() {
        let verdict = parse_verdict("NOT_VALID. This is a downgrade in size.");
        assert!(!verdict.is_valid_upgrade);
        assert_eq!(verdict.decision, "NOT_VALID");
    }

    #[test]
    fn test_lowercase_verdict_normalizes() {
        assert!(parse_verdict("valid. Looks fine.").is_valid_upgrade);
    }

    #[test]
    fn test_malformed_replies_are_not_valid() {
        assert!(!parse_verdict("").is_valid_upgrade);
        assert!(!parse_verdict("Sure, go ahead!").is_valid_upgrade);

        let no_reason = parse_verdict("NOT_VALID.");
        assert_eq!(no_reason.reason, "No reason provided.");
    }
}
