//! Size ranking within the fixed size vocabulary
//!
//! Ranks are total over well-formed identifiers. An absent or unknown
//! size token ranks as [`SizeRank::Unranked`], which participates in no
//! ordering: it is neither smaller nor larger than any ranked size, so a
//! malformed identifier can never make a directional move look feasible.

use crate::models::InstanceType;

/// Fixed, totally ordered size vocabulary (ascending capacity).
pub const SIZE_ORDER: &[&str] = &[
    "nano", "micro", "small", "medium", "large", "xlarge", "2xlarge", "4xlarge", "8xlarge",
    "16xlarge", "32xlarge", "48xlarge",
];

/// Rank of a size token within [`SIZE_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRank {
    Ranked(usize),
    Unranked,
}

impl SizeRank {
    /// Rank the size token of an instance type identifier.
    pub fn of(instance_type: &InstanceType) -> Self {
        match instance_type.size() {
            Some(size) => SIZE_ORDER
                .iter()
                .position(|s| *s == size)
                .map(SizeRank::Ranked)
                .unwrap_or(SizeRank::Unranked),
            None => SizeRank::Unranked,
        }
    }

    /// Index for sort keys. Unranked sorts after every ranked size so it
    /// never displaces a real candidate in shortlist ordering.
    pub fn sort_key(&self) -> usize {
        match self {
            SizeRank::Ranked(i) => *i,
            SizeRank::Unranked => SIZE_ORDER.len(),
        }
    }

    /// Strict ordering between two ranks. `None` when either side is
    /// unranked; feasibility checks treat that as "no comparison".
    pub fn strictly_below(&self, other: &SizeRank) -> Option<bool> {
        match (self, other) {
            (SizeRank::Ranked(a), SizeRank::Ranked(b)) => Some(a < b),
            _ => None,
        }
    }
}
