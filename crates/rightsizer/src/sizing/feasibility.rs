//! Directional feasibility guard
//!
//! Decides whether a requested move has any achievable target in the
//! shortlist before the advisory oracle is consulted. An infeasible
//! downgrade must short-circuit to retain without spending an oracle
//! call.

use super::rank::SizeRank;
use crate::models::{Decision, InstanceType};

/// True iff some shortlist member sits strictly in the requested
/// direction from the current size.
///
/// Unranked sizes (current or candidate) never satisfy the guard: with
/// no defined ordering there is no defensible "smaller" or "larger"
/// target, so the move reports infeasible.
pub fn can_move(decision: Decision, current: &InstanceType, shortlist: &[InstanceType]) -> bool {
    let current_rank = SizeRank::of(current);

    match decision {
        Decision::Retain => false,
        Decision::Downgrade => shortlist
            .iter()
            .any(|t| SizeRank::of(t).strictly_below(&current_rank) == Some(true)),
        Decision::Upgrade => shortlist
            .iter()
            .any(|t| current_rank.strictly_below(&SizeRank::of(t)) == Some(true)),
    }
}
