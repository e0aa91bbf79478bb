//! Deterministic policy layer: size ranking, shortlist construction,
//! threshold decisions, and directional feasibility.

mod feasibility;
mod policy;
mod rank;
mod shortlist;

pub use feasibility::can_move;
pub use policy::{ThresholdPolicy, DEFAULT_HIGH_PERCENT, DEFAULT_LOW_PERCENT};
pub use rank::{SizeRank, SIZE_ORDER};
pub use shortlist::{build as build_shortlist, compatible_families};
