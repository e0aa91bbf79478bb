//! Candidate shortlist construction
//!
//! Filters the candidate universe down to the current family plus its
//! declared compatible families, ordered by (declared family order, size
//! rank ascending). Degrades to an empty list when the universe has no
//! matching types.

use super::rank::SizeRank;
use crate::models::InstanceType;

/// Static family-compatibility table, keyed by family prefix. The first
/// match wins; the current family itself is always considered first.
const COMPATIBLE_FAMILIES: &[(&str, &[&str])] = &[
    ("t3", &["t4g", "t3a"]),
    ("m6", &["m5", "m6i", "m7i"]),
];

/// Expand a family token to its ordered compatible-family set.
///
/// The current family always leads; declared families follow in table
/// order, deduplicated.
pub fn compatible_families(family: &str) -> Vec<&str> {
    let mut families = vec![family];
    for (prefix, extras) in COMPATIBLE_FAMILIES {
        if family.starts_with(prefix) {
            for extra in *extras {
                if !families.contains(extra) {
                    families.push(extra);
                }
            }
        }
    }
    families
}

/// Build the ordered candidate shortlist for a resize of `current`.
///
/// Deterministic: the sort is stable, so equal (family, size) keys keep
/// their universe order.
pub fn build(current: &InstanceType, universe: &[String]) -> Vec<InstanceType> {
    let families = compatible_families(current.family());

    let mut shortlist: Vec<InstanceType> = universe
        .iter()
        .map(|id| InstanceType::new(id.clone()))
        .filter(|t| families.contains(&t.family()))
        .collect();

    shortlist.sort_by_key(|t| {
        let family_rank = families
            .iter()
            .position(|f| *f == t.family())
            .unwrap_or(families.len());
        (family_rank, SizeRank::of(t).sort_key())
    });

    shortlist
}
