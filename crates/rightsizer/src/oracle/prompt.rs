//! Prompt construction for the two oracle workflows
//!
//! Both prompts are bounded: the suggestion prompt enumerates a capped
//! prefix of the shortlist as the only acceptable answer space, and the
//! compatibility prompt injects precomputed facts verbatim so the model
//! reasons over ground truth instead of re-deriving it.

use crate::models::{Architecture, Decision, InstanceDescriptor, InstanceType};
use crate::sizing::SizeRank;

/// Maximum shortlist entries enumerated in the suggestion prompt.
pub const SHORTLIST_PROMPT_CAP: usize = 20;

/// Build the resize-suggestion prompt.
pub fn suggestion_prompt(
    current: &InstanceType,
    architecture: Architecture,
    decision: Decision,
    shortlist: &[InstanceType],
) -> String {
    let options = shortlist
        .iter()
        .take(SHORTLIST_PROMPT_CAP)
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are optimizing cloud instance sizing.\n\
         \n\
         Current instance type: {current}\n\
         Architecture: {architecture}\n\
         Action recommended: {decision_upper} (based on CPU usage analysis).\n\
         Instance family: {family}\n\
         \n\
         Available options for {architecture} in this region (choose strictly from this list):\n\
         {options}\n\
         \n\
         Recommend a new instance type that represents a logical {decision} \
         (next size up/down). Avoid unnecessary large jumps. If no {decision} \
         exists in the list, explain briefly why instead of inventing a type.\n\
         \n\
         Respond with only the instance type name.",
        current = current,
        architecture = architecture,
        decision_upper = decision.as_str().to_uppercase(),
        family = current.family(),
        options = options,
        decision = decision,
    )
}

/// Ground-truth facts derived before the compatibility prompt is built.
/// Injected verbatim so the model never re-derives them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompatibilityFacts {
    /// The requested type is a member of the architecture's universe.
    pub requested_available_for_arch: bool,
    /// The requested size ranks strictly above the current size.
    pub is_size_increase: bool,
    /// Current and requested types share a family.
    pub is_same_family: bool,
}

impl CompatibilityFacts {
    pub fn derive(current: &InstanceType, requested: &InstanceType, universe: &[String]) -> Self {
        let current_rank = SizeRank::of(current);
        let requested_rank = SizeRank::of(requested);

        Self {
            requested_available_for_arch: universe.iter().any(|t| t == requested.as_str()),
            is_size_increase: current_rank.strictly_below(&requested_rank) == Some(true),
            is_same_family: current.family() == requested.family(),
        }
    }
}

/// Build the compatibility-judgement prompt for an externally requested
/// type. Few-shot examples pin the `VALID/NOT_VALID. <reason>` format.
pub fn compatibility_prompt(
    descriptor: &InstanceDescriptor,
    requested: &InstanceType,
    facts: &CompatibilityFacts,
) -> String {
    format!(
        "You are an expert cloud solutions architect.\n\
         Your task is to analyze an instance resize request.\n\
         Current instance type: {current}\n\
         Desired instance type: {requested}\n\
         Operating System: {os}\n\
         Architecture: {arch}\n\
         \n\
         # --- Factual Analysis ---\n\
         1. The requested instance type is {availability}available for this architecture.\n\
         2. The requested change is a {direction} in size.\n\
         3. The current and desired instance types {family_fact}.\n\
         # ------------------------\n\
         \n\
         Based on the provided facts, determine if the desired instance type is a \
         valid and logical upgrade. A change is valid if the architecture matches, \
         the change is a logical progression within the same or a compatible \
         family, and it is not a downgrade.\n\
         \n\
         Respond with 'VALID' if the request is logical and compatible, or \
         'NOT_VALID' if it is not. Provide a one-sentence reason.\n\
         \n\
         Example 1:\n\
         Current type: t2.micro\n\
         Desired type: t2.medium\n\
         Response: VALID. The t2.medium offers more resources within the same instance family.\n\
         \n\
         Example 2:\n\
         Current type: t2.micro\n\
         Desired type: c5.large\n\
         Response: NOT_VALID. This is a change to a compute-optimized family, which may be illogical without more context.\n\
         \n\
         Example 3:\n\
         Current type: t2.large\n\
         Desired type: t2.medium\n\
         Response: NOT_VALID. This is a downgrade in size within the same instance family.\n\
         \n\
         Your response should follow the format 'VALID/NOT_VALID. [Reason].'",
        current = descriptor.instance_type,
        requested = requested,
        os = descriptor.operating_system,
        arch = descriptor.architecture,
        availability = if facts.requested_available_for_arch { "" } else { "NOT " },
        direction = if facts.is_size_increase {
            "size increase"
        } else {
            "downgrade or side-grade"
        },
        family_fact = if facts.is_same_family {
            "are in the same family"
        } else {
            "are in DIFFERENT families"
        },
    )
}
