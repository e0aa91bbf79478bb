//! Decision-and-validation pipeline for instance right-sizing
//!
//! This crate provides the core functionality for:
//! - Threshold-based resize decisions from utilization telemetry
//! - Candidate shortlist construction and size ranking
//! - Advisory language-model suggestions behind a strict validation gate
//! - Candidate-universe caching with a freshness invariant
//! - Decision artifact recording for the instance control service

pub mod catalog;
pub mod control;
pub mod models;
pub mod oracle;
pub mod pipeline;
pub mod recorder;
pub mod sizing;
pub mod telemetry;
pub mod validate;

pub use models::*;
pub use pipeline::Pipeline;
pub use telemetry::UtilizationSample;
pub use validate::Vetted;
