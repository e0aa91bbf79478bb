//! Candidate-universe catalog: source trait plus freshness cache
//!
//! The universe of valid instance types for a (region, architecture)
//! pair comes from an external provider API. Fetches are expensive, so
//! results are cached on disk with a 23-hour staleness threshold.

mod cache;

pub use cache::{is_fresh, CachedCatalog, STALENESS_HOURS};

use crate::models::Architecture;
use anyhow::Result;
use async_trait::async_trait;

/// Source of the authoritative candidate universe. Implementations are
/// architecture-homogeneous: every returned identifier supports the
/// requested architecture.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_valid_types(&self, region: &str, architecture: Architecture)
        -> Result<Vec<String>>;
}
