//! Disk-backed freshness cache for the candidate universe
//!
//! Entries are keyed `{region}_{architecture}` and carry their refresh
//! timestamp. A cache miss or stale entry triggers one upstream fetch;
//! concurrent runs hitting the same key collapse onto a single in-flight
//! refresh, with freshness re-validated under the key lock.

use super::CatalogSource;
use crate::models::Architecture;
use crate::recorder;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// A cached universe older than this is stale and must be refreshed.
pub const STALENESS_HOURS: i64 = 23;

/// Freshness predicate, factored out for direct testing.
pub fn is_fresh(last_updated: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - last_updated < Duration::hours(STALENESS_HOURS)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    last_updated: DateTime<Utc>,
    instance_types: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    #[serde(flatten)]
    entries: HashMap<String, CacheEntry>,
}

/// Caching wrapper around a [`CatalogSource`].
pub struct CachedCatalog<S> {
    source: S,
    cache_path: PathBuf,
    inflight: DashMap<String, Arc<Mutex<()>>>,
    // All keys share one cache file, so the load-modify-persist write
    // sequence needs a file-level lock on top of the per-key locks.
    file_lock: Mutex<()>,
}

impl<S: CatalogSource> CachedCatalog<S> {
    pub fn new(source: S, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            cache_path: cache_path.into(),
            inflight: DashMap::new(),
            file_lock: Mutex::new(()),
        }
    }

    /// Return the candidate universe for (region, architecture), from
    /// cache when fresh, refreshing otherwise.
    pub async fn list_valid_types(
        &self,
        region: &str,
        architecture: Architecture,
    ) -> Result<Vec<String>> {
        let key = format!("{}_{}", region, architecture);

        if let Some(types) = self.read_fresh(&key, Utc::now())? {
            debug!(key = %key, "Using cached instance type universe");
            return Ok(types);
        }

        // Collapse concurrent refreshes of the same key.
        let lock = self
            .inflight
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Another run may have refreshed while we waited for the lock.
        if let Some(types) = self.read_fresh(&key, Utc::now())? {
            return Ok(types);
        }

        info!(key = %key, "Refreshing instance type universe from source");
        let types = self.source.list_valid_types(region, architecture).await?;
        self.write_entry(&key, Utc::now(), &types).await?;
        Ok(types)
    }

    fn read_fresh(&self, key: &str, now: DateTime<Utc>) -> Result<Option<Vec<String>>> {
        let cache = load_cache(&self.cache_path)?;
        Ok(cache.entries.get(key).and_then(|entry| {
            is_fresh(entry.last_updated, now).then(|| entry.instance_types.clone())
        }))
    }

    async fn write_entry(&self, key: &str, now: DateTime<Utc>, types: &[String]) -> Result<()> {
        // A refresh of another key must not run its own load-modify-persist
        // between ours, or one of the two entries is lost.
        let _guard = self.file_lock.lock().await;
        let mut cache = load_cache(&self.cache_path)?;
        cache.entries.insert(
            key.to_string(),
            CacheEntry {
                last_updated: now,
                instance_types: types.to_vec(),
            },
        );
        recorder::persist(&self.cache_path, &cache)
    }
}

fn load_cache(path: &Path) -> Result<CacheFile> {
    if !path.exists() {
        return Ok(CacheFile::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog cache at {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Malformed catalog cache at {}", path.display()))
}
