//! Decision artifact persistence
//!
//! Every run terminates with exactly one persisted artifact. Writes go
//! through a temp file and rename so a crashed run never leaves a
//! half-written document behind.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default artifact file for the resize-decision workflow.
pub const RECOMMENDATION_FILE: &str = "resize_recommendation.json";

/// Default artifact file for the compatibility-check workflow.
pub const VALIDATION_FILE: &str = "resize_validation.json";

// Distinguishes temp files of concurrent writers targeting the same path.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Serialize `value` as pretty JSON and atomically write it to `path`.
pub fn persist<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize artifact")?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let tmp = path.with_extension(format!(
        "json.tmp.{}.{}",
        std::process::id(),
        WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
    ));
    std::fs::write(&tmp, json)
        .with_context(|| format!("Failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move artifact into place at {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Artifact {
        decision: String,
        validated: bool,
    }

    #[test]
    fn test_persist_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resize_recommendation.json");

        let artifact = Artifact {
            decision: "upgrade".to_string(),
            validated: true,
        };
        persist(&path, &artifact).unwrap();

        let reread: Artifact =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, artifact);
        // No temp file left behind.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_concurrent_writers_to_one_path_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resize_recommendation.json");

        // Writers using a shared temp-file name would race each other's
        // rename; every write must succeed and leave a parseable document.
        std::thread::scope(|scope| {
            for i in 0..8 {
                let path = path.clone();
                scope.spawn(move || {
                    let artifact = Artifact {
                        decision: format!("upgrade-{}", i),
                        validated: true,
                    };
                    persist(&path, &artifact).unwrap();
                });
            }
        });

        let reread: Artifact =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(reread.decision.starts_with("upgrade-"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_persist_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts/run-1/resize_validation.json");

        persist(&path, &serde_json::json!({"ok": true})).unwrap();
        assert!(path.exists());
    }
}
