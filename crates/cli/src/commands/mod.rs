//! CLI command implementations

pub mod analyze;
pub mod validate;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Run document accepted in place of positional arguments.
#[derive(Debug, Clone, Deserialize)]
pub struct RunInput {
    pub instance_id: String,
    pub region: String,
    #[serde(default)]
    pub desired_instance_type: Option<String>,
}

/// Load a run document. A missing file or missing required key is a
/// fatal input error surfaced as a non-zero exit.
pub fn load_run_input(path: &Path) -> Result<RunInput> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid input file {}", path.display()))
}
