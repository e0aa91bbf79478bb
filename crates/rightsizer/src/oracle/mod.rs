//! Advisory oracle: an external language model consulted for a concrete
//! resize target or a compatibility judgement.
//!
//! The oracle is advisory and untrusted. Its replies are free text that
//! must pass the validator's membership or verdict gate before they can
//! influence any mutating action.

mod prompt;
mod provider;

pub use prompt::{
    compatibility_prompt, suggestion_prompt, CompatibilityFacts, SHORTLIST_PROMPT_CAP,
};
pub use provider::{ChatCompletionsOracle, OracleConfig};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failures of the advisory call. None of these are fatal to a pipeline
/// run; they all resolve to a rejected, recorded decision.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("oracle request timed out after {0:?}")]
    Timeout(Duration),

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle returned an empty or malformed response")]
    EmptyResponse,
}

/// Injected oracle capability. Implementations own their endpoint,
/// credentials, and retry policy; the pipeline only sees trimmed reply
/// text.
#[async_trait]
pub trait OracleProvider: Send + Sync {
    /// Send one bounded natural-language request and return the reply
    /// text, trimmed. The reply is untrusted.
    async fn complete(&self, prompt: &str) -> Result<String, OracleError>;
}
