//! Error taxonomy for the analysis pipeline.
//!
//! Only validation failures prevent a result from being produced; store and
//! external-service failures degrade inside the orchestrator and never reach
//! the caller as a hard failure.

use thiserror::Error;

/// Failures surfaced by stores and backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out after {0}ms")]
    Timeout(u64),
    #[error("store internal error: {0}")]
    Internal(String),
}

/// Failures surfaced by the orchestrator to API callers.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Malformed input; rejected before any store mutation.
    #[error("invalid request: {0}")]
    Validation(String),
    /// Unexpected mid-pipeline failure; surfaced as one failed analysis.
    #[error("analysis failed: {0}")]
    Internal(String),
}
