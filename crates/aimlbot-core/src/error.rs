//! Error types for the fallback brain core.

use thiserror::Error;

/// Errors from brain lifecycle and kernel operations.
#[derive(Error, Debug)]
pub enum BrainError {
    /// `ask` was called before `load` (or after a reset).
    #[error("brain is not loaded")]
    NotLoaded,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("brain serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Engine-internal failure during learn/respond. Propagates to the host
    /// dispatch untouched; this layer defines no retry policy.
    #[error("kernel error: {0}")]
    Kernel(String),
}

/// Errors from the device identity lookup. Always recovered by the adapter
/// with the static default identity; never surfaced to the caller.
#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("device API URL is not configured")]
    Unconfigured,

    #[error("device API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("device API returned a malformed identity: {0}")]
    Malformed(String),
}
