//! Error types for the matchmaking engine
//!
//! This module defines all error types using anyhow for consistent error
//! handling throughout the crate. "No match found" is deliberately NOT an
//! error: the pairing scan reports it as `Ok(None)`.

use crate::policy::PolicyError;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific matchmaking scenarios
#[derive(Debug, thiserror::Error)]
pub enum MatchmakingError {
    /// Usage violation: a group that breaks the occupancy invariants, an
    /// out-of-range size, or popping from an empty ready queue. Fail-fast;
    /// queue state is never patched up around a bad group.
    #[error("Invalid group: {reason}")]
    InvalidGroup { reason: String },

    /// The ready queue has no group to pop
    #[error("Ready queue is empty")]
    ReadyQueueEmpty,

    /// The decision policy itself failed while evaluating a judgment.
    /// Distinct from "no match found"; fatal to the session it served.
    #[error("Policy invocation failed: {0}")]
    Policy(#[from] PolicyError),

    /// A policy definition could not be loaded or validated
    #[error("Policy load failed: {reason}")]
    PolicyLoad { reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal engine error: {message}")]
    InternalError { message: String },
}
