//! Rift Queue - Matchmaking queue engine for team-based games
//!
//! This crate accepts partially-filled or full player groups, merges
//! compatible partial groups into full teams, and pairs full teams into
//! balanced matches under a pluggable compatibility/scoring policy.

pub mod config;
pub mod error;
pub mod policy;
pub mod queue;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{MatchmakingError, Result};
pub use types::*;

// Re-export key components
pub use config::{EngineConfig, PairingFairness};
pub use policy::{DecisionPolicy, PolicyError, RulePolicy, UniformPolicy};
pub use queue::{Matchmaker, SharedMatchmaker};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
