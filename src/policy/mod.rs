//! Decision policy boundary for the matchmaking engine
//!
//! The engine never judges compatibility, win probability, or group score
//! itself; it delegates every such decision to an installed policy. This
//! module defines the policy interface and the two native implementations.

pub mod provider;
pub mod rules;

// Re-export commonly used types
pub use provider::{DecisionPolicy, PolicyError, UniformPolicy};
pub use rules::{PolicyDefinition, RulePolicy};
