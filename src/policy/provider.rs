//! Decision policy trait and the uniform baseline implementation
//!
//! A policy is an opaque capability the engine calls with exact semantics:
//! `is_compatible` gates both merging (complement-size groups) and pairing
//! (two full groups); `win_probability` and `score` are diagnostic only and
//! never influence the core algorithms.

use crate::types::Group;

/// Failure raised by a policy implementation itself
///
/// This is never conflated with "no match found": a policy that evaluates
/// cleanly and answers `false` is a normal outcome, a policy that cannot
/// evaluate at all is fatal to the operation that invoked it.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("Policy evaluation failed: {reason}")]
    Evaluation { reason: String },

    #[error("Policy returned an out-of-range value: {detail}")]
    OutOfRange { detail: String },
}

/// External decision capability consulted by the engine
///
/// Implementations must be pure functions of group contents. They may rely
/// on the group introspection primitives (`len`, `cap`, `role_bitmap`,
/// `rank_range`) and on direct slot access, nothing else. The engine never
/// retries a failed policy call; retry policy belongs to the caller.
pub trait DecisionPolicy: Send + Sync {
    /// May `a` and `b` be merged (complement sizes) or paired (both full)?
    fn is_compatible(&self, a: &Group, b: &Group) -> Result<bool, PolicyError>;

    /// Estimated probability in [0, 1] that `blue` beats `red`
    ///
    /// The red-side probability is the complement. Only meaningful for full
    /// groups that have already been paired.
    fn win_probability(&self, blue: &Group, red: &Group) -> Result<f64, PolicyError>;

    /// Weighted aggregate of the group's player scores
    ///
    /// Slot-indexed weights are owned by the policy, not the engine. Used
    /// for display and diagnostics only.
    fn score(&self, group: &Group) -> Result<f64, PolicyError>;
}

/// Baseline policy: everything is compatible, odds are even, weights are 1
///
/// Installed when no rule definition has been loaded; also the standard
/// stub for exercising engine mechanics in tests.
#[derive(Debug, Clone, Default)]
pub struct UniformPolicy;

impl UniformPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl DecisionPolicy for UniformPolicy {
    fn is_compatible(&self, _a: &Group, _b: &Group) -> Result<bool, PolicyError> {
        Ok(true)
    }

    fn win_probability(&self, _blue: &Group, _red: &Group) -> Result<f64, PolicyError> {
        Ok(0.5)
    }

    fn score(&self, group: &Group) -> Result<f64, PolicyError> {
        Ok(group
            .players()
            .iter()
            .filter(|p| p.is_occupied())
            .map(|p| p.score)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, Rank, Roles};

    fn group_with_scores(scores: &[f64]) -> Group {
        let mut g = Group::new(5).unwrap();
        for (slot, &score) in scores.iter().enumerate() {
            g.place(
                slot,
                Player {
                    id: (slot + 1) as u64,
                    rank: Rank::Gold,
                    score,
                    roles: Roles::for_slot(slot),
                },
            )
            .unwrap();
        }
        g
    }

    #[test]
    fn test_uniform_policy_accepts_everything() {
        let policy = UniformPolicy::new();
        let a = group_with_scores(&[100.0, 200.0]);
        let b = group_with_scores(&[50.0]);

        assert!(policy.is_compatible(&a, &b).unwrap());
        assert_eq!(policy.win_probability(&a, &b).unwrap(), 0.5);
    }

    #[test]
    fn test_uniform_policy_unweighted_score() {
        let policy = UniformPolicy::new();
        let g = group_with_scores(&[100.0, 200.0, 50.0]);
        assert_eq!(policy.score(&g).unwrap(), 350.0);
    }
}
