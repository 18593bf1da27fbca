//! Rule-based decision policy loaded from a TOML definition
//!
//! This is the native counterpart of an externally scripted policy: the
//! rules a deployment would otherwise author in a script file are expressed
//! as a declarative definition, validated at load time. A failed load never
//! disturbs the policy already installed on an engine.

use crate::error::{MatchmakingError, Result};
use crate::policy::provider::{DecisionPolicy, PolicyError};
use crate::types::Group;
use serde::{Deserialize, Serialize};
use skillratings::weng_lin::{expected_score, WengLinConfig, WengLinRating};
use std::path::Path;

/// Declarative policy definition, deserialized from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDefinition {
    #[serde(default)]
    pub compatibility: CompatibilityRules,
    #[serde(default)]
    pub elo: EloSettings,
    #[serde(default)]
    pub score: ScoreSettings,
}

impl Default for PolicyDefinition {
    fn default() -> Self {
        Self {
            compatibility: CompatibilityRules::default(),
            elo: EloSettings::default(),
            score: ScoreSettings::default(),
        }
    }
}

/// Rules gating merges and pairings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityRules {
    /// Maximum rank-tier spread allowed across the union of both groups
    pub max_rank_gap: u8,
    /// When merging partial groups, require their role bitmaps be disjoint
    pub require_disjoint_roles: bool,
}

impl Default for CompatibilityRules {
    fn default() -> Self {
        Self {
            max_rank_gap: 2,
            require_disjoint_roles: false,
        }
    }
}

/// Weng-Lin parameters for win-probability estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EloSettings {
    /// Skill-class width; larger values flatten the probability curve
    pub beta: f64,
    /// Uncertainty assigned to each team's aggregate rating
    pub uncertainty: f64,
}

impl Default for EloSettings {
    fn default() -> Self {
        Self {
            beta: 200.0,
            uncertainty: 200.0,
        }
    }
}

/// Slot-indexed weights for group scoring
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScoreSettings {
    /// Weight per slot index; slots beyond the list weigh 1.0
    pub weights: Vec<f64>,
}

impl PolicyDefinition {
    /// Validate the definition before installing it
    pub fn validate(&self) -> Result<()> {
        if self.elo.beta <= 0.0 {
            return Err(MatchmakingError::PolicyLoad {
                reason: "elo.beta must be positive".to_string(),
            }
            .into());
        }
        if self.elo.uncertainty <= 0.0 {
            return Err(MatchmakingError::PolicyLoad {
                reason: "elo.uncertainty must be positive".to_string(),
            }
            .into());
        }
        if self.score.weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(MatchmakingError::PolicyLoad {
                reason: "score.weights must be finite and non-negative".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Decision policy driven by a [`PolicyDefinition`]
#[derive(Debug, Clone)]
pub struct RulePolicy {
    definition: PolicyDefinition,
}

impl RulePolicy {
    /// Install a validated definition
    pub fn new(definition: PolicyDefinition) -> Result<Self> {
        definition.validate()?;
        Ok(Self { definition })
    }

    /// Load and validate a definition from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            MatchmakingError::PolicyLoad {
                reason: format!("cannot read {}: {}", path.as_ref().display(), e),
            }
        })?;
        let definition: PolicyDefinition =
            toml::from_str(&raw).map_err(|e| MatchmakingError::PolicyLoad {
                reason: format!("cannot parse {}: {}", path.as_ref().display(), e),
            })?;
        Self::new(definition)
    }

    pub fn definition(&self) -> &PolicyDefinition {
        &self.definition
    }

    /// Aggregate team rating: mean score of occupied slots
    fn team_rating(&self, group: &Group) -> WengLinRating {
        let occupied: Vec<f64> = group
            .players()
            .iter()
            .filter(|p| p.is_occupied())
            .map(|p| p.score)
            .collect();
        let mean = if occupied.is_empty() {
            0.0
        } else {
            occupied.iter().sum::<f64>() / occupied.len() as f64
        };
        WengLinRating {
            rating: mean,
            uncertainty: self.definition.elo.uncertainty,
        }
    }
}

impl DecisionPolicy for RulePolicy {
    fn is_compatible(&self, a: &Group, b: &Group) -> std::result::Result<bool, PolicyError> {
        let rules = &self.definition.compatibility;

        // Rank spread of the combined roster
        if let (Some((lo_a, hi_a)), Some((lo_b, hi_b))) = (a.rank_range(), b.rank_range()) {
            let lo = lo_a.min(lo_b);
            let hi = hi_a.max(hi_b);
            if lo.gap(hi) > rules.max_rank_gap {
                return Ok(false);
            }
        }

        // Role collisions only matter when merging partial groups; paired
        // full teams each field their own roster.
        let merging = !a.is_full() && !b.is_full();
        if merging && rules.require_disjoint_roles && a.role_bitmap().overlaps(b.role_bitmap()) {
            return Ok(false);
        }

        Ok(true)
    }

    fn win_probability(&self, blue: &Group, red: &Group) -> std::result::Result<f64, PolicyError> {
        let config = WengLinConfig {
            beta: self.definition.elo.beta,
            uncertainty_tolerance: 0.0001,
        };
        let (blue_win, _red_win) =
            expected_score(&self.team_rating(blue), &self.team_rating(red), &config);
        if !(0.0..=1.0).contains(&blue_win) {
            return Err(PolicyError::OutOfRange {
                detail: format!("win probability {}", blue_win),
            });
        }
        Ok(blue_win)
    }

    fn score(&self, group: &Group) -> std::result::Result<f64, PolicyError> {
        let weights = &self.definition.score.weights;
        Ok(group
            .players()
            .iter()
            .enumerate()
            .map(|(i, p)| weights.get(i).copied().unwrap_or(1.0) * p.score)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Player, Rank, Roles};

    fn player(id: u64, rank: Rank, score: f64, slot: usize) -> Player {
        Player {
            id,
            rank,
            score,
            roles: Roles::for_slot(slot),
        }
    }

    fn partial_group(cap: usize, ranks: &[Rank], base_slot: usize) -> Group {
        let mut g = Group::new(cap).unwrap();
        for (i, &rank) in ranks.iter().enumerate() {
            let slot = base_slot + i;
            g.place(slot, player((slot + 1) as u64, rank, 100.0, slot))
                .unwrap();
        }
        g
    }

    #[test]
    fn test_rank_gap_gating() {
        let policy = RulePolicy::new(PolicyDefinition {
            compatibility: CompatibilityRules {
                max_rank_gap: 1,
                require_disjoint_roles: false,
            },
            elo: EloSettings::default(),
            score: ScoreSettings::default(),
        })
        .unwrap();

        let a = partial_group(5, &[Rank::Gold, Rank::Gold], 0);
        let close = partial_group(5, &[Rank::Platinum, Rank::Gold, Rank::Gold], 2);
        let far = partial_group(5, &[Rank::Challenger, Rank::Gold, Rank::Gold], 2);

        assert!(policy.is_compatible(&a, &close).unwrap());
        assert!(!policy.is_compatible(&a, &far).unwrap());
    }

    #[test]
    fn test_disjoint_roles_only_gates_merges() {
        let policy = RulePolicy::new(PolicyDefinition {
            compatibility: CompatibilityRules {
                max_rank_gap: 5,
                require_disjoint_roles: true,
            },
            elo: EloSettings::default(),
            score: ScoreSettings::default(),
        })
        .unwrap();

        // Both partial, both holding the top-lane slot
        let a = partial_group(5, &[Rank::Gold], 0);
        let mut b = Group::new(5).unwrap();
        b.place(0, player(9, Rank::Gold, 100.0, 0)).unwrap();
        assert!(!policy.is_compatible(&a, &b).unwrap());

        // Two full teams share every role; pairing is still allowed
        let full_a = partial_group(5, &[Rank::Gold; 5], 0);
        let full_b = partial_group(5, &[Rank::Gold; 5], 0);
        assert!(policy.is_compatible(&full_a, &full_b).unwrap());
    }

    #[test]
    fn test_win_probability_favors_higher_scores() {
        let policy = RulePolicy::new(PolicyDefinition::default()).unwrap();

        let mut strong = Group::new(5).unwrap();
        let mut weak = Group::new(5).unwrap();
        for slot in 0..5 {
            strong
                .place(slot, player((slot + 1) as u64, Rank::Gold, 1800.0, slot))
                .unwrap();
            weak.place(slot, player((slot + 6) as u64, Rank::Gold, 1200.0, slot))
                .unwrap();
        }

        let p = policy.win_probability(&strong, &weak).unwrap();
        assert!(p > 0.5 && p <= 1.0);

        let q = policy.win_probability(&weak, &strong).unwrap();
        assert!((p + q - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_score() {
        let policy = RulePolicy::new(PolicyDefinition {
            compatibility: CompatibilityRules::default(),
            elo: EloSettings::default(),
            score: ScoreSettings {
                weights: vec![2.0, 0.5],
            },
        })
        .unwrap();

        let g = partial_group(5, &[Rank::Gold; 3], 0);
        // 2.0*100 + 0.5*100 + 1.0*100, empty slots score zero
        assert_eq!(policy.score(&g).unwrap(), 350.0);
    }

    #[test]
    fn test_definition_validation() {
        let mut bad = PolicyDefinition::default();
        bad.elo.beta = 0.0;
        assert!(RulePolicy::new(bad).is_err());

        let mut bad = PolicyDefinition::default();
        bad.score.weights = vec![1.0, -0.5];
        assert!(RulePolicy::new(bad).is_err());
    }

    #[test]
    fn test_parse_definition_from_toml() {
        let raw = r#"
            [compatibility]
            max_rank_gap = 3
            require_disjoint_roles = true

            [elo]
            beta = 150.0
            uncertainty = 100.0

            [score]
            weights = [1.0, 1.1, 1.2, 0.9, 0.8]
        "#;
        let definition: PolicyDefinition = toml::from_str(raw).unwrap();
        assert_eq!(definition.compatibility.max_rank_gap, 3);
        assert!(definition.compatibility.require_disjoint_roles);
        assert_eq!(definition.score.weights.len(), 5);
        assert!(RulePolicy::new(definition).is_ok());
    }
}
