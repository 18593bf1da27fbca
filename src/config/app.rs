//! Main engine configuration
//!
//! This module defines the configuration structure for the matchmaking
//! engine, including environment variable loading and validation.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Ordering bias of the pairing scan
///
/// The original tail-to-head scan pairs the most recently readied groups
/// first, which can starve older groups under continuous load. The bias is
/// therefore a deployment choice, not a hardcoded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PairingFairness {
    /// Scan from the tail: most recently readied groups pair first
    #[default]
    NewestFirst,
    /// Scan from the head: longest-waiting groups pair first
    OldestFirst,
}

impl std::str::FromStr for PairingFairness {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "newest_first" | "newest-first" | "newest" => Ok(PairingFairness::NewestFirst),
            "oldest_first" | "oldest-first" | "oldest" => Ok(PairingFairness::OldestFirst),
            _ => Err(anyhow!("Invalid pairing fairness: {}", s)),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Target team size; also the capacity of every group
    pub team_size: usize,
    /// Ready-pool size at or above which the merge search is skipped
    pub backpressure_threshold: usize,
    /// Pairing scan order
    pub fairness: PairingFairness,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            team_size: 5,
            backpressure_threshold: 32,
            fairness: PairingFairness::NewestFirst,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(size) = env::var("TEAM_SIZE") {
            config.team_size = size
                .parse()
                .map_err(|_| anyhow!("Invalid TEAM_SIZE value: {}", size))?;
        }
        if let Ok(threshold) = env::var("BACKPRESSURE_THRESHOLD") {
            config.backpressure_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("Invalid BACKPRESSURE_THRESHOLD value: {}", threshold))?;
        }
        if let Ok(fairness) = env::var("PAIRING_FAIRNESS") {
            config.fairness = fairness.parse()?;
        }

        validate_config(&config)?;
        Ok(config)
    }
}

/// Validate configuration values
pub fn validate_config(config: &EngineConfig) -> Result<()> {
    if config.team_size == 0 {
        return Err(anyhow!("Team size must be greater than 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.team_size, 5);
        assert_eq!(config.backpressure_threshold, 32);
        assert_eq!(config.fairness, PairingFairness::NewestFirst);
    }

    #[test]
    fn test_zero_team_size_rejected() {
        let config = EngineConfig {
            team_size: 0,
            ..EngineConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_fairness_parsing() {
        assert_eq!(
            "newest_first".parse::<PairingFairness>().unwrap(),
            PairingFairness::NewestFirst
        );
        assert_eq!(
            "oldest".parse::<PairingFairness>().unwrap(),
            PairingFairness::OldestFirst
        );
        assert!("fairest".parse::<PairingFairness>().is_err());
    }
}
