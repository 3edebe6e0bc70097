//! Deploy configuration for the simulated strategy stack.

use std::path::Path;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use sett_harness_sim::WAD;

use crate::error::Result;

/// Parameters for a full stack deployment.
///
/// Rates are WAD-scaled per-second values; fee and ratio fields are basis
/// points out of 10_000.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Want minted to the deployer at genesis
    pub initial_want_supply: U256,
    /// Lending pool interest rate per second (WAD-scaled)
    pub rate_per_second: U256,
    /// Reward index growth per second (reward wei per WAD of scaled balance)
    pub reward_per_second: U256,
    /// Fraction of idle vault want moved to the strategy on earn
    pub available_ratio_bps: u64,
    /// Performance fee paid to governance rewards on harvest
    pub performance_fee_governance: u64,
    /// Performance fee paid to the strategist on harvest
    pub performance_fee_strategist: u64,
    /// Fee charged when the strategy frees funds for a withdrawal
    pub withdrawal_fee: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            initial_want_supply: U256::from(10_000) * WAD,
            // ~10% APR
            rate_per_second: U256::from(3_170_979_198u64),
            reward_per_second: U256::from(1_000_000_000_000u64),
            available_ratio_bps: 9_500,
            performance_fee_governance: 1_000,
            performance_fee_strategist: 1_000,
            withdrawal_fee: 75,
        }
    }
}

impl DeployConfig {
    /// Load a configuration from a JSON file. Missing fields fall back to
    /// the defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = DeployConfig::default();
        assert!(config.initial_want_supply > U256::ZERO);
        assert!(config.available_ratio_bps <= 10_000);
        assert!(config.performance_fee_governance + config.performance_fee_strategist < 10_000);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: DeployConfig =
            serde_json::from_str(r#"{"withdrawal_fee": 0}"#).unwrap();
        assert_eq!(config.withdrawal_fee, 0);
        assert_eq!(config.available_ratio_bps, 9_500);
    }
}
