//! Deploy helper: builds the full simulated stack and wires it up.

use alloy_primitives::Address;
use sett_harness_sim::{Chain, LendingPool, Sett, Strategy, StrategyFees};

use crate::config::DeployConfig;
use crate::error::Result;

/// A deployed strategy stack and its named actors.
#[derive(Debug, Clone)]
pub struct DeployedStack {
    pub deployer: Address,
    pub strategist: Address,
    pub governance_rewards: Address,
    /// The managed token
    pub want: Address,
    pub pool: LendingPool,
    pub sett: Sett,
    pub strategy: Strategy,
}

/// Deploy want, the lending pool, the sett and the strategy on a fresh
/// chain, and fund the deployer with the initial want supply.
pub fn deploy(config: &DeployConfig) -> Result<(Chain, DeployedStack)> {
    let mut chain = Chain::new();

    let deployer = chain.create_account();
    let strategist = chain.create_account();
    let governance_rewards = chain.create_account();

    let want = chain.deploy_token("WANT");
    chain.mint(want, deployer, config.initial_want_supply)?;

    let pool = LendingPool::deploy(
        &mut chain,
        want,
        config.rate_per_second,
        config.reward_per_second,
    );
    let sett = Sett::deploy(&mut chain, want, config.available_ratio_bps);
    let strategy = Strategy::deploy(
        &mut chain,
        want,
        strategist,
        governance_rewards,
        StrategyFees {
            performance_fee_governance: config.performance_fee_governance,
            performance_fee_strategist: config.performance_fee_strategist,
            withdrawal_fee: config.withdrawal_fee,
        },
    );

    Ok((
        chain,
        DeployedStack {
            deployer,
            strategist,
            governance_rewards,
            want,
            pool,
            sett,
            strategy,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    #[test]
    fn test_deploy_funds_deployer() -> Result<()> {
        let config = DeployConfig::default();
        let (chain, stack) = deploy(&config)?;

        assert_eq!(
            chain.balance_of(stack.want, stack.deployer),
            config.initial_want_supply
        );
        assert_ne!(stack.sett.address, stack.strategy.address);
        assert_eq!(stack.pool.want, stack.want);
        assert_eq!(chain.balance_of(stack.want, stack.sett.address), U256::ZERO);
        Ok(())
    }
}
