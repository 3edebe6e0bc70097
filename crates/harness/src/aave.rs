//! Resolver for the Aave lending strategy.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use sett_harness_sim::Chain;

use crate::deploy::DeployedStack;
use crate::error::{ensure, Result};
use crate::resolver::{OpParams, StrategyResolver, TxRecord};
use crate::snapshot::Snapshot;

/// Invariant hooks for a strategy that lends want into an Aave-style pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct AaveStrategyResolver;

impl StrategyResolver for AaveStrategyResolver {
    // Deposit keeps the vacuous default hook: nothing strategy-specific
    // happens until earn pushes funds to the pool.

    fn hook_after_confirm_withdraw(
        &self,
        before: &Snapshot,
        after: &Snapshot,
        _params: &OpParams,
    ) -> Result<()> {
        // The pool sends funds out of the aToken reserve
        ensure(
            after.balances("want", "aToken")? < before.balances("want", "aToken")?,
            "aToken want balance strictly decreases on withdraw",
        )
    }

    fn hook_after_earn(
        &self,
        before: &Snapshot,
        after: &Snapshot,
        _params: &OpParams,
    ) -> Result<()> {
        // The pool receives funds into the aToken reserve
        ensure(
            after.balances("want", "aToken")? > before.balances("want", "aToken")?,
            "aToken want balance strictly increases on earn",
        )
    }

    fn confirm_harvest(&self, before: &Snapshot, after: &Snapshot, _tx: &TxRecord) -> Result<()> {
        ensure(
            after.amount("strategy.balanceOf")? >= before.amount("strategy.balanceOf")?,
            "strategy want balance does not decrease on harvest",
        )?;
        ensure(
            after.amount("sett.pricePerFullShare")? >= before.amount("sett.pricePerFullShare")?,
            "pricePerFullShare does not decrease on harvest",
        )?;

        let value_gained =
            after.amount("sett.pricePerFullShare")? > before.amount("sett.pricePerFullShare")?;

        // Strategist earns if the fee is enabled and value was generated
        if before.amount("strategy.performanceFeeStrategist")? > U256::ZERO && value_gained {
            ensure(
                after.balances("want", "strategist")? > before.balances("want", "strategist")?,
                "strategist want balance strictly increases on harvest",
            )?;
        }

        // Governance earns if the fee is enabled and value was generated
        if before.amount("strategy.performanceFeeGovernance")? > U256::ZERO && value_gained {
            ensure(
                after.balances("want", "governanceRewards")?
                    > before.balances("want", "governanceRewards")?,
                "governance rewards want balance strictly increases on harvest",
            )?;
        }

        Ok(())
    }

    fn confirm_tend(&self, before: &Snapshot, after: &Snapshot, _tx: &TxRecord) -> Result<()> {
        ensure(
            before.flag("strategy.isTendable")?,
            "strategy is tendable before tend",
        )?;
        ensure(
            before.amount("strategy.balanceOfWant")? > U256::ZERO,
            "strategy holds idle want before tend",
        )?;
        ensure(
            !after.flag("strategy.isTendable")?,
            "strategy is no longer tendable after tend",
        )?;
        ensure(
            after.amount("strategy.balanceOfWant")?.is_zero(),
            "idle want is zero after tend",
        )?;
        ensure(
            after.amount("strategy.balanceOfPool")? > before.amount("strategy.balanceOfPool")?,
            "pooled balance strictly increases on tend",
        )
    }

    fn get_strategy_destinations(
        &self,
        _chain: &Chain,
        stack: &DeployedStack,
    ) -> Result<BTreeMap<String, Address>> {
        // Re-derived from the live stack on every call; callers must not
        // assume stability across operations.
        let mut destinations = BTreeMap::new();
        destinations.insert("LendingPool".to_string(), stack.pool.address);
        destinations.insert("aToken".to_string(), stack.pool.a_token);
        Ok(destinations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeployConfig;
    use crate::deploy::deploy;
    use crate::error::HarnessError;
    use crate::snapshot::{MetricValue, SnapshotBuilder};

    fn snapshot_with_atoken(amount: u64) -> Snapshot {
        let mut builder = SnapshotBuilder::new();
        builder.balance("want", "aToken", U256::from(amount));
        builder.build()
    }

    #[test]
    fn test_withdraw_hook_requires_decrease() {
        let resolver = AaveStrategyResolver;
        let params = OpParams {
            sender: Address::ZERO,
            amount: U256::from(1),
        };

        let ok = resolver.hook_after_confirm_withdraw(
            &snapshot_with_atoken(100),
            &snapshot_with_atoken(90),
            &params,
        );
        assert!(ok.is_ok());

        let violated = resolver.hook_after_confirm_withdraw(
            &snapshot_with_atoken(100),
            &snapshot_with_atoken(100),
            &params,
        );
        assert!(matches!(
            violated,
            Err(HarnessError::InvariantViolated { .. })
        ));
    }

    #[test]
    fn test_earn_hook_requires_increase() {
        let resolver = AaveStrategyResolver;
        let params = OpParams {
            sender: Address::ZERO,
            amount: U256::from(1),
        };

        assert!(resolver
            .hook_after_earn(&snapshot_with_atoken(100), &snapshot_with_atoken(150), &params)
            .is_ok());
        assert!(resolver
            .hook_after_earn(&snapshot_with_atoken(100), &snapshot_with_atoken(100), &params)
            .is_err());
    }

    #[test]
    fn test_tend_hook_checks_pre_and_post_state() {
        let resolver = AaveStrategyResolver;
        let tx = TxRecord {
            operation: crate::resolver::Operation::Tend,
            timestamp: 0,
            amount: U256::from(10),
        };

        let mut builder = SnapshotBuilder::new();
        builder
            .metric("strategy.isTendable", MetricValue::Flag(true))
            .metric("strategy.balanceOfWant", MetricValue::Amount(U256::from(10)))
            .metric("strategy.balanceOfPool", MetricValue::Amount(U256::from(50)));
        let before = builder.build();

        let mut builder = SnapshotBuilder::new();
        builder
            .metric("strategy.isTendable", MetricValue::Flag(false))
            .metric("strategy.balanceOfWant", MetricValue::Amount(U256::ZERO))
            .metric("strategy.balanceOfPool", MetricValue::Amount(U256::from(60)));
        let after = builder.build();

        assert!(resolver.confirm_tend(&before, &after, &tx).is_ok());
        // A tend that leaves the pool flat must be rejected
        assert!(resolver.confirm_tend(&before, &before, &tx).is_err());
    }

    #[test]
    fn test_destinations_follow_live_stack() -> crate::error::Result<()> {
        let (chain, stack) = deploy(&DeployConfig::default())?;
        let resolver = AaveStrategyResolver;

        let destinations = resolver.get_strategy_destinations(&chain, &stack)?;
        assert_eq!(destinations.get("LendingPool"), Some(&stack.pool.address));
        assert_eq!(destinations.get("aToken"), Some(&stack.pool.a_token));
        Ok(())
    }
}
