//! The resolver seam between the generic test manager and a strategy.
//!
//! A resolver contributes strategy-specific knowledge only: which named
//! balances must move in which direction for each operation kind, and which
//! auxiliary accounts to track in snapshots. It never initiates actions; the
//! manager owns the operation lifecycle and invokes the matching hook with
//! the snapshots bracketing the operation.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use sett_harness_sim::Chain;

use crate::deploy::DeployedStack;
use crate::error::Result;
use crate::snapshot::Snapshot;

/// Operation kinds the manager can run. Hook dispatch is keyed on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Deposit,
    Withdraw,
    Earn,
    Harvest,
    Tend,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdraw",
            Operation::Earn => "earn",
            Operation::Harvest => "harvest",
            Operation::Tend => "tend",
        };
        write!(f, "{name}")
    }
}

/// Arguments of the operation that produced a snapshot pair.
/// Opaque to the manager's generic checks; hooks may read them.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OpParams {
    /// Account that sent the operation
    pub sender: Address,
    /// Primary amount argument (deposit amount, shares burned, ...)
    pub amount: U256,
}

/// Record of a confirmed operation, passed to harvest/tend hooks.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TxRecord {
    pub operation: Operation,
    /// Chain timestamp at confirmation
    pub timestamp: u64,
    /// Operation output (want harvested, want tended, ...)
    pub amount: U256,
}

/// Strategy-specific assertion hooks, one per operation kind.
///
/// Each hook either returns `Ok(())` (operation accepted) or an
/// `InvariantViolated` error that aborts the test case. Implementations must
/// not cache anything derived from live chain state;
/// [`StrategyResolver::get_strategy_destinations`] in particular is
/// re-queried before every snapshot so that before/after track the same
/// accounts even as contract state changes.
pub trait StrategyResolver {
    /// Extra checks after an ordinary deposit. No strategy-specific
    /// invariant by default; override per strategy variant.
    fn hook_after_confirm_deposit(
        &self,
        _before: &Snapshot,
        _after: &Snapshot,
        _params: &OpParams,
    ) -> Result<()> {
        Ok(())
    }

    /// Extra checks after an ordinary withdrawal.
    fn hook_after_confirm_withdraw(
        &self,
        before: &Snapshot,
        after: &Snapshot,
        params: &OpParams,
    ) -> Result<()>;

    /// Extra checks after earn moves vault funds into the strategy.
    fn hook_after_earn(&self, before: &Snapshot, after: &Snapshot, params: &OpParams)
        -> Result<()>;

    /// Confirm a harvest: realized yield, share value and fee routing.
    fn confirm_harvest(&self, before: &Snapshot, after: &Snapshot, tx: &TxRecord) -> Result<()>;

    /// Confirm a tend: idle want fully invested into the pool mechanism.
    fn confirm_tend(&self, before: &Snapshot, after: &Snapshot, tx: &TxRecord) -> Result<()>;

    /// Auxiliary accounts to include in every snapshot, labeled. Re-derived
    /// from live contract state on each call; never cached.
    fn get_strategy_destinations(
        &self,
        chain: &Chain,
        stack: &DeployedStack,
    ) -> Result<BTreeMap<String, Address>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Harvest.to_string(), "harvest");
        assert_eq!(Operation::Deposit.to_string(), "deposit");
    }

    #[test]
    fn test_deposit_hook_is_vacuous_by_default() {
        struct Noop;
        impl StrategyResolver for Noop {
            fn hook_after_confirm_withdraw(
                &self,
                _: &Snapshot,
                _: &Snapshot,
                _: &OpParams,
            ) -> Result<()> {
                Ok(())
            }
            fn hook_after_earn(&self, _: &Snapshot, _: &Snapshot, _: &OpParams) -> Result<()> {
                Ok(())
            }
            fn confirm_harvest(&self, _: &Snapshot, _: &Snapshot, _: &TxRecord) -> Result<()> {
                Ok(())
            }
            fn confirm_tend(&self, _: &Snapshot, _: &Snapshot, _: &TxRecord) -> Result<()> {
                Ok(())
            }
            fn get_strategy_destinations(
                &self,
                _: &Chain,
                _: &DeployedStack,
            ) -> Result<BTreeMap<String, Address>> {
                Ok(BTreeMap::new())
            }
        }

        let empty = Snapshot::default();
        let params = OpParams {
            sender: Address::ZERO,
            amount: U256::ZERO,
        };
        assert!(Noop
            .hook_after_confirm_deposit(&empty, &empty, &params)
            .is_ok());
    }
}
