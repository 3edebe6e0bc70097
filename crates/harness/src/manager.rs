//! Generic strategy test manager.
//!
//! The manager owns the operation lifecycle: it takes a balance snapshot,
//! executes the simulated transactions for an operation, takes another
//! snapshot, runs the generic checks that hold for any strategy, and then
//! dispatches the matching resolver hook keyed on [`Operation`].

use alloy_primitives::{Address, U256};
use serde::Serialize;
use sett_harness_sim::Chain;

use crate::deploy::DeployedStack;
use crate::error::{ensure, Result};
use crate::resolver::{OpParams, Operation, StrategyResolver, TxRecord};
use crate::snapshot::{MetricValue, Snapshot, SnapshotBuilder};

/// A confirmed operation with the snapshots bracketing it.
#[derive(Debug, Clone, Serialize)]
pub struct OpReport {
    pub tx: TxRecord,
    pub before: Snapshot,
    pub after: Snapshot,
}

/// Drives operations against a deployed stack and confirms their effects.
pub struct StrategyTestManager<R: StrategyResolver> {
    chain: Chain,
    stack: DeployedStack,
    resolver: R,
}

impl<R: StrategyResolver> StrategyTestManager<R> {
    pub fn new(chain: Chain, stack: DeployedStack, resolver: R) -> Self {
        Self {
            chain,
            stack,
            resolver,
        }
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Mutable chain access for scripted setup (approvals, sleeps, seeding).
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    pub fn stack(&self) -> &DeployedStack {
        &self.stack
    }

    /// Approve the sett to spend `amount` of `owner`'s want.
    pub fn approve_want(&mut self, owner: Address, amount: U256) -> Result<()> {
        self.chain
            .approve(self.stack.want, owner, self.stack.sett.address, amount)?;
        Ok(())
    }

    /// Take a snapshot of all tracked balances and metrics.
    ///
    /// Holder labels cover the named actors plus whatever the resolver's
    /// destination mapping currently reports.
    pub fn snapshot(&self) -> Result<Snapshot> {
        let stack = &self.stack;
        let mut holders = vec![
            ("deployer".to_string(), stack.deployer),
            ("sett".to_string(), stack.sett.address),
            ("strategy".to_string(), stack.strategy.address),
            ("strategist".to_string(), stack.strategist),
            ("governanceRewards".to_string(), stack.governance_rewards),
        ];
        for (label, address) in self
            .resolver
            .get_strategy_destinations(&self.chain, stack)?
        {
            holders.push((label, address));
        }

        let tokens = [
            ("want", stack.want),
            ("aToken", stack.pool.a_token),
            ("reward", stack.pool.reward_token),
            ("sett", stack.sett.share_token),
        ];

        let mut builder = SnapshotBuilder::new();
        for (token_label, token) in tokens {
            for (holder_label, holder) in &holders {
                builder.balance(
                    token_label,
                    holder_label,
                    self.chain.balance_of(token, *holder),
                );
            }
        }

        let sett = &stack.sett;
        let strategy = &stack.strategy;
        let pool = &stack.pool;
        builder
            .metric(
                "sett.pricePerFullShare",
                MetricValue::Amount(sett.price_per_full_share(&self.chain, strategy, pool)?),
            )
            .metric(
                "sett.balance",
                MetricValue::Amount(sett.balance(&self.chain, strategy, pool)?),
            )
            .metric(
                "strategy.balanceOf",
                MetricValue::Amount(strategy.balance_of(&self.chain, pool)?),
            )
            .metric(
                "strategy.balanceOfWant",
                MetricValue::Amount(strategy.balance_of_want(&self.chain)),
            )
            .metric(
                "strategy.balanceOfPool",
                MetricValue::Amount(strategy.balance_of_pool(&self.chain, pool)?),
            )
            .metric(
                "strategy.isTendable",
                MetricValue::Flag(strategy.is_tendable(&self.chain)),
            )
            .metric(
                "strategy.performanceFeeStrategist",
                MetricValue::Amount(U256::from(strategy.fees.performance_fee_strategist)),
            )
            .metric(
                "strategy.performanceFeeGovernance",
                MetricValue::Amount(U256::from(strategy.fees.performance_fee_governance)),
            )
            .metric(
                "strategy.withdrawalFee",
                MetricValue::Amount(U256::from(strategy.fees.withdrawal_fee)),
            );

        Ok(builder.build())
    }

    /// Deposit `amount` of want into the sett for `user`.
    /// Requires a prior approval, see [`StrategyTestManager::approve_want`].
    pub fn deposit(&mut self, user: Address, amount: U256) -> Result<OpReport> {
        let before = self.snapshot()?;
        let want_before = self.chain.balance_of(self.stack.want, user);
        let sett_want_before = self
            .chain
            .balance_of(self.stack.want, self.stack.sett.address);
        let shares_before = self.chain.balance_of(self.stack.sett.share_token, user);

        let stack = &self.stack;
        let shares = stack
            .sett
            .deposit(&mut self.chain, &stack.strategy, &stack.pool, user, amount)?;

        let after = self.snapshot()?;

        ensure(
            self.chain.balance_of(self.stack.want, user) == want_before - amount,
            "depositor want balance decreases by the deposited amount",
        )?;
        ensure(
            self.chain
                .balance_of(self.stack.want, self.stack.sett.address)
                == sett_want_before + amount,
            "sett want balance increases by the deposited amount",
        )?;
        ensure(
            self.chain.balance_of(self.stack.sett.share_token, user) > shares_before,
            "depositor share balance strictly increases",
        )?;

        let params = OpParams {
            sender: user,
            amount,
        };
        self.resolver
            .hook_after_confirm_deposit(&before, &after, &params)?;

        Ok(self.report(Operation::Deposit, shares, before, after))
    }

    /// Burn `shares` of the sett for `user` and pay out want.
    pub fn withdraw(&mut self, user: Address, shares: U256) -> Result<OpReport> {
        let before = self.snapshot()?;
        let want_before = self.chain.balance_of(self.stack.want, user);
        let shares_before = self.chain.balance_of(self.stack.sett.share_token, user);

        let payout = {
            let stack = &mut self.stack;
            stack
                .sett
                .withdraw(&mut self.chain, &stack.strategy, &mut stack.pool, user, shares)?
        };

        let after = self.snapshot()?;

        ensure(
            self.chain.balance_of(self.stack.want, user) > want_before,
            "withdrawer want balance strictly increases",
        )?;
        ensure(
            self.chain.balance_of(self.stack.sett.share_token, user)
                == shares_before - shares,
            "withdrawer share balance decreases by the burned shares",
        )?;

        let params = OpParams {
            sender: user,
            amount: shares,
        };
        self.resolver
            .hook_after_confirm_withdraw(&before, &after, &params)?;

        Ok(self.report(Operation::Withdraw, payout, before, after))
    }

    /// Push available vault want into the strategy and invest it.
    pub fn earn(&mut self) -> Result<OpReport> {
        let before = self.snapshot()?;
        let moved = {
            let stack = &mut self.stack;
            stack
                .sett
                .earn(&mut self.chain, &stack.strategy, &mut stack.pool)?
        };
        let after = self.snapshot()?;

        ensure(
            after.balances("want", "sett")? < before.balances("want", "sett")?,
            "sett want balance strictly decreases on earn",
        )?;
        ensure(
            after.amount("strategy.balanceOf")? > before.amount("strategy.balanceOf")?,
            "strategy balance strictly increases on earn",
        )?;

        let params = OpParams {
            sender: self.stack.deployer,
            amount: moved,
        };
        self.resolver.hook_after_earn(&before, &after, &params)?;

        Ok(self.report(Operation::Earn, moved, before, after))
    }

    /// Harvest the strategy and confirm yield realization and fee routing.
    pub fn harvest(&mut self) -> Result<OpReport> {
        let before = self.snapshot()?;
        let harvested = {
            let stack = &mut self.stack;
            stack.strategy.harvest(&mut self.chain, &mut stack.pool)?
        };
        let after = self.snapshot()?;

        let tx = TxRecord {
            operation: Operation::Harvest,
            timestamp: self.chain.timestamp,
            amount: harvested.harvested,
        };
        self.resolver.confirm_harvest(&before, &after, &tx)?;

        Ok(OpReport { tx, before, after })
    }

    /// Tend the strategy and confirm the idle want was invested.
    pub fn tend(&mut self) -> Result<OpReport> {
        let before = self.snapshot()?;
        let tended = {
            let stack = &mut self.stack;
            stack.strategy.tend(&mut self.chain, &mut stack.pool)?
        };
        let after = self.snapshot()?;

        let tx = TxRecord {
            operation: Operation::Tend,
            timestamp: self.chain.timestamp,
            amount: tended.tended,
        };
        self.resolver.confirm_tend(&before, &after, &tx)?;

        Ok(OpReport { tx, before, after })
    }

    fn report(
        &self,
        operation: Operation,
        amount: U256,
        before: Snapshot,
        after: Snapshot,
    ) -> OpReport {
        OpReport {
            tx: TxRecord {
                operation,
                timestamp: self.chain.timestamp,
                amount,
            },
            before,
            after,
        }
    }
}
