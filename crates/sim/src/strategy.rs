//! Simulated lending strategy.
//!
//! The strategy invests want into the lending pool, realizes reward yield on
//! harvest, and skims performance fees in want to the strategist and the
//! governance rewards account. Reward-to-want conversion is modeled as a
//! unit-price swap; DEX routing is outside the simulation.

use alloy_primitives::{Address, U256};

use crate::chain::Chain;
use crate::error::{Result, SimError};
use crate::math::{bps_mul, min, zero_floor_sub};
use crate::pool::LendingPool;

/// Fee configuration in basis points.
#[derive(Debug, Clone, Copy)]
pub struct StrategyFees {
    pub performance_fee_governance: u64,
    pub performance_fee_strategist: u64,
    pub withdrawal_fee: u64,
}

/// Outcome of a harvest transaction.
#[derive(Debug, Clone, Copy)]
pub struct Harvested {
    /// Want gained from converted rewards, before fees
    pub harvested: U256,
    /// Want paid to the governance rewards account
    pub governance_fee: U256,
    /// Want paid to the strategist
    pub strategist_fee: U256,
}

/// Outcome of a tend transaction.
#[derive(Debug, Clone, Copy)]
pub struct Tended {
    /// Idle want moved into the pool
    pub tended: U256,
}

/// Simulated strategy state.
#[derive(Debug, Clone)]
pub struct Strategy {
    /// Strategy contract address
    pub address: Address,
    /// Managed token
    pub want: Address,
    /// Fee recipient for the strategist performance fee
    pub strategist: Address,
    /// Fee recipient for governance performance and withdrawal fees
    pub governance_rewards: Address,
    /// Fee rates in basis points
    pub fees: StrategyFees,
}

impl Strategy {
    /// Deploy a strategy managing `want`.
    pub fn deploy(
        chain: &mut Chain,
        want: Address,
        strategist: Address,
        governance_rewards: Address,
        fees: StrategyFees,
    ) -> Self {
        Self {
            address: chain.create_account(),
            want,
            strategist,
            governance_rewards,
            fees,
        }
    }

    /// Idle want sitting in the strategy.
    pub fn balance_of_want(&self, chain: &Chain) -> U256 {
        chain.balance_of(self.want, self.address)
    }

    /// Want invested in the pool, projected to the chain timestamp.
    pub fn balance_of_pool(&self, chain: &Chain, pool: &LendingPool) -> Result<U256> {
        pool.balance_of(chain, self.address)
    }

    /// Total want managed by the strategy (idle plus pooled).
    pub fn balance_of(&self, chain: &Chain, pool: &LendingPool) -> Result<U256> {
        Ok(self.balance_of_want(chain) + self.balance_of_pool(chain, pool)?)
    }

    /// A strategy with idle want can be tended.
    pub fn is_tendable(&self, chain: &Chain) -> bool {
        !self.balance_of_want(chain).is_zero()
    }

    /// Invest all idle want into the pool. Returns the amount deposited.
    pub fn deposit(&self, chain: &mut Chain, pool: &mut LendingPool) -> Result<U256> {
        let idle = self.balance_of_want(chain);
        if !idle.is_zero() {
            pool.deposit(chain, self.address, idle)?;
        }
        Ok(idle)
    }

    /// Move idle want into the pool without realizing yield.
    pub fn tend(&self, chain: &mut Chain, pool: &mut LendingPool) -> Result<Tended> {
        let idle = self.balance_of_want(chain);
        if idle.is_zero() {
            return Err(SimError::NothingToTend {
                strategy: self.address,
            });
        }
        pool.deposit(chain, self.address, idle)?;
        Ok(Tended { tended: idle })
    }

    /// Realize reward yield: claim, convert to want, skim performance fees
    /// and reinvest the remainder.
    pub fn harvest(&self, chain: &mut Chain, pool: &mut LendingPool) -> Result<Harvested> {
        let claimed = pool.claim_rewards(chain, self.address, self.address)?;

        // Unit-price swap of rewards into want
        if !claimed.is_zero() {
            chain.burn(pool.reward_token, self.address, claimed)?;
            chain.mint(self.want, self.address, claimed)?;
        }

        let governance_fee = bps_mul(claimed, self.fees.performance_fee_governance);
        let strategist_fee = bps_mul(claimed, self.fees.performance_fee_strategist);
        if !governance_fee.is_zero() {
            chain.transfer(self.want, self.address, self.governance_rewards, governance_fee)?;
        }
        if !strategist_fee.is_zero() {
            chain.transfer(self.want, self.address, self.strategist, strategist_fee)?;
        }

        self.deposit(chain, pool)?;

        Ok(Harvested {
            harvested: claimed,
            governance_fee,
            strategist_fee,
        })
    }

    /// Free up `amount` of want and send it to `to` (normally the sett),
    /// charging the withdrawal fee to the governance rewards account.
    /// Returns the amount actually delivered to `to`.
    pub fn withdraw(
        &self,
        chain: &mut Chain,
        pool: &mut LendingPool,
        amount: U256,
        to: Address,
    ) -> Result<U256> {
        let idle = self.balance_of_want(chain);
        if idle < amount {
            let shortfall = amount - idle;
            let pooled = self.balance_of_pool(chain, pool)?;
            pool.withdraw(chain, self.address, min(shortfall, pooled), self.address)?;
        }

        let available = min(amount, self.balance_of_want(chain));
        let fee = bps_mul(available, self.fees.withdrawal_fee);
        if !fee.is_zero() {
            chain.transfer(self.want, self.address, self.governance_rewards, fee)?;
        }
        let payout = zero_floor_sub(available, fee);
        chain.transfer(self.want, self.address, to, payout)?;
        Ok(payout)
    }
}
