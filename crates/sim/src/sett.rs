//! Sett vault simulation: user deposits and share accounting.

use alloy_primitives::{Address, U256};

use crate::chain::Chain;
use crate::error::Result;
use crate::math::{bps_mul, min, mul_div, RoundingDirection, WAD};
use crate::pool::LendingPool;
use crate::strategy::Strategy;

/// Simulated sett (vault) state. Shares are an ERC20 ledger on the chain.
#[derive(Debug, Clone)]
pub struct Sett {
    /// Vault contract address; also the account holding idle want
    pub address: Address,
    /// Deposit token
    pub want: Address,
    /// Share token ledger
    pub share_token: Address,
    /// Fraction of idle want pushed to the strategy on earn, in basis points
    pub available_ratio_bps: u64,
}

impl Sett {
    /// Deploy a sett for `want`.
    pub fn deploy(chain: &mut Chain, want: Address, available_ratio_bps: u64) -> Self {
        Self {
            address: chain.create_account(),
            want,
            share_token: chain.deploy_token("bWANT"),
            available_ratio_bps,
        }
    }

    /// Total want under management: idle in the vault plus the strategy total.
    pub fn balance(&self, chain: &Chain, strategy: &Strategy, pool: &LendingPool) -> Result<U256> {
        Ok(chain.balance_of(self.want, self.address) + strategy.balance_of(chain, pool)?)
    }

    /// Want value of one full share, WAD-scaled. WAD while no shares exist.
    pub fn price_per_full_share(
        &self,
        chain: &Chain,
        strategy: &Strategy,
        pool: &LendingPool,
    ) -> Result<U256> {
        let supply = chain.total_supply(self.share_token);
        if supply.is_zero() {
            return Ok(WAD);
        }
        let balance = self.balance(chain, strategy, pool)?;
        Ok(mul_div(balance, WAD, supply, RoundingDirection::Down))
    }

    /// Deposit `amount` of want from `from` (requires prior approval),
    /// minting shares at the current price. Returns the shares minted.
    pub fn deposit(
        &self,
        chain: &mut Chain,
        strategy: &Strategy,
        pool: &LendingPool,
        from: Address,
        amount: U256,
    ) -> Result<U256> {
        let balance_before = self.balance(chain, strategy, pool)?;
        let supply = chain.total_supply(self.share_token);
        let shares = if supply.is_zero() {
            amount
        } else {
            mul_div(amount, supply, balance_before, RoundingDirection::Down)
        };
        chain.transfer_from(self.want, self.address, from, self.address, amount)?;
        chain.mint(self.share_token, from, shares)?;
        Ok(shares)
    }

    /// Burn `shares` from `from` and pay out the matching want, pulling any
    /// shortfall from the strategy. Returns the want delivered.
    pub fn withdraw(
        &self,
        chain: &mut Chain,
        strategy: &Strategy,
        pool: &mut LendingPool,
        from: Address,
        shares: U256,
    ) -> Result<U256> {
        let balance = self.balance(chain, strategy, pool)?;
        let supply = chain.total_supply(self.share_token);
        let amount = mul_div(shares, balance, supply, RoundingDirection::Down);
        chain.burn(self.share_token, from, shares)?;

        let idle = chain.balance_of(self.want, self.address);
        if idle < amount {
            // Withdrawal fee is charged by the strategy on the freed amount
            strategy.withdraw(chain, pool, amount - idle, self.address)?;
        }

        let payout = min(amount, chain.balance_of(self.want, self.address));
        chain.transfer(self.want, self.address, from, payout)?;
        Ok(payout)
    }

    /// Push the available fraction of idle want to the strategy, which
    /// invests it into the pool. Returns the amount moved.
    pub fn earn(
        &self,
        chain: &mut Chain,
        strategy: &Strategy,
        pool: &mut LendingPool,
    ) -> Result<U256> {
        let idle = chain.balance_of(self.want, self.address);
        let available = bps_mul(idle, self.available_ratio_bps);
        if available.is_zero() {
            return Ok(U256::ZERO);
        }
        chain.transfer(self.want, self.address, strategy.address, available)?;
        strategy.deposit(chain, pool)?;
        Ok(available)
    }
}
