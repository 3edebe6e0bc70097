//! Aave-style lending pool simulation.
//!
//! Deposited want is held by the aToken contract account and accrues
//! interest through a linear liquidity index. aToken balances are stored as
//! index-scaled amounts in the aToken ledger, so a holder's underlying
//! position grows as the index grows. Rewards accrue per second per WAD of
//! scaled balance and are claimed in a separate reward token.
//!
//! Interest backing is minted to the aToken account on accrual so that
//! withdrawals with interest settle against real want balances.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};

use crate::chain::Chain;
use crate::error::{Result, SimError};
use crate::math::{mul_div, w_mul_down, RoundingDirection, WAD};

/// Simulated lending pool state.
#[derive(Debug, Clone)]
pub struct LendingPool {
    /// Pool contract address
    pub address: Address,
    /// Reserve (want) token
    pub want: Address,
    /// Interest-bearing token; also the account holding the reserve backing
    pub a_token: Address,
    /// Reward token minted on claims
    pub reward_token: Address,
    /// Linear interest rate per second, WAD-scaled
    pub rate_per_second: U256,
    /// Reward index growth per second (reward wei per WAD of scaled balance)
    pub reward_per_second: U256,
    liquidity_index: U256,
    reward_index: U256,
    last_update: u64,
    accrued_rewards: BTreeMap<Address, U256>,
    user_reward_index: BTreeMap<Address, U256>,
}

impl LendingPool {
    /// Deploy a pool for `want`, creating its aToken and reward token ledgers.
    pub fn deploy(
        chain: &mut Chain,
        want: Address,
        rate_per_second: U256,
        reward_per_second: U256,
    ) -> Self {
        let address = chain.create_account();
        let a_token = chain.deploy_token("aWANT");
        let reward_token = chain.deploy_token("REWARD");
        Self {
            address,
            want,
            a_token,
            reward_token,
            rate_per_second,
            reward_per_second,
            liquidity_index: WAD,
            reward_index: U256::ZERO,
            last_update: chain.timestamp,
            accrued_rewards: BTreeMap::new(),
            user_reward_index: BTreeMap::new(),
        }
    }

    fn projected_index(&self, timestamp: u64) -> Result<U256> {
        if timestamp < self.last_update {
            return Err(SimError::InvalidTimeTravel {
                timestamp,
                last_update: self.last_update,
            });
        }
        let elapsed = U256::from(timestamp - self.last_update);
        let growth = w_mul_down(self.liquidity_index, self.rate_per_second * elapsed);
        Ok(self.liquidity_index + growth)
    }

    fn projected_reward_index(&self, timestamp: u64) -> Result<U256> {
        if timestamp < self.last_update {
            return Err(SimError::InvalidTimeTravel {
                timestamp,
                last_update: self.last_update,
            });
        }
        let elapsed = U256::from(timestamp - self.last_update);
        Ok(self.reward_index + self.reward_per_second * elapsed)
    }

    /// Roll the liquidity and reward indexes forward to the chain timestamp,
    /// minting want backing for the interest accrued since the last update.
    pub fn accrue(&mut self, chain: &mut Chain) -> Result<()> {
        let new_index = self.projected_index(chain.timestamp)?;
        if new_index > self.liquidity_index {
            let total_scaled = chain.total_supply(self.a_token);
            let backing = w_mul_down(total_scaled, new_index - self.liquidity_index);
            if !backing.is_zero() {
                chain.mint(self.want, self.a_token, backing)?;
            }
            self.liquidity_index = new_index;
        }
        self.reward_index = self.projected_reward_index(chain.timestamp)?;
        self.last_update = chain.timestamp;
        Ok(())
    }

    fn settle_rewards(&mut self, chain: &Chain, user: Address) {
        let scaled = chain.balance_of(self.a_token, user);
        let user_index = self
            .user_reward_index
            .get(&user)
            .copied()
            .unwrap_or(U256::ZERO);
        if self.reward_index > user_index {
            let earned = w_mul_down(scaled, self.reward_index - user_index);
            *self.accrued_rewards.entry(user).or_default() += earned;
        }
        self.user_reward_index.insert(user, self.reward_index);
    }

    /// Deposit `amount` of want from `from`, minting scaled aToken balance.
    pub fn deposit(&mut self, chain: &mut Chain, from: Address, amount: U256) -> Result<()> {
        self.accrue(chain)?;
        self.settle_rewards(chain, from);
        chain.transfer(self.want, from, self.a_token, amount)?;
        let scaled = mul_div(amount, WAD, self.liquidity_index, RoundingDirection::Down);
        chain.mint(self.a_token, from, scaled)
    }

    /// Withdraw `amount` of want for `from`, sending it to `to`.
    pub fn withdraw(
        &mut self,
        chain: &mut Chain,
        from: Address,
        amount: U256,
        to: Address,
    ) -> Result<()> {
        self.accrue(chain)?;
        self.settle_rewards(chain, from);
        let scaled = mul_div(amount, WAD, self.liquidity_index, RoundingDirection::Up);
        let have = chain.balance_of(self.a_token, from);
        if have < scaled {
            return Err(SimError::InsufficientPoolBalance {
                holder: from,
                have: w_mul_down(have, self.liquidity_index),
                need: amount,
            });
        }
        chain.burn(self.a_token, from, scaled)?;
        chain.transfer(self.want, self.a_token, to, amount)
    }

    /// Underlying want position of `user`, projected to the chain timestamp.
    pub fn balance_of(&self, chain: &Chain, user: Address) -> Result<U256> {
        let index = self.projected_index(chain.timestamp)?;
        let scaled = chain.balance_of(self.a_token, user);
        Ok(w_mul_down(scaled, index))
    }

    /// Unclaimed reward balance of `user`, projected to the chain timestamp.
    pub fn rewards_balance(&self, chain: &Chain, user: Address) -> Result<U256> {
        let reward_index = self.projected_reward_index(chain.timestamp)?;
        let user_index = self
            .user_reward_index
            .get(&user)
            .copied()
            .unwrap_or(U256::ZERO);
        let scaled = chain.balance_of(self.a_token, user);
        let pending = w_mul_down(scaled, reward_index - user_index);
        let accrued = self
            .accrued_rewards
            .get(&user)
            .copied()
            .unwrap_or(U256::ZERO);
        Ok(accrued + pending)
    }

    /// Claim all accrued rewards for `user`, minting the reward token to `to`.
    pub fn claim_rewards(&mut self, chain: &mut Chain, user: Address, to: Address) -> Result<U256> {
        self.accrue(chain)?;
        self.settle_rewards(chain, user);
        let amount = self
            .accrued_rewards
            .insert(user, U256::ZERO)
            .unwrap_or(U256::ZERO);
        if !amount.is_zero() {
            chain.mint(self.reward_token, to, amount)?;
        }
        Ok(amount)
    }

    /// Current liquidity index (not projected).
    pub fn liquidity_index(&self) -> U256 {
        self.liquidity_index
    }
}
