//! Sett strategy simulation SDK
//!
//! This crate simulates the chain a strategy test harness drives: an
//! in-memory ERC20 ledger set with block time, an Aave-style lending pool
//! with interest and reward accrual, a sett vault with share accounting, and
//! the lending strategy itself.
//!
//! # Overview
//!
//! The simulation allows you to:
//! - Deploy tokens, a lending pool, a sett and a strategy on a local chain
//! - Run deposit, earn, tend, harvest and withdraw transactions
//! - Advance simulated time and observe interest and reward accrual
//!
//! # Example
//!
//! ```rust,ignore
//! use sett_harness_sim::{Chain, LendingPool, Sett, Strategy, StrategyFees, WAD};
//! use alloy_primitives::U256;
//!
//! let mut chain = Chain::new();
//! let want = chain.deploy_token("WANT");
//! let mut pool = LendingPool::deploy(&mut chain, want, rate, reward_rate);
//! let sett = Sett::deploy(&mut chain, want, 9_500);
//!
//! sett.deposit(&mut chain, &strategy, &pool, user, U256::from(100) * WAD)?;
//! sett.earn(&mut chain, &strategy, &mut pool)?;
//! chain.sleep(50);
//! ```

pub mod chain;
pub mod error;
pub mod math;
pub mod pool;
pub mod sett;
pub mod strategy;

// Re-export commonly used types
pub use chain::Chain;
pub use error::{Result, SimError};
pub use math::{
    bps_mul, min, mul_div, mul_div_down, mul_div_up, w_div_down, w_mul_down, zero_floor_sub,
    RoundingDirection, MAX_BPS, SECONDS_PER_YEAR, WAD,
};
pub use pool::LendingPool;
pub use sett::Sett;
pub use strategy::{Harvested, Strategy, StrategyFees, Tended};
