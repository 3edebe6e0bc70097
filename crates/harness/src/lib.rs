//! Behavioral test harness for sett lending strategies.
//!
//! The harness drives a simulated chain through deposit, earn, tend, harvest
//! and withdraw operations and asserts invariants about balances before and
//! after each one. The [`StrategyTestManager`] owns the lifecycle; a
//! [`StrategyResolver`] contributes the strategy-specific invariants and the
//! auxiliary accounts to track in snapshots.
//!
//! # Example
//!
//! ```rust,ignore
//! use sett_harness::{deploy, AaveStrategyResolver, DeployConfig, StrategyTestManager};
//!
//! let (chain, stack) = deploy(&DeployConfig::default())?;
//! let mut manager = StrategyTestManager::new(chain, stack, AaveStrategyResolver);
//!
//! let deployer = manager.stack().deployer;
//! let balance = manager.chain().balance_of(manager.stack().want, deployer);
//! manager.approve_want(deployer, balance)?;
//! manager.deposit(deployer, balance)?;
//! manager.earn()?;
//! manager.chain_mut().sleep(50);
//! manager.harvest()?;
//! ```

pub mod aave;
pub mod config;
pub mod deploy;
pub mod error;
pub mod manager;
pub mod resolver;
pub mod snapshot;

pub use aave::AaveStrategyResolver;
pub use config::DeployConfig;
pub use deploy::{deploy, DeployedStack};
pub use error::{ensure, HarnessError, Result};
pub use manager::{OpReport, StrategyTestManager};
pub use resolver::{OpParams, Operation, StrategyResolver, TxRecord};
pub use snapshot::{Change, MetricValue, Snapshot, SnapshotBuilder};
