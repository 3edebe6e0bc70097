//! End-to-end flows: deploy a stack, run operations through the manager and
//! confirm every invariant holds.

use alloy_primitives::U256;
use sett_harness::{
    deploy, AaveStrategyResolver, DeployConfig, HarnessError, Result, StrategyTestManager,
};
use sett_harness_sim::WAD;

fn deployed_manager(
    config: &DeployConfig,
) -> Result<StrategyTestManager<AaveStrategyResolver>> {
    let (chain, stack) = deploy(config)?;
    Ok(StrategyTestManager::new(chain, stack, AaveStrategyResolver))
}

/// Deposit the deployer's full want balance, with approval.
fn deposit_all(manager: &mut StrategyTestManager<AaveStrategyResolver>) -> Result<U256> {
    let deployer = manager.stack().deployer;
    let balance = manager.chain().balance_of(manager.stack().want, deployer);
    manager.approve_want(deployer, balance)?;
    let report = manager.deposit(deployer, balance)?;
    Ok(report.tx.amount)
}

#[test]
fn test_demo_flow_accrues_pooled_balance() -> Result<()> {
    // Deploy stack, deposit full deployer balance, earn, advance time:
    // no invariant failures and a non-zero pooled balance.
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;
    manager.earn()?;
    manager.chain_mut().sleep(50);

    let stack = manager.stack();
    let pooled = stack
        .strategy
        .balance_of_pool(manager.chain(), &stack.pool)?;
    assert!(pooled > U256::ZERO);
    Ok(())
}

#[test]
fn test_pool_balance_matches_lending_pool_and_rewards_accrue() -> Result<()> {
    // After deposit + earn + time passing, the strategy's recorded pool
    // balance equals the lending pool's view of its position, and the
    // strategy has accrued a strictly positive reward balance.
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;
    manager.earn()?;
    manager.chain_mut().sleep(15);
    manager.chain_mut().mine(500);

    let stack = manager.stack();
    let recorded = stack
        .strategy
        .balance_of_pool(manager.chain(), &stack.pool)?;
    let pool_view = stack
        .pool
        .balance_of(manager.chain(), stack.strategy.address)?;
    assert_eq!(recorded, pool_view);
    assert!(recorded > U256::ZERO);

    let rewards = stack
        .pool
        .rewards_balance(manager.chain(), stack.strategy.address)?;
    assert!(rewards > U256::ZERO);
    Ok(())
}

#[test]
fn test_earn_increases_atoken_want_balance() -> Result<()> {
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;

    let report = manager.earn()?;
    assert!(
        report.after.balances("want", "aToken")? > report.before.balances("want", "aToken")?
    );
    Ok(())
}

#[test]
fn test_withdraw_decreases_atoken_want_balance() -> Result<()> {
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;
    manager.earn()?;

    let deployer = manager.stack().deployer;
    let shares = manager
        .chain()
        .balance_of(manager.stack().sett.share_token, deployer);
    let report = manager.withdraw(deployer, shares)?;

    assert!(
        report.after.balances("want", "aToken")? < report.before.balances("want", "aToken")?
    );
    // Withdrawal fee routed to the governance rewards account
    assert!(
        report.after.balances("want", "governanceRewards")?
            > report.before.balances("want", "governanceRewards")?
    );
    Ok(())
}

#[test]
fn test_harvest_grows_value_and_pays_fees() -> Result<()> {
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;
    manager.earn()?;
    manager.chain_mut().sleep(3_600);

    let report = manager.harvest()?;

    assert!(report.tx.amount > U256::ZERO);
    assert!(
        report.after.amount("strategy.balanceOf")?
            >= report.before.amount("strategy.balanceOf")?
    );
    assert!(
        report.after.amount("sett.pricePerFullShare")?
            > report.before.amount("sett.pricePerFullShare")?
    );
    assert!(
        report.after.balances("want", "strategist")?
            > report.before.balances("want", "strategist")?
    );
    assert!(
        report.after.balances("want", "governanceRewards")?
            > report.before.balances("want", "governanceRewards")?
    );
    Ok(())
}

#[test]
fn test_harvest_without_fees_leaves_recipients_flat() -> Result<()> {
    let config = DeployConfig {
        performance_fee_governance: 0,
        performance_fee_strategist: 0,
        ..DeployConfig::default()
    };
    let mut manager = deployed_manager(&config)?;
    deposit_all(&mut manager)?;
    manager.earn()?;
    manager.chain_mut().sleep(3_600);

    let report = manager.harvest()?;

    assert!(report.tx.amount > U256::ZERO);
    assert_eq!(
        report.after.balances("want", "strategist")?,
        report.before.balances("want", "strategist")?
    );
    assert_eq!(
        report.after.balances("want", "governanceRewards")?,
        report.before.balances("want", "governanceRewards")?
    );
    Ok(())
}

#[test]
fn test_tend_invests_idle_want() -> Result<()> {
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;
    manager.earn()?;

    // Seed idle want in the strategy, as if funds arrived outside earn
    let (want, strategy) = {
        let stack = manager.stack();
        (stack.want, stack.strategy.address)
    };
    manager
        .chain_mut()
        .mint(want, strategy, U256::from(10) * WAD)?;

    let report = manager.tend()?;

    assert!(report.before.flag("strategy.isTendable")?);
    assert!(report.before.amount("strategy.balanceOfWant")? > U256::ZERO);
    assert!(!report.after.flag("strategy.isTendable")?);
    assert_eq!(report.after.amount("strategy.balanceOfWant")?, U256::ZERO);
    assert!(
        report.after.amount("strategy.balanceOfPool")?
            > report.before.amount("strategy.balanceOfPool")?
    );
    Ok(())
}

#[test]
fn test_tend_without_idle_want_fails() -> Result<()> {
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;
    manager.earn()?;

    // earn invests everything, so there is nothing to tend
    assert!(manager.tend().is_err());
    Ok(())
}

#[test]
fn test_ppfs_never_decreases_across_cycle() -> Result<()> {
    let mut manager = deployed_manager(&DeployConfig::default())?;
    deposit_all(&mut manager)?;

    let mut last = manager.snapshot()?.amount("sett.pricePerFullShare")?;
    manager.earn()?;
    for _ in 0..3 {
        manager.chain_mut().sleep(3_600);
        let report = manager.harvest()?;
        let ppfs = report.after.amount("sett.pricePerFullShare")?;
        assert!(ppfs >= last);
        last = ppfs;
    }
    Ok(())
}

#[test]
fn test_violation_aborts_with_invariant_error() -> Result<()> {
    // Earning an empty vault violates the generic earn checks
    let mut manager = deployed_manager(&DeployConfig::default())?;
    let result = manager.earn();
    assert!(matches!(
        result,
        Err(HarnessError::InvariantViolated { .. })
    ));
    Ok(())
}
