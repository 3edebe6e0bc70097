//! Command implementations.

use anyhow::{Context, Result};
use colored::Colorize;
use sett_harness::{
    deploy, AaveStrategyResolver, DeployConfig, OpReport, StrategyTestManager,
};

use crate::cli::{CheckArgs, DemoArgs, OutputFormat};
use crate::output::{format_report, format_wad};

fn load_config(path: Option<&std::path::Path>) -> Result<DeployConfig> {
    match path {
        Some(path) => DeployConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(DeployConfig::default()),
    }
}

fn deployed_manager(config: &DeployConfig) -> Result<StrategyTestManager<AaveStrategyResolver>> {
    let (chain, stack) = deploy(config)?;
    Ok(StrategyTestManager::new(chain, stack, AaveStrategyResolver))
}

fn emit_report(report: &OpReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", format_report(report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}

/// Deploy, deposit the full deployer balance, earn and let interest accrue.
pub fn run_demo(args: &DemoArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut manager = deployed_manager(&config)?;

    let deployer = manager.stack().deployer;
    let to_deposit = manager.chain().balance_of(manager.stack().want, deployer);
    manager.approve_want(deployer, to_deposit)?;

    let deposit = manager.deposit(deployer, to_deposit)?;
    emit_report(&deposit, format)?;

    let earn = manager.earn()?;
    emit_report(&earn, format)?;

    // Let interest and rewards accrue
    manager.chain_mut().sleep(args.sleep);

    let snapshot = manager.snapshot()?;
    if format == OutputFormat::Table {
        println!();
        println!(
            "pricePerFullShare: {}",
            format_wad(snapshot.amount("sett.pricePerFullShare")?)
        );
        println!(
            "strategy.balanceOfPool: {}",
            format_wad(snapshot.amount("strategy.balanceOfPool")?)
        );
        println!("{}", "demo complete".green());
    }
    Ok(())
}

/// Run the full deposit/earn/tend/harvest/withdraw flow, confirming every
/// operation through the resolver.
pub fn run_check(args: &CheckArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mut manager = deployed_manager(&config)?;

    let deployer = manager.stack().deployer;
    let to_deposit = manager.chain().balance_of(manager.stack().want, deployer);
    manager.approve_want(deployer, to_deposit)?;

    let mut run = |name: &str, report: OpReport| -> Result<()> {
        if format == OutputFormat::Table {
            println!("{} {}", "ok".green(), name);
        } else {
            emit_report(&report, format)?;
        }
        Ok(())
    };

    let report = manager.deposit(deployer, to_deposit)?;
    run("deposit", report)?;

    let report = manager.earn()?;
    run("earn", report)?;

    manager.chain_mut().sleep(args.sleep);

    // Seed idle want so the tend path is exercised
    let (want, strategy) = {
        let stack = manager.stack();
        (stack.want, stack.strategy.address)
    };
    let seed = config.initial_want_supply / alloy_primitives::U256::from(100);
    manager.chain_mut().mint(want, strategy, seed)?;
    let report = manager.tend()?;
    run("tend", report)?;

    manager.chain_mut().sleep(args.sleep);
    let report = manager.harvest()?;
    run("harvest", report)?;

    let shares = manager
        .chain()
        .balance_of(manager.stack().sett.share_token, deployer);
    let report = manager.withdraw(deployer, shares)?;
    run("withdraw", report)?;

    if format == OutputFormat::Table {
        println!("{}", "all invariants held".green());
    }
    Ok(())
}
