//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Sett harness CLI - drive a simulated strategy stack
#[derive(Parser, Debug)]
#[command(name = "sett-harness")]
#[command(about = "Behavioral test harness for sett lending strategies", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Deploy a stack, deposit, earn and let interest accrue
    Demo(DemoArgs),
    /// Run the full operation flow with invariant checks
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Simulated seconds to sleep after earn
    #[arg(long, default_value = "50")]
    pub sleep: u64,

    /// Path to a JSON deploy configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Simulated seconds to sleep between operations
    #[arg(long, default_value = "3600")]
    pub sleep: u64,

    /// Path to a JSON deploy configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}
