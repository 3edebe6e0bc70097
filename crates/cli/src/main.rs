//! Sett harness CLI - deploy and drive a simulated strategy stack.

mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use commands::{run_check, run_demo};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo(args) => {
            run_demo(&args, cli.format)?;
        }
        Commands::Check(args) => {
            run_check(&args, cli.format)?;
        }
    }

    Ok(())
}
