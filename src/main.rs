mod cli;
mod error;
mod generator;
mod metrics;
mod models;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    info!("Starting Opsim - CI/CD Monitoring Data Simulator");
    cli.execute()?;

    Ok(())
}
