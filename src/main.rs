use anyhow::Context;
use clap::Parser;
use pmp_accounts::cli::{self, Cli};
use pmp_accounts::infrastructure::logging;
use pmp_accounts::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging)?;

    cli::run(cli.command, &config).await
}
