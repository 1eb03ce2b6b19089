//! dyxless-bot binary: `run` starts the bot, `probe` checks the Dyxless API.

use anyhow::Result;
use clap::Parser;
use dyxless_bot::{load_config, run_bot, run_probe, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Probe { query } => run_probe(&query).await,
    }
}
