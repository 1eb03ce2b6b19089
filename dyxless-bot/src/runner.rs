use std::fs;

use anyhow::{Context, Result};
use dbot_core::init_tracing;
use tracing::{info, instrument, warn};

use crate::batch::resume_pending;
use crate::components::{build_bot_components, build_handler_chain};
use crate::config::BotConfig;
use crate::telegram::run_dispatcher;

/// Main entry: validate config, create working dirs, init logging, build components, resume
/// pending jobs, then dispatch updates until shutdown.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    for dir in [&config.base.temp_dir, &config.base.checkpoint_dir] {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    init_tracing(config.log_file())?;

    info!(
        temp_dir = %config.base.temp_dir.display(),
        checkpoint_dir = %config.base.checkpoint_dir.display(),
        rate_limit_max_calls = config.dyxless.rate_limit_max_calls,
        rate_limit_pause_secs = config.dyxless.rate_limit_pause_secs,
        "Initializing bot"
    );

    let components = build_bot_components(&config)?;
    let chain = build_handler_chain(
        &config,
        components.job_context.clone(),
        components.sessions.clone(),
    );

    match resume_pending(components.job_context.clone()).await {
        Ok(0) => {}
        Ok(n) => info!(resumed = n, "Resumed pending file jobs"),
        Err(e) => warn!(error = %e, "Failed to scan pending checkpoints"),
    }

    info!("Bot started successfully");
    run_dispatcher(components.teloxide_bot, chain, components.bot_adapter).await
}
