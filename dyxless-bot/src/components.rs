//! Component factory: builds BotComponents and the handler chain from config. Isolates assembly logic from runner.

use std::sync::Arc;

use anyhow::{Context, Result};
use dbot_core::Bot;
use dyxless_client::{DyxlessClient, LookupApi};
use tracing::{error, info, instrument};

use crate::batch::JobContext;
use crate::chain::HandlerChain;
use crate::checkpoint::CheckpointManager;
use crate::config::BotConfig;
use crate::handlers::{AuthHandler, FileSearchHandler, LoggingHandler, MenuHandler, SingleSearchHandler};
use crate::limiter::RateLimiter;
use crate::session::{ActiveTasks, SessionStore};
use crate::telegram::TelegramBotAdapter;

/// Everything run_bot needs: the teloxide bot for dispatching plus the shared services.
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub bot_adapter: Arc<dyn Bot>,
    pub job_context: Arc<JobContext>,
    pub sessions: Arc<SessionStore>,
}

/// teloxide Bot with TELEGRAM_API_URL applied when set.
pub fn build_teloxide_bot(config: &BotConfig) -> teloxide::Bot {
    let bot = teloxide::Bot::new(config.bot_token());
    match config.telegram_api_url() {
        Some(url_str) => match reqwest::Url::parse(url_str) {
            Ok(url) => bot.set_api_url(url),
            Err(e) => {
                error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                bot
            }
        },
        None => bot,
    }
}

/// Shared job services around the given transport and lookup API.
pub fn build_job_context(config: &BotConfig, bot: Arc<dyn Bot>, api: Arc<dyn LookupApi>) -> Result<Arc<JobContext>> {
    let checkpoints = CheckpointManager::new(&config.base.checkpoint_dir).with_context(|| {
        format!(
            "Failed to open checkpoint dir {}",
            config.base.checkpoint_dir.display()
        )
    })?;
    let limiter = RateLimiter::new(config.dyxless.rate_limit_max_calls, config.dyxless.rate_limit_pause());

    Ok(Arc::new(JobContext {
        bot,
        api,
        limiter: Arc::new(limiter),
        checkpoints: Arc::new(checkpoints),
        active_tasks: Arc::new(ActiveTasks::new()),
        batch: config.batch.clone(),
        price_per_request: config.dyxless.price_per_request,
        temp_dir: config.base.temp_dir.clone(),
    }))
}

#[instrument(skip(config))]
pub fn build_bot_components(config: &BotConfig) -> Result<BotComponents> {
    let teloxide_bot = build_teloxide_bot(config);
    let bot_adapter: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));

    let client = DyxlessClient::new(
        config.dyxless.api_token.clone(),
        config.dyxless.api_url.clone(),
        config.dyxless.timeout(),
    )
    .context("Failed to build Dyxless HTTP client")?;
    info!(
        api_url = %client.base_url(),
        api_token = %client.masked_token(),
        "Dyxless client ready"
    );

    let job_context = build_job_context(config, bot_adapter.clone(), Arc::new(client))?;

    Ok(BotComponents {
        teloxide_bot,
        bot_adapter,
        job_context,
        sessions: Arc::new(SessionStore::new()),
    })
}

/// Logging → optional allowlist → menu → file search → single search.
pub fn build_handler_chain(config: &BotConfig, ctx: Arc<JobContext>, sessions: Arc<SessionStore>) -> HandlerChain {
    let mut chain = HandlerChain::new().add_handler(Arc::new(LoggingHandler));
    if config.access.is_restricted() {
        info!(allowed = config.access.allowed_user_ids.len(), "User allowlist enabled");
        chain = chain.add_handler(Arc::new(AuthHandler::new(
            config.access.allowed_user_ids.clone(),
            ctx.bot.clone(),
        )));
    }
    chain
        .add_handler(Arc::new(MenuHandler::new(ctx.clone(), sessions.clone())))
        .add_handler(Arc::new(FileSearchHandler::new(ctx.clone(), sessions.clone())))
        .add_handler(Arc::new(SingleSearchHandler::new(ctx, sessions)))
}
