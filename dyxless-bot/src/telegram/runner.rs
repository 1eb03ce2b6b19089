//! Update dispatcher: converts teloxide messages and callback queries to core messages and runs the
//! HandlerChain for each one in a spawned task.

use std::sync::Arc;

use anyhow::Result;
use dbot_core::{Bot as CoreBot, Message as CoreMessage, ToCoreMessage};
use teloxide::payloads::DeleteWebhookSetters;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use super::adapters::{TelegramCallbackWrapper, TelegramMessageWrapper};
use crate::chain::HandlerChain;

/// Runs the chain for one update, then answers it if it was a button press.
pub async fn process_message(chain: &HandlerChain, bot: &dyn CoreBot, message: &CoreMessage) {
    if let Err(e) = chain.handle(message).await {
        error!(error = %e, user_id = message.user.id, "Handler chain failed");
    }
    if let Some(callback_id) = message.callback_id() {
        if let Err(e) = bot.answer_callback(callback_id).await {
            warn!(error = %e, user_id = message.user.id, "Failed to answer callback query");
        }
    }
}

fn spawn_chain(chain: Arc<HandlerChain>, bot: Arc<dyn CoreBot>, message: CoreMessage) {
    tokio::spawn(async move {
        process_message(&chain, bot.as_ref(), &message).await;
    });
}

async fn on_message(msg: Message, chain: Arc<HandlerChain>, core_bot: Arc<dyn CoreBot>) -> ResponseResult<()> {
    spawn_chain(chain, core_bot, TelegramMessageWrapper(&msg).to_core());
    Ok(())
}

async fn on_callback(query: CallbackQuery, chain: Arc<HandlerChain>, core_bot: Arc<dyn CoreBot>) -> ResponseResult<()> {
    spawn_chain(chain, core_bot, TelegramCallbackWrapper(&query).to_core());
    Ok(())
}

/// Drops pending updates, then dispatches messages and callback queries until Ctrl-C.
#[instrument(skip(bot, chain, core_bot))]
pub async fn run_dispatcher(bot: teloxide::Bot, chain: HandlerChain, core_bot: Arc<dyn CoreBot>) -> Result<()> {
    bot.delete_webhook().drop_pending_updates(true).await?;
    if let Ok(me) = bot.get_me().await {
        info!(username = ?me.user.username, "Bot identity resolved");
    }

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    info!("Dispatcher started");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(chain), core_bot])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
