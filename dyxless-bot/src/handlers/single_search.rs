//! Single search: query type choice, then one lookup for the next text message.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, OutgoingMessage, Result};
use dyxless_client::QueryType;
use teloxide::utils::html;
use tracing::{info, instrument, warn};

use super::reply;
use crate::batch::JobContext;
use crate::keyboards;
use crate::lookup::{format_single_result, split_message, MESSAGE_LIMIT};
use crate::session::{SessionState, SessionStore};
use crate::texts;

pub struct SingleSearchHandler {
    ctx: Arc<JobContext>,
    sessions: Arc<SessionStore>,
}

impl SingleSearchHandler {
    pub fn new(ctx: Arc<JobContext>, sessions: Arc<SessionStore>) -> Self {
        Self { ctx, sessions }
    }

    async fn search(&self, message: &Message, query_type: QueryType) -> Result<HandlerResponse> {
        let bot = self.ctx.bot.as_ref();
        let query = message.content.trim();
        if query.is_empty() {
            return reply(bot, message, OutgoingMessage::plain(texts::EMPTY_QUERY)).await;
        }

        let wait_id = bot.send(&message.chat, OutgoingMessage::plain(texts::SEARCHING)).await?;
        self.ctx.limiter.wait_if_needed(None).await;

        info!(user_id = message.user.id, query_type = %query_type, "Single lookup");
        let text = match self.ctx.api.lookup(query, query_type).await {
            Ok(resp) => format_single_result(&resp),
            Err(e) => {
                warn!(user_id = message.user.id, error = %e, "Single lookup failed");
                format!("❌ {}", html::escape(&texts::lookup_error(&e)))
            }
        };

        if let Err(e) = bot.delete_message(&message.chat, &wait_id).await {
            warn!(user_id = message.user.id, error = %e, "Failed to delete wait message");
        }
        self.sessions.reset(message.user.id).await;
        for chunk in split_message(&text, MESSAGE_LIMIT) {
            bot.send(&message.chat, OutgoingMessage::html(chunk)).await?;
        }

        let next = OutgoingMessage::plain(texts::WHAT_NEXT).with_keyboard(keyboards::after_search());
        bot.send(&message.chat, next).await?;
        Ok(HandlerResponse::Reply(text))
    }
}

#[async_trait]
impl Handler for SingleSearchHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let bot = self.ctx.bot.as_ref();

        if let Some(data) = message.callback_data() {
            if data == keyboards::SINGLE_SEARCH {
                let choose = OutgoingMessage::plain(texts::CHOOSE_QUERY_TYPE).with_keyboard(keyboards::query_types());
                return reply(bot, message, choose).await;
            }
            let Some(query_type) = data
                .strip_prefix(keyboards::TYPE_PREFIX)
                .and_then(QueryType::parse)
            else {
                return Ok(HandlerResponse::Ignore);
            };
            self.sessions
                .set(message.user.id, SessionState::WaitingForSingleQuery { query_type })
                .await;
            return reply(bot, message, OutgoingMessage::html(texts::query_prompt(query_type))).await;
        }

        match self.sessions.get(message.user.id).await {
            SessionState::WaitingForSingleQuery { query_type }
                if message.document().is_none() && message.command().is_none() =>
            {
                self.search(message, query_type).await
            }
            _ => Ok(HandlerResponse::Ignore),
        }
    }
}
