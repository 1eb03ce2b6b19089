//! `/start`, `/cancel` and the informational menu buttons.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, OutgoingMessage, Result};
use tracing::{info, instrument};

use super::reply;
use crate::batch::JobContext;
use crate::keyboards;
use crate::session::{SessionState, SessionStore};
use crate::texts;

pub struct MenuHandler {
    ctx: Arc<JobContext>,
    sessions: Arc<SessionStore>,
}

impl MenuHandler {
    pub fn new(ctx: Arc<JobContext>, sessions: Arc<SessionStore>) -> Self {
        Self { ctx, sessions }
    }

    async fn start(&self, message: &Message) -> Result<HandlerResponse> {
        self.sessions.reset(message.user.id).await;
        let welcome = OutgoingMessage::html(texts::WELCOME).with_keyboard(keyboards::start_menu());
        reply(self.ctx.bot.as_ref(), message, welcome).await
    }

    async fn cancel(&self, message: &Message) -> Result<HandlerResponse> {
        let previous = self.sessions.reset(message.user.id).await;
        if previous == SessionState::Idle {
            return reply(
                self.ctx.bot.as_ref(),
                message,
                OutgoingMessage::plain(texts::NOTHING_TO_CANCEL),
            )
            .await;
        }
        info!(user_id = message.user.id, previous = ?previous, "Conversation cancelled");
        let cancelled = OutgoingMessage::plain(texts::CANCELLED).with_keyboard(keyboards::back_to_menu("◀️ Меню"));
        reply(self.ctx.bot.as_ref(), message, cancelled).await
    }

    async fn on_callback(&self, message: &Message, data: &str) -> Result<HandlerResponse> {
        let outgoing = match data {
            keyboards::BACK_TO_MENU => {
                self.sessions.reset(message.user.id).await;
                OutgoingMessage::plain(texts::MAIN_MENU).with_keyboard(keyboards::main_menu())
            }
            keyboards::HELP => OutgoingMessage::html(texts::HELP),
            keyboards::CHECK_BALANCE => OutgoingMessage::plain(texts::CHECK_BALANCE),
            keyboards::CHECK_LIMIT => OutgoingMessage::html(texts::limit_status(&self.ctx.limiter.status())),
            _ => return Ok(HandlerResponse::Ignore),
        };
        reply(self.ctx.bot.as_ref(), message, outgoing).await
    }
}

#[async_trait]
impl Handler for MenuHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if let Some(data) = message.callback_data() {
            return self.on_callback(message, data).await;
        }
        match message.command() {
            Some("start") => self.start(message).await,
            Some("cancel") => self.cancel(message).await,
            _ => Ok(HandlerResponse::Ignore),
        }
    }
}
