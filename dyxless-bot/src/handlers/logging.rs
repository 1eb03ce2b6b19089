//! Handlers for logging and the optional user allowlist.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Bot, Handler, HandlerError, HandlerResponse, Message, Result};
use tracing::{debug, info, instrument, warn};

use crate::texts;

/// Logs each update in before() and the response in after(); always continues.
pub struct LoggingHandler;

#[async_trait]
impl Handler for LoggingHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        match message.document() {
            Some(doc) => info!(
                user_id = message.user.id,
                username = %message.user.display_name(),
                file_name = %doc.file_name.as_deref().unwrap_or("unknown"),
                file_size = doc.size,
                "Received document"
            ),
            None => info!(
                user_id = message.user.id,
                username = %message.user.display_name(),
                kind = message.kind_label(),
                message_content = %message.content,
                "Received update"
            ),
        }
        Ok(true)
    }

    #[instrument(skip(self, message, response))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        debug!(message_id = %message.id, response = ?response, "Processed update");
        Ok(())
    }
}

/// Rejects users outside the allowlist: tells them so, then fails the chain with Unauthorized.
pub struct AuthHandler {
    allowed_users: Vec<i64>,
    bot: Arc<dyn Bot>,
}

impl AuthHandler {
    pub fn new(allowed_users: Vec<i64>, bot: Arc<dyn Bot>) -> Self {
        Self { allowed_users, bot }
    }
}

#[async_trait]
impl Handler for AuthHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user_id = message.user.id;
        if self.allowed_users.contains(&user_id) {
            return Ok(true);
        }
        warn!(user_id, "Unauthorized access attempt");
        if let Err(e) = self.bot.send_message(&message.chat, texts::ACCESS_DENIED).await {
            warn!(user_id, error = %e, "Failed to send access denied message");
        }
        Err(HandlerError::Unauthorized.into())
    }
}
