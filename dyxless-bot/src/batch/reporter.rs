//! The single progress message a file job keeps editing.

use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Bot, Chat, OutgoingMessage};
use tokio::sync::Mutex;
use tracing::warn;

use crate::limiter::{PauseEvent, PauseObserver};
use crate::texts;

pub struct ProgressReporter {
    bot: Arc<dyn Bot>,
    chat: Chat,
    message_id: Mutex<Option<String>>,
}

impl ProgressReporter {
    pub fn new(bot: Arc<dyn Bot>, chat: Chat) -> Self {
        Self {
            bot,
            chat,
            message_id: Mutex::new(None),
        }
    }

    /// Edits the progress message, or posts it the first time. Failures are only logged.
    pub async fn show(&self, text: String) {
        let mut message_id = self.message_id.lock().await;
        let result = match message_id.clone() {
            Some(id) => self.bot.edit_message(&self.chat, &id, OutgoingMessage::html(text)).await,
            None => self
                .bot
                .send(&self.chat, OutgoingMessage::html(text))
                .await
                .map(|id| *message_id = Some(id)),
        };
        if let Err(e) = result {
            warn!(chat_id = self.chat.id, error = %e, "Failed to update progress message");
        }
    }

    pub async fn message_id(&self) -> Option<String> {
        self.message_id.lock().await.clone()
    }

    /// Removes the progress message from the chat, if one was posted.
    pub async fn clear(&self) {
        let Some(id) = self.message_id.lock().await.take() else {
            return;
        };
        if let Err(e) = self.bot.delete_message(&self.chat, &id).await {
            warn!(chat_id = self.chat.id, error = %e, "Failed to delete progress message");
        }
    }
}

#[async_trait]
impl PauseObserver for ProgressReporter {
    async fn on_pause(&self, event: PauseEvent) {
        self.show(texts::pause_event(&event)).await;
    }
}
