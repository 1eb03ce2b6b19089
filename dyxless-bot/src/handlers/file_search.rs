//! File search: instructions, document upload, and launching the background job.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use dbot_core::{Document, Handler, HandlerResponse, Message, OutgoingMessage, Result};
use tracing::{info, instrument, warn};

use super::reply;
use crate::batch::{BatchJob, JobContext, JobSpec};
use crate::keyboards;
use crate::session::{SessionState, SessionStore};
use crate::table::FileFormat;
use crate::texts;

pub struct FileSearchHandler {
    ctx: Arc<JobContext>,
    sessions: Arc<SessionStore>,
}

impl FileSearchHandler {
    pub fn new(ctx: Arc<JobContext>, sessions: Arc<SessionStore>) -> Self {
        Self { ctx, sessions }
    }

    async fn on_document(&self, message: &Message, doc: &Document) -> Result<HandlerResponse> {
        let user_id = message.user.id;
        let bot = self.ctx.bot.as_ref();

        if self.ctx.active_tasks.is_active(user_id).await {
            return reply(bot, message, OutgoingMessage::plain(texts::TASK_ALREADY_ACTIVE)).await;
        }

        // Only the final path component of the client-supplied name is used.
        let file_name = doc
            .file_name
            .as_deref()
            .and_then(|n| Path::new(n).file_name())
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        if FileFormat::from_file_name(&file_name).is_none() {
            info!(user_id, file_name = %file_name, "Rejected unsupported file");
            return reply(bot, message, OutgoingMessage::plain(texts::UNSUPPORTED_FILE)).await;
        }

        let input_path = self.ctx.temp_dir.join(format!("{}_{}", user_id, file_name));
        bot.download_file(&doc.file_id, &input_path).await?;
        bot.send_message(&message.chat, texts::FILE_RECEIVED).await?;

        let id = self.ctx.checkpoints.create_id(user_id, &file_name);
        if !self.ctx.active_tasks.try_register(user_id, &id).await {
            warn!(user_id, "Another job was registered while downloading");
            return reply(bot, message, OutgoingMessage::plain(texts::TASK_ALREADY_ACTIVE)).await;
        }

        info!(user_id, checkpoint_id = %id, file_name = %file_name, "Starting file job");
        BatchJob::new(
            self.ctx.clone(),
            JobSpec {
                id,
                user_id,
                chat_id: message.chat.id,
                file_name,
                input_path,
            },
        )
        .spawn();

        self.sessions.reset(user_id).await;
        let started = OutgoingMessage::plain(texts::JOB_STARTED).with_keyboard(keyboards::back_to_menu("◀️ Главное меню"));
        reply(bot, message, started).await
    }
}

#[async_trait]
impl Handler for FileSearchHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        if message.callback_data() == Some(keyboards::SEARCH_FILE_INN) {
            self.sessions.set(message.user.id, SessionState::WaitingForFile).await;
            return reply(
                self.ctx.bot.as_ref(),
                message,
                OutgoingMessage::html(texts::FILE_INSTRUCTIONS),
            )
            .await;
        }

        if self.sessions.get(message.user.id).await != SessionState::WaitingForFile {
            return Ok(HandlerResponse::Ignore);
        }
        match message.document() {
            Some(doc) => self.on_document(message, doc).await,
            None if message.callback_data().is_none() && message.command().is_none() => {
                reply(
                    self.ctx.bot.as_ref(),
                    message,
                    OutgoingMessage::plain(texts::SEND_FILE_PROMPT),
                )
                .await
            }
            None => Ok(HandlerResponse::Ignore),
        }
    }
}
