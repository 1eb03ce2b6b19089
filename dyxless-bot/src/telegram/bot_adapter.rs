//! Wraps teloxide::Bot and implements [`dbot_core::Bot`]. Production code talks to Telegram through
//! it; tests substitute a recording Bot.

use std::path::Path;

use async_trait::async_trait;
use dbot_core::{parse_message_id, Bot as CoreBot, Chat, DbotError, InlineKeyboard, OutgoingMessage, Result, TextFormat};
use teloxide::net::Download;
use teloxide::payloads::{EditMessageTextSetters, SendDocumentSetters, SendMessageSetters};
use teloxide::requests::Requester;
use teloxide::types::{
    CallbackQueryId, ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, ParseMode,
};

pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }

    pub fn inner(&self) -> &teloxide::Bot {
        &self.bot
    }
}

fn markup(keyboard: &InlineKeyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|b| InlineKeyboardButton::callback(b.text.clone(), b.callback_data.clone()))
            .collect::<Vec<_>>()
    }))
}

fn bot_err(e: impl std::fmt::Display) -> DbotError {
    DbotError::Bot(e.to_string())
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send(&self, chat: &Chat, message: OutgoingMessage) -> Result<String> {
        let mut request = self.bot.send_message(ChatId(chat.id), message.text);
        if message.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = &message.keyboard {
            request = request.reply_markup(markup(keyboard));
        }
        let sent = request.await.map_err(bot_err)?;
        Ok(sent.id.to_string())
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, message: OutgoingMessage) -> Result<()> {
        let id = parse_message_id(message_id)?;
        let mut request = self
            .bot
            .edit_message_text(ChatId(chat.id), MessageId(id), message.text);
        if message.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = &message.keyboard {
            request = request.reply_markup(markup(keyboard));
        }
        request.await.map_err(bot_err)?;
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        let id = parse_message_id(message_id)?;
        self.bot
            .delete_message(ChatId(chat.id), MessageId(id))
            .await
            .map_err(bot_err)?;
        Ok(())
    }

    async fn send_document(&self, chat: &Chat, path: &Path, caption: OutgoingMessage) -> Result<()> {
        let mut request = self
            .bot
            .send_document(ChatId(chat.id), InputFile::file(path.to_path_buf()))
            .caption(caption.text);
        if caption.format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        request.await.map_err(bot_err)?;
        Ok(())
    }

    async fn download_file(&self, file_id: &str, destination: &Path) -> Result<()> {
        let file = self.bot.get_file(FileId(file_id.to_string())).await.map_err(bot_err)?;
        let mut dst = tokio::fs::File::create(destination).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(bot_err)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.bot
            .answer_callback_query(CallbackQueryId(callback_id.to_string()))
            .await
            .map_err(bot_err)?;
        Ok(())
    }
}
