//! Bot abstraction for talking back to the user.
//!
//! [`Bot`] is transport-agnostic; the application implements it over teloxide and tests
//! substitute a recording mock.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{DbotError, Result};
use crate::types::{Chat, Message, OutgoingMessage};

/// Sending, editing and deleting messages, sending and downloading files, answering callbacks.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a message and returns its transport id (used later by [`Bot::edit_message`] / [`Bot::delete_message`]).
    async fn send(&self, chat: &Chat, message: OutgoingMessage) -> Result<String>;

    /// Replaces the text of an already-sent message.
    async fn edit_message(&self, chat: &Chat, message_id: &str, message: OutgoingMessage) -> Result<()>;

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()>;

    /// Uploads a local file as a document with the given caption.
    async fn send_document(&self, chat: &Chat, path: &Path, caption: OutgoingMessage) -> Result<()>;

    /// Downloads a file previously received from the user (by transport file id) to `destination`.
    async fn download_file(&self, file_id: &str, destination: &Path) -> Result<()>;

    /// Acknowledges a pressed inline button so the client stops its spinner.
    async fn answer_callback(&self, callback_id: &str) -> Result<()>;

    /// Sends plain text to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.send(chat, OutgoingMessage::plain(text)).await.map(|_| ())
    }

    /// Sends plain text into the chat the message came from.
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }
}

/// Parses a message id string into an i32 (Telegram message ids are 32-bit).
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| DbotError::Bot(format!("Invalid message_id: {}", s)))
}
