//! Incoming message types for the core model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{chat::Chat, user::User};

/// File attached to an incoming message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Transport file id, passed back to [`crate::Bot::download_file`].
    pub file_id: String,
    pub file_name: Option<String>,
    pub size: u64,
}

/// What the user did: typed text (including commands), uploaded a file, or pressed an inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Text,
    Document(Document),
    /// Inline button press; `content` holds the callback data.
    Callback { callback_id: String },
}

/// A single incoming update with user, chat and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub user: User,
    pub chat: Chat,
    /// Text, document caption, or callback data depending on `kind`.
    pub content: String,
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Command name without the leading `/` and `@botname` suffix, if the text is a command.
    ///
    /// `"/start@my_bot foo"` → `Some("start")`.
    pub fn command(&self) -> Option<&str> {
        if self.kind != MessageKind::Text {
            return None;
        }
        let first = self.content.split_whitespace().next()?;
        let name = first.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        (!name.is_empty()).then_some(name)
    }

    /// Callback data if this is an inline button press.
    pub fn callback_data(&self) -> Option<&str> {
        match self.kind {
            MessageKind::Callback { .. } => Some(self.content.as_str()),
            _ => None,
        }
    }

    /// Callback id if this is an inline button press.
    pub fn callback_id(&self) -> Option<&str> {
        match &self.kind {
            MessageKind::Callback { callback_id } => Some(callback_id.as_str()),
            _ => None,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        match &self.kind {
            MessageKind::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind_label(&self) -> &'static str {
        match self.kind {
            MessageKind::Text if self.command().is_some() => "command",
            MessageKind::Text => "text",
            MessageKind::Document(_) => "document",
            MessageKind::Callback { .. } => "callback",
        }
    }
}
