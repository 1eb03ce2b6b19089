//! Conversion of teloxide updates into core messages.

use dbot_core::{Chat, Document, Message, MessageKind, ToCoreMessage, ToCoreUser, User};

pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            last_name: self.0.last_name.clone(),
        }
    }
}

/// Text and document messages. A document's caption becomes the content.
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        let msg = self.0;
        let kind = match msg.document() {
            Some(doc) => MessageKind::Document(Document {
                file_id: doc.file.id.0.clone(),
                file_name: doc.file_name.clone(),
                size: u64::from(doc.file.size),
            }),
            None => MessageKind::Text,
        };
        let content = msg.text().or_else(|| msg.caption()).unwrap_or("").to_string();

        Message {
            id: msg.id.to_string(),
            user: msg
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: msg.chat.id.0,
                    username: None,
                    first_name: None,
                    last_name: None,
                }),
            chat: Chat {
                id: msg.chat.id.0,
                chat_type: if msg.chat.is_private() { "private" } else { "group" }.to_string(),
            },
            content,
            kind,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Inline button presses. Replies go to the presser's private chat.
pub struct TelegramCallbackWrapper<'a>(pub &'a teloxide::types::CallbackQuery);

impl<'a> ToCoreMessage for TelegramCallbackWrapper<'a> {
    fn to_core(&self) -> Message {
        let query = self.0;
        let user = TelegramUserWrapper(&query.from).to_core();
        Message {
            id: query.id.0.clone(),
            chat: Chat::private(user.id),
            user,
            content: query.data.clone().unwrap_or_default(),
            kind: MessageKind::Callback {
                callback_id: query.id.0.clone(),
            },
            created_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: u64, username: Option<&str>) -> teloxide::types::User {
        teloxide::types::User {
            id: teloxide::types::UserId(id),
            is_bot: false,
            first_name: "Test".to_string(),
            last_name: None,
            username: username.map(str::to_string),
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        }
    }

    #[test]
    fn test_telegram_user_wrapper_to_core() {
        let u = user(123, Some("inn_checker"));
        let core_user = TelegramUserWrapper(&u).to_core();
        assert_eq!(core_user.id, 123);
        assert_eq!(core_user.username.as_deref(), Some("inn_checker"));
        assert_eq!(core_user.first_name.as_deref(), Some("Test"));
        assert_eq!(core_user.display_name(), "inn_checker");
    }

    #[test]
    fn test_telegram_user_wrapper_minimal() {
        let u = user(456, None);
        let core_user = TelegramUserWrapper(&u).to_core();
        assert_eq!(core_user.id, 456);
        assert_eq!(core_user.display_name(), "Test");
    }
}
