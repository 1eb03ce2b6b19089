//! Chat identity type for core messages.

use serde::{Deserialize, Serialize};

/// Chat (private, group or channel) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub chat_type: String,
}

impl Chat {
    /// Private chat with a user; Telegram uses the user id as the chat id.
    pub fn private(user_id: i64) -> Self {
        Self {
            id: user_id,
            chat_type: "private".to_string(),
        }
    }
}
