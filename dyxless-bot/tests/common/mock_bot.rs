//! Mock implementation of [`dbot_core::Bot`] that records every outgoing call.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use dbot_core::{Bot, Chat, DbotError, OutgoingMessage, Result};

/// One recorded call.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Call {
    Send {
        chat_id: i64,
        message_id: String,
        message: OutgoingMessage,
    },
    Edit {
        chat_id: i64,
        message_id: String,
        message: OutgoingMessage,
    },
    Delete {
        chat_id: i64,
        message_id: String,
    },
    Document {
        chat_id: i64,
        file_name: String,
        /// File contents at send time; jobs delete their outputs right after sending.
        bytes: Vec<u8>,
        caption: OutgoingMessage,
    },
    Download {
        file_id: String,
        destination: PathBuf,
    },
    Answer {
        callback_id: String,
    },
}

#[derive(Default)]
pub struct MockBot {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    /// file_id → contents written by `download_file`.
    files: Mutex<HashMap<String, Vec<u8>>>,
    fail_documents: AtomicBool,
    fail_sends: AtomicBool,
}

#[allow(dead_code)]
impl MockBot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, file_id: &str, bytes: impl Into<Vec<u8>>) {
        self.files.lock().unwrap().insert(file_id.to_string(), bytes.into());
    }

    /// Makes every `send_document` fail.
    pub fn fail_documents(&self) {
        self.fail_documents.store(true, Ordering::SeqCst);
    }

    /// Makes `send` fail (e.g. the user blocked the bot) until switched off again.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Texts of sent (not edited) messages, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { message, .. } => Some(message.text),
                _ => None,
            })
            .collect()
    }

    pub fn sent_messages(&self) -> Vec<OutgoingMessage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Send { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn edited_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit { message, .. } => Some(message.text),
                _ => None,
            })
            .collect()
    }

    /// (file name, bytes, caption text) of every document sent.
    pub fn documents(&self) -> Vec<(String, Vec<u8>, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Document {
                    file_name,
                    bytes,
                    caption,
                    ..
                } => Some((file_name, bytes, caption.text)),
                _ => None,
            })
            .collect()
    }

    pub fn answered(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Answer { callback_id } => Some(callback_id),
                _ => None,
            })
            .collect()
    }

    pub fn has_sent(&self, needle: &str) -> bool {
        self.sent_texts().iter().any(|t| t.contains(needle))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send(&self, chat: &Chat, message: OutgoingMessage) -> Result<String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DbotError::Bot("Forbidden: bot was blocked by the user".to_string()));
        }
        let message_id = (self.next_id.fetch_add(1, Ordering::SeqCst) + 1).to_string();
        self.record(Call::Send {
            chat_id: chat.id,
            message_id: message_id.clone(),
            message,
        });
        Ok(message_id)
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, message: OutgoingMessage) -> Result<()> {
        self.record(Call::Edit {
            chat_id: chat.id,
            message_id: message_id.to_string(),
            message,
        });
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        self.record(Call::Delete {
            chat_id: chat.id,
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    async fn send_document(&self, chat: &Chat, path: &Path, caption: OutgoingMessage) -> Result<()> {
        if self.fail_documents.load(Ordering::SeqCst) {
            return Err(DbotError::Bot("sendDocument failed".to_string()));
        }
        let bytes = std::fs::read(path)?;
        self.record(Call::Document {
            chat_id: chat.id,
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            bytes,
            caption,
        });
        Ok(())
    }

    async fn download_file(&self, file_id: &str, destination: &Path) -> Result<()> {
        let bytes = self
            .files
            .lock()
            .unwrap()
            .get(file_id)
            .cloned()
            .ok_or_else(|| DbotError::Bot(format!("unknown file_id {}", file_id)))?;
        std::fs::write(destination, bytes)?;
        self.record(Call::Download {
            file_id: file_id.to_string(),
            destination: destination.to_path_buf(),
        });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<()> {
        self.record(Call::Answer {
            callback_id: callback_id.to_string(),
        });
        Ok(())
    }
}
