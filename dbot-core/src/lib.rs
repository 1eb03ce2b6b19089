//! # dbot-core
//!
//! Transport-agnostic core for the bot: [`Bot`] and [`Handler`] traits, message/user/chat types,
//! outgoing messages with inline keyboards, errors, and tracing initialization.

pub mod bot;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::{parse_message_id, Bot};
pub use error::{DbotError, HandlerError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Document, Handler, HandlerResponse, InlineButton, InlineKeyboard, Message, MessageKind,
    OutgoingMessage, TextFormat, ToCoreMessage, ToCoreUser, User,
};
