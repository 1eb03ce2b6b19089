//! Core types: user, chat, incoming message, outgoing message, handler response, and Handler trait.

mod chat;
mod handler;
mod message;
mod outgoing;
mod response;
mod user;

pub use chat::Chat;
pub use handler::{Handler, ToCoreMessage, ToCoreUser};
pub use message::{Document, Message, MessageKind};
pub use outgoing::{InlineButton, InlineKeyboard, OutgoingMessage, TextFormat};
pub use response::HandlerResponse;
pub use user::User;
