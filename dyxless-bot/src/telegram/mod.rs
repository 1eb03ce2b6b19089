//! Telegram layer: update adapters, the Bot implementation, and the update dispatcher.

mod adapters;
mod bot_adapter;
mod runner;

pub use adapters::{TelegramCallbackWrapper, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use runner::{process_message, run_dispatcher};
