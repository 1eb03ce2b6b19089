//! Conversation handlers. Each one consumes the updates it owns (returning Stop or Reply) and ignores
//! the rest, so the chain can try the next handler.

mod file_search;
mod logging;
mod menu;
mod single_search;

pub use file_search::FileSearchHandler;
pub use logging::{AuthHandler, LoggingHandler};
pub use menu::MenuHandler;
pub use single_search::SingleSearchHandler;

use dbot_core::{Bot, HandlerResponse, Message, OutgoingMessage, Result};

/// Sends `outgoing` to the message's chat and reports it as the chain's reply.
pub(crate) async fn reply(bot: &dyn Bot, message: &Message, outgoing: OutgoingMessage) -> Result<HandlerResponse> {
    let text = outgoing.text.clone();
    bot.send(&message.chat, outgoing).await?;
    Ok(HandlerResponse::Reply(text))
}
