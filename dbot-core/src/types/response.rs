//! Handler chain result type.

/// Handler result for the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResponse {
    /// Pass to next handler.
    Continue,
    /// The update was consumed; stop the chain.
    Stop,
    /// Not for this handler; try next.
    Ignore,
    /// Stop the chain; carries the text that was sent back, so `after()` hooks can see it.
    Reply(String),
}

impl HandlerResponse {
    /// Whether this response ends the handle phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, HandlerResponse::Stop | HandlerResponse::Reply(_))
    }
}
