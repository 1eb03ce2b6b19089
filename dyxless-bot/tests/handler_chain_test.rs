//! Integration tests for [`dyxless_bot::HandlerChain`].
//!
//! Covers: before/after order, a before hook stopping the chain, the first terminal response ending
//! the handle phase and reaching every after hook.

mod common;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbot_core::{Handler, HandlerResponse, Message, Result};
use dyxless_bot::HandlerChain;

use common::{text, USER_ID};

type Log = Arc<Mutex<Vec<String>>>;

struct Recording {
    name: &'static str,
    log: Log,
    allow: bool,
    response: HandlerResponse,
}

impl Recording {
    fn new(name: &'static str, log: &Log, response: HandlerResponse) -> Arc<Self> {
        Arc::new(Self {
            name,
            log: log.clone(),
            allow: true,
            response,
        })
    }

    fn push(&self, step: &str) {
        self.log.lock().unwrap().push(format!("{}:{}", self.name, step));
    }
}

#[async_trait]
impl Handler for Recording {
    async fn before(&self, _message: &Message) -> Result<bool> {
        self.push("before");
        Ok(self.allow)
    }

    async fn handle(&self, _message: &Message) -> Result<HandlerResponse> {
        self.push("handle");
        Ok(self.response.clone())
    }

    async fn after(&self, _message: &Message, response: &HandlerResponse) -> Result<()> {
        self.push(&format!("after({:?})", response));
        Ok(())
    }
}

/// **Test: Hooks run before (in order) → handle → after (reverse).**
///
/// **Setup:** Two handlers that both ignore the message.
/// **Action:** `chain.handle(&message)`.
/// **Expected:** a:before, b:before, a:handle, b:handle, b:after, a:after; response Continue.
#[tokio::test]
async fn test_chain_order() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recording::new("a", &log, HandlerResponse::Ignore))
        .add_handler(Recording::new("b", &log, HandlerResponse::Continue));

    let response = chain.handle(&text(USER_ID, "hi")).await.unwrap();

    assert_eq!(response, HandlerResponse::Continue);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "a:before",
            "b:before",
            "a:handle",
            "b:handle",
            "b:after(Continue)",
            "a:after(Continue)"
        ]
    );
}

/// **Test: A before hook returning false stops the chain with Stop; nothing else runs.**
#[tokio::test]
async fn test_before_false_stops_chain() {
    let log: Log = Arc::default();
    let blocker = Arc::new(Recording {
        name: "gate",
        log: log.clone(),
        allow: false,
        response: HandlerResponse::Ignore,
    });
    let chain = HandlerChain::new()
        .add_handler(blocker)
        .add_handler(Recording::new("b", &log, HandlerResponse::Stop));

    let response = chain.handle(&text(USER_ID, "hi")).await.unwrap();

    assert_eq!(response, HandlerResponse::Stop);
    assert_eq!(*log.lock().unwrap(), vec!["gate:before"]);
}

/// **Test: Reply ends the handle phase and is passed to every after hook.**
#[tokio::test]
async fn test_reply_stops_handle_phase() {
    let log: Log = Arc::default();
    let chain = HandlerChain::new()
        .add_handler(Recording::new("a", &log, HandlerResponse::Reply("ok".to_string())))
        .add_handler(Recording::new("b", &log, HandlerResponse::Stop));

    let response = chain.handle(&text(USER_ID, "hi")).await.unwrap();

    assert_eq!(response, HandlerResponse::Reply("ok".to_string()));
    let log = log.lock().unwrap();
    assert!(!log.contains(&"b:handle".to_string()));
    assert!(log.contains(&"b:after(Reply(\"ok\"))".to_string()));
    assert!(log.contains(&"a:after(Reply(\"ok\"))".to_string()));
}
