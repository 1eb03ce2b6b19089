//! # dyxless-bot
//!
//! Telegram bot that looks up phone numbers for INNs through the Dyxless API: single lookups from
//! chat, and resumable background processing of whole `.xlsx`/`.csv` files.

pub mod batch;
pub mod chain;
pub mod checkpoint;
pub mod cli;
pub mod components;
pub mod config;
pub mod handlers;
pub mod keyboards;
pub mod limiter;
pub mod lookup;
pub mod progress;
pub mod runner;
pub mod session;
pub mod table;
pub mod telegram;
pub mod texts;

pub use batch::{resume_pending, BatchJob, JobContext, JobSpec};
pub use chain::HandlerChain;
pub use checkpoint::{CachedLookup, Checkpoint, CheckpointManager};
pub use cli::{load_config, run_probe, Cli, Commands};
pub use components::{build_bot_components, build_handler_chain, build_job_context, BotComponents};
pub use config::BotConfig;
pub use limiter::{LimitStatus, PauseEvent, PauseObserver, RateLimiter};
pub use runner::run_bot;
pub use session::{ActiveTasks, SessionState, SessionStore};
pub use telegram::{process_message, run_dispatcher, TelegramBotAdapter};
