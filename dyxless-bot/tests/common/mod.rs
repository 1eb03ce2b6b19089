//! Shared fixtures for dyxless-bot integration tests.

#![allow(dead_code)]

pub mod mock_api;
pub mod mock_bot;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dbot_core::{Chat, Document, Message, MessageKind, User};
use dyxless_bot::config::{AccessConfig, BaseConfig, BatchConfig, BotConfig, DyxlessConfig};
use dyxless_bot::table::{read_table, Table};
use dyxless_bot::{ActiveTasks, CheckpointManager, JobContext, RateLimiter};
use tempfile::TempDir;

use mock_api::MockLookup;
use mock_bot::MockBot;

pub const USER_ID: i64 = 1001;

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some("tester".to_string()),
        first_name: Some("Test".to_string()),
        last_name: None,
    }
}

fn message(user_id: i64, content: &str, kind: MessageKind) -> Message {
    Message {
        id: "1".to_string(),
        user: user(user_id),
        chat: Chat::private(user_id),
        content: content.to_string(),
        kind,
        created_at: Utc::now(),
    }
}

pub fn text(user_id: i64, content: &str) -> Message {
    message(user_id, content, MessageKind::Text)
}

pub fn callback(user_id: i64, data: &str) -> Message {
    message(
        user_id,
        data,
        MessageKind::Callback {
            callback_id: format!("cb-{}", data),
        },
    )
}

pub fn document(user_id: i64, file_id: &str, file_name: &str) -> Message {
    message(
        user_id,
        "",
        MessageKind::Document(Document {
            file_id: file_id.to_string(),
            file_name: Some(file_name.to_string()),
            size: 0,
        }),
    )
}

/// Fast cadence: no delay between requests, checkpoints every 2 rows, backups every 4.
pub fn batch_config() -> BatchConfig {
    BatchConfig {
        checkpoint_every: 2,
        backup_every: 4,
        progress_interval_secs: 5,
        request_delay_ms: 0,
    }
}

pub fn bot_config(dir: &Path, batch: BatchConfig, allowed_user_ids: Vec<i64>) -> BotConfig {
    BotConfig {
        base: BaseConfig {
            bot_token: "test_bot_token_12345".to_string(),
            telegram_api_url: None,
            log_file: dir.join("logs/test.log").display().to_string(),
            temp_dir: dir.join("temp"),
            checkpoint_dir: dir.join("checkpoints"),
        },
        dyxless: DyxlessConfig {
            api_token: "dyx_test_token_abcdef".to_string(),
            api_url: "http://127.0.0.1:1/query".to_string(),
            timeout_secs: 5,
            rate_limit_max_calls: 100,
            rate_limit_pause_secs: 960,
            price_per_request: 2,
        },
        batch,
        access: AccessConfig { allowed_user_ids },
    }
}

/// Job services over a mock bot and mock API, rooted in `dir`.
pub fn job_context(dir: &TempDir, bot: Arc<MockBot>, api: Arc<MockLookup>, batch: BatchConfig) -> Arc<JobContext> {
    job_context_with_limiter(dir, bot, api, batch, RateLimiter::new(100, Duration::from_secs(960)))
}

pub fn job_context_with_limiter(
    dir: &TempDir,
    bot: Arc<MockBot>,
    api: Arc<MockLookup>,
    batch: BatchConfig,
    limiter: RateLimiter,
) -> Arc<JobContext> {
    let temp_dir = dir.path().join("temp");
    std::fs::create_dir_all(&temp_dir).unwrap();
    Arc::new(JobContext {
        bot,
        api,
        limiter: Arc::new(limiter),
        checkpoints: Arc::new(CheckpointManager::new(dir.path().join("checkpoints")).unwrap()),
        active_tasks: Arc::new(ActiveTasks::new()),
        batch,
        price_per_request: 2,
        temp_dir,
    })
}

/// CSV with a name column and the INN column.
pub fn inn_csv(inns: &[&str]) -> String {
    let mut csv = String::from("Компания,Результат (ИНН)\n");
    for (i, inn) in inns.iter().enumerate() {
        csv.push_str(&format!("Компания {},{}\n", i + 1, inn));
    }
    csv
}

/// Parses a document captured by MockBot.
pub fn read_document(dir: &TempDir, name: &str, bytes: &[u8]) -> Table {
    let path = dir.path().join(format!("received_{}", name));
    std::fs::write(&path, bytes).unwrap();
    read_table(&path).unwrap()
}
