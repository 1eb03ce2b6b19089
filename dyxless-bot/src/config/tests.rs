//! Config tests. Environment-mutating, so serialized.

use crate::config::{AccessConfig, BotConfig};
use serial_test::serial;
use std::env;
use std::path::PathBuf;

const VARS: &[&str] = &[
    "TELEGRAM_TOKEN",
    "BOT_TOKEN",
    "TELEGRAM_API_URL",
    "TELOXIDE_API_URL",
    "LOG_FILE",
    "TEMP_DIR",
    "CHECKPOINT_DIR",
    "DYXLESS_API_TOKEN",
    "DYXLESS_API_URL",
    "DYXLESS_TIMEOUT_SECS",
    "RATE_LIMIT_MAX_CALLS",
    "RATE_LIMIT_PAUSE_SECS",
    "PRICE_PER_REQUEST",
    "CHECKPOINT_EVERY",
    "BACKUP_EVERY",
    "PROGRESS_INTERVAL_SECS",
    "REQUEST_DELAY_MS",
    "ALLOWED_USER_IDS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();
    env::set_var("TELEGRAM_TOKEN", "test_token");
    env::set_var("DYXLESS_API_TOKEN", "dyx_token");

    let config = BotConfig::load(None).unwrap();
    config.validate().unwrap();

    assert_eq!(config.bot_token(), "test_token");
    assert!(config.telegram_api_url().is_none());
    assert_eq!(config.log_file(), "logs/dyxless-bot.log");
    assert_eq!(config.base.temp_dir, PathBuf::from("temp"));
    assert_eq!(config.base.checkpoint_dir, PathBuf::from("checkpoints"));
    assert_eq!(config.dyxless.api_token, "dyx_token");
    assert_eq!(config.dyxless.api_url, "https://api-dyxless.cfd/query");
    assert_eq!(config.dyxless.timeout_secs, 30);
    assert_eq!(config.dyxless.rate_limit_max_calls, 100);
    assert_eq!(config.dyxless.rate_limit_pause_secs, 960);
    assert_eq!(config.dyxless.price_per_request, 2);
    assert_eq!(config.batch.checkpoint_every, 50);
    assert_eq!(config.batch.backup_every, 100);
    assert_eq!(config.batch.progress_interval_secs, 5);
    assert_eq!(config.batch.request_delay_ms, 500);
    assert!(!config.access.is_restricted());
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    env::set_var("BOT_TOKEN", "fallback_token");
    env::set_var("DYXLESS_API_TOKEN", "dyx_token");
    env::set_var("DYXLESS_API_URL", "http://127.0.0.1:9000/query");
    env::set_var("RATE_LIMIT_MAX_CALLS", "10");
    env::set_var("RATE_LIMIT_PAUSE_SECS", "60");
    env::set_var("CHECKPOINT_EVERY", "5");
    env::set_var("BACKUP_EVERY", "0");
    env::set_var("REQUEST_DELAY_MS", "not-a-number");
    env::set_var("TEMP_DIR", "/tmp/dyx");
    env::set_var("ALLOWED_USER_IDS", "1, 2,,3");

    let config = BotConfig::load(None).unwrap();
    config.validate().unwrap();

    assert_eq!(config.bot_token(), "fallback_token");
    assert_eq!(config.dyxless.api_url, "http://127.0.0.1:9000/query");
    assert_eq!(config.dyxless.rate_limit_max_calls, 10);
    assert_eq!(config.dyxless.rate_limit_pause_secs, 60);
    assert_eq!(config.batch.checkpoint_every, 5);
    assert_eq!(config.batch.backup_every, 1, "zero is clamped to 1");
    assert_eq!(config.batch.request_delay_ms, 500, "unparsable falls back to default");
    assert_eq!(config.base.temp_dir, PathBuf::from("/tmp/dyx"));
    assert_eq!(config.access.allowed_user_ids, vec![1, 2, 3]);
}

#[test]
#[serial]
fn test_load_config_with_override_token() {
    clear_env();
    env::set_var("TELEGRAM_TOKEN", "env_token");
    env::set_var("DYXLESS_API_TOKEN", "dyx_token");

    let config = BotConfig::load(Some("override_token".to_string())).unwrap();

    assert_eq!(config.bot_token(), "override_token");
}

#[test]
#[serial]
fn test_missing_tokens_are_reported() {
    clear_env();
    let err = BotConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("TELEGRAM_TOKEN"));

    env::set_var("TELEGRAM_TOKEN", "test_token");
    let err = BotConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("DYXLESS_API_TOKEN"));
}

#[test]
#[serial]
fn test_validate_rejects_bad_urls() {
    clear_env();
    env::set_var("TELEGRAM_TOKEN", "test_token");
    env::set_var("DYXLESS_API_TOKEN", "dyx_token");
    env::set_var("TELEGRAM_API_URL", "not a url");

    let config = BotConfig::load(None).unwrap();
    assert!(config.validate().is_err());

    env::remove_var("TELEGRAM_API_URL");
    env::set_var("RATE_LIMIT_MAX_CALLS", "0");
    let config = BotConfig::load(None).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_parse_allowed_ids() {
    assert_eq!(AccessConfig::parse_ids("").unwrap(), Vec::<i64>::new());
    assert_eq!(AccessConfig::parse_ids("42").unwrap(), vec![42]);
    assert_eq!(AccessConfig::parse_ids(" 7 ,-100, ").unwrap(), vec![7, -100]);
    assert!(AccessConfig::parse_ids(" 7, x").is_err());
}

/// **Test: An allowlist with a malformed entry fails to load instead of allowing everyone.**
#[test]
#[serial]
fn test_malformed_allowlist_is_rejected() {
    clear_env();
    env::set_var("TELEGRAM_TOKEN", "test_token");
    env::set_var("DYXLESS_API_TOKEN", "dyx_token");
    env::set_var("ALLOWED_USER_IDS", "12345678O, @admin");

    let err = BotConfig::load(None).unwrap_err();
    assert!(format!("{:#}", err).contains("ALLOWED_USER_IDS"));
}

/// **Test: An empty TELEGRAM_TOKEN falls through to BOT_TOKEN.**
#[test]
#[serial]
fn test_empty_telegram_token_falls_back_to_bot_token() {
    clear_env();
    env::set_var("TELEGRAM_TOKEN", "");
    env::set_var("BOT_TOKEN", "fallback_token");
    env::set_var("DYXLESS_API_TOKEN", "dyx_token");

    let config = BotConfig::load(None).unwrap();
    assert_eq!(config.bot_token(), "fallback_token");

    let config = BotConfig::load(Some("  ".to_string())).unwrap();
    assert_eq!(config.bot_token(), "fallback_token");
}
