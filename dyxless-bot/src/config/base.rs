//! Base config: Telegram connection, logging, working directories. Loaded from env.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Base config: Telegram-related, logging and filesystem layout only.
#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// TELEGRAM_TOKEN (or BOT_TOKEN)
    pub bot_token: String,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// LOG_FILE
    pub log_file: String,
    /// TEMP_DIR: uploads, partial results, backups and final outputs
    pub temp_dir: PathBuf,
    /// CHECKPOINT_DIR: resumable job state
    pub checkpoint_dir: PathBuf,
}

impl BaseConfig {
    /// Load from environment variables. `token` overrides TELEGRAM_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let non_empty = |t: &String| !t.trim().is_empty();
        let bot_token = token
            .filter(non_empty)
            .or_else(|| env::var("TELEGRAM_TOKEN").ok().filter(non_empty))
            .or_else(|| env::var("BOT_TOKEN").ok().filter(non_empty))
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "TELEGRAM_TOKEN not set; export TELEGRAM_TOKEN='<telegram bot token>'"
                )
            })?;
        let telegram_api_url = env::var("TELEGRAM_API_URL")
            .or_else(|_| env::var("TELOXIDE_API_URL"))
            .ok();
        let log_file =
            env::var("LOG_FILE").unwrap_or_else(|_| "logs/dyxless-bot.log".to_string());
        let temp_dir = PathBuf::from(env::var("TEMP_DIR").unwrap_or_else(|_| "temp".to_string()));
        let checkpoint_dir = PathBuf::from(
            env::var("CHECKPOINT_DIR").unwrap_or_else(|_| "checkpoints".to_string()),
        );

        Ok(Self {
            bot_token,
            telegram_api_url,
            log_file,
            temp_dir,
            checkpoint_dir,
        })
    }

    /// Validate config (telegram_api_url must be a valid URL if set).
    pub fn validate(&self) -> Result<()> {
        if let Some(ref url_str) = self.telegram_api_url {
            if reqwest::Url::parse(url_str).is_err() {
                anyhow::bail!(
                    "TELEGRAM_API_URL (or TELOXIDE_API_URL) is set but not a valid URL: {}",
                    url_str
                );
            }
        }
        Ok(())
    }
}
