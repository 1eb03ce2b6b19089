//! Access allowlist. Every request costs money, so operators can restrict who may use the bot.

use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone, Default)]
pub struct AccessConfig {
    /// ALLOWED_USER_IDS: comma-separated Telegram user ids. Empty means everyone.
    pub allowed_user_ids: Vec<i64>,
}

impl AccessConfig {
    /// Fails when ALLOWED_USER_IDS holds an entry that is not a user id, so a typo never opens the bot
    /// to everyone.
    pub fn from_env() -> Result<Self> {
        let allowed_user_ids = match env::var("ALLOWED_USER_IDS") {
            Ok(s) => Self::parse_ids(&s).context("Invalid ALLOWED_USER_IDS")?,
            Err(_) => Vec::new(),
        };
        Ok(Self { allowed_user_ids })
    }

    /// Parses `"1, 2,,3"` → `[1, 2, 3]`. Blank entries are skipped; anything else must be an integer.
    pub fn parse_ids(s: &str) -> Result<Vec<i64>> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>()
                    .with_context(|| format!("'{}' is not a Telegram user id", part))
            })
            .collect()
    }

    pub fn is_restricted(&self) -> bool {
        !self.allowed_user_ids.is_empty()
    }
}
