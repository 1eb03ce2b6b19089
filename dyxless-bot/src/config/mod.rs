//! Bot configuration: BaseConfig (Telegram + log + directories) + DyxlessConfig (API + rate limit)
//! + BatchConfig (file job cadence) + AccessConfig (allowlist). Loaded from env.

mod access;
mod base;
mod batch;
mod bot_config;
mod dyxless;

#[cfg(test)]
mod tests;

pub use access::AccessConfig;
pub use base::BaseConfig;
pub use batch::BatchConfig;
pub use bot_config::BotConfig;
pub use dyxless::DyxlessConfig;

use std::env;
use std::str::FromStr;

/// Reads and parses `key`; missing or unparsable values fall back to `default`.
fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}
