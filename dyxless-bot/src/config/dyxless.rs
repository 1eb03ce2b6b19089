//! Dyxless API config: token, endpoint, timeout and the client-side rate limit.

use anyhow::Result;
use std::env;
use std::time::Duration;

use super::env_parse;

/// Dyxless API and rate-limit settings.
#[derive(Debug, Clone)]
pub struct DyxlessConfig {
    /// DYXLESS_API_TOKEN
    pub api_token: String,
    /// DYXLESS_API_URL
    pub api_url: String,
    /// DYXLESS_TIMEOUT_SECS
    pub timeout_secs: u64,
    /// RATE_LIMIT_MAX_CALLS: requests allowed per cycle
    pub rate_limit_max_calls: u32,
    /// RATE_LIMIT_PAUSE_SECS: cycle length; the limiter waits out the rest of it once the budget is spent
    pub rate_limit_pause_secs: u64,
    /// PRICE_PER_REQUEST: rubles per standard request, shown in captions
    pub price_per_request: u32,
}

impl DyxlessConfig {
    pub fn from_env() -> Result<Self> {
        let api_token = env::var("DYXLESS_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "DYXLESS_API_TOKEN not set; export DYXLESS_API_TOKEN='<dyxless api token>'"
                )
            })?;
        let api_url = env::var("DYXLESS_API_URL")
            .unwrap_or_else(|_| dyxless_client::DEFAULT_API_URL.to_string());

        Ok(Self {
            api_token,
            api_url,
            timeout_secs: env_parse("DYXLESS_TIMEOUT_SECS", 30),
            rate_limit_max_calls: env_parse("RATE_LIMIT_MAX_CALLS", 100),
            rate_limit_pause_secs: env_parse("RATE_LIMIT_PAUSE_SECS", 16 * 60),
            price_per_request: env_parse("PRICE_PER_REQUEST", 2),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if reqwest::Url::parse(&self.api_url).is_err() {
            anyhow::bail!("DYXLESS_API_URL is not a valid URL: {}", self.api_url);
        }
        if self.rate_limit_max_calls == 0 {
            anyhow::bail!("RATE_LIMIT_MAX_CALLS must be greater than 0");
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn rate_limit_pause(&self) -> Duration {
        Duration::from_secs(self.rate_limit_pause_secs)
    }
}
