//! BotConfig: BaseConfig + DyxlessConfig + BatchConfig + AccessConfig. Use load() for env-based loading.

use anyhow::Result;

use super::{AccessConfig, BaseConfig, BatchConfig, DyxlessConfig};

/// Full bot config. Use BotConfig::load() for env-based loading, then validate().
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub dyxless: DyxlessConfig,
    pub batch: BatchConfig,
    pub access: AccessConfig,
}

impl BotConfig {
    /// Load full config from environment variables. If `token` is provided it overrides TELEGRAM_TOKEN.
    pub fn load(token: Option<String>) -> Result<Self> {
        let base = BaseConfig::load(token)?;
        let dyxless = DyxlessConfig::from_env()?;
        Ok(Self {
            base,
            dyxless,
            batch: BatchConfig::from_env(),
            access: AccessConfig::from_env()?,
        })
    }

    /// Validate config. Call after load() to fail fast before init.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        self.dyxless.validate()
    }

    pub fn base(&self) -> &BaseConfig {
        &self.base
    }

    pub fn bot_token(&self) -> &str {
        &self.base.bot_token
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
