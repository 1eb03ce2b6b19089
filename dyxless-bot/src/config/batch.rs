//! Cadence of the file job: checkpoint, backup and progress intervals, delay between API calls.

use std::time::Duration;

use super::env_parse;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// CHECKPOINT_EVERY: rows between checkpoint + partial file saves
    pub checkpoint_every: usize,
    /// BACKUP_EVERY: rows between backup files sent to the chat
    pub backup_every: usize,
    /// PROGRESS_INTERVAL_SECS: minimum seconds between progress message edits
    pub progress_interval_secs: u64,
    /// REQUEST_DELAY_MS: pause after each real API call
    pub request_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            checkpoint_every: 50,
            backup_every: 100,
            progress_interval_secs: 5,
            request_delay_ms: 500,
        }
    }
}

impl BatchConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            checkpoint_every: env_parse("CHECKPOINT_EVERY", defaults.checkpoint_every).max(1),
            backup_every: env_parse("BACKUP_EVERY", defaults.backup_every).max(1),
            progress_interval_secs: env_parse(
                "PROGRESS_INTERVAL_SECS",
                defaults.progress_interval_secs,
            ),
            request_delay_ms: env_parse("REQUEST_DELAY_MS", defaults.request_delay_ms),
        }
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_secs(self.progress_interval_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}
