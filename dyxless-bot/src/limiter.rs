//! Client-side rate limiter for the Dyxless API.
//!
//! The provider allows a fixed number of requests per window. Calls are counted; once the budget of a
//! cycle is spent, the next caller waits out the rest of the window (notifying an optional observer
//! once a minute), then a new cycle starts. Callers are serialized, so a pause blocks every job.

use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::{info, warn};

const NOTIFY_EVERY: Duration = Duration::from_secs(60);

/// Progress of a rate-limit pause, reported to a [`PauseObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PauseEvent {
    /// Budget spent; waiting `remaining` before the next request.
    Started { max_calls: u32, remaining: Duration },
    /// Still waiting.
    Waiting { remaining: Duration },
    /// Pause over; requests continue.
    Finished,
}

/// Receives pause notifications (e.g. to edit a progress message in the chat).
#[async_trait]
pub trait PauseObserver: Send + Sync {
    async fn on_pause(&self, event: PauseEvent);
}

/// Snapshot of the limiter for status messages.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitStatus {
    pub used: u32,
    pub remaining: u32,
    pub max_calls: u32,
    /// Minutes until the window started by the current cycle ends, rounded to 0.1.
    pub next_reset_minutes: f64,
    /// Time since the current cycle started.
    pub cycle_time: Duration,
}

impl LimitStatus {
    /// Currently waiting out a pause.
    pub fn is_paused(&self) -> bool {
        self.used > self.max_calls
    }
}

#[derive(Debug, Default)]
struct LimiterState {
    call_count: u32,
    cycle_started_at: Option<Instant>,
}

pub struct RateLimiter {
    max_calls: u32,
    pause: Duration,
    /// Serializes callers; held across the pause.
    gate: Mutex<()>,
    /// Counters; never held across an await so `status()` stays non-blocking.
    state: StdMutex<LimiterState>,
}

impl RateLimiter {
    pub fn new(max_calls: u32, pause: Duration) -> Self {
        Self {
            max_calls: max_calls.max(1),
            pause,
            gate: Mutex::new(()),
            state: StdMutex::new(LimiterState::default()),
        }
    }

    pub fn max_calls(&self) -> u32 {
        self.max_calls
    }

    fn state(&self) -> MutexGuard<'_, LimiterState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts one request and waits if the current cycle's budget is spent.
    pub async fn wait_if_needed(&self, observer: Option<&dyn PauseObserver>) {
        let _gate = self.gate.lock().await;

        let wait = {
            let mut state = self.state();
            state.call_count += 1;

            if state.call_count == 1 {
                state.cycle_started_at = Some(Instant::now());
                info!(max_calls = self.max_calls, "Rate limit cycle started");
                return;
            }
            if state.call_count <= self.max_calls {
                return;
            }

            let elapsed = state
                .cycle_started_at
                .map(|t| t.elapsed())
                .unwrap_or_default();
            self.pause.saturating_sub(elapsed)
        };

        if !wait.is_zero() {
            warn!(
                max_calls = self.max_calls,
                wait_secs = wait.as_secs(),
                "Rate limit reached, pausing"
            );
            if let Some(observer) = observer {
                observer
                    .on_pause(PauseEvent::Started {
                        max_calls: self.max_calls,
                        remaining: wait,
                    })
                    .await;
            }

            let mut remaining = wait;
            while !remaining.is_zero() {
                let chunk = remaining.min(NOTIFY_EVERY);
                sleep(chunk).await;
                remaining -= chunk;

                if !remaining.is_zero() {
                    if let Some(observer) = observer {
                        observer.on_pause(PauseEvent::Waiting { remaining }).await;
                    }
                }
            }
        }

        {
            let mut state = self.state();
            state.call_count = 1;
            state.cycle_started_at = Some(Instant::now());
        }
        info!(max_calls = self.max_calls, "Rate limit reset, new cycle started");

        if let Some(observer) = observer {
            observer.on_pause(PauseEvent::Finished).await;
        }
    }

    pub fn status(&self) -> LimitStatus {
        let state = self.state();
        let Some(started) = state.cycle_started_at.filter(|_| state.call_count > 0) else {
            return LimitStatus {
                used: 0,
                remaining: self.max_calls,
                max_calls: self.max_calls,
                next_reset_minutes: 0.0,
                cycle_time: Duration::ZERO,
            };
        };

        let elapsed = started.elapsed();
        let next_reset_minutes = self.pause.saturating_sub(elapsed).as_secs_f64() / 60.0;

        LimitStatus {
            used: state.call_count,
            remaining: self.max_calls.saturating_sub(state.call_count),
            max_calls: self.max_calls,
            next_reset_minutes: (next_reset_minutes * 10.0).round() / 10.0,
            cycle_time: elapsed,
        }
    }

    /// Rough duration of `total_requests` calls: one second each plus one pause per full cycle.
    pub fn estimate(&self, total_requests: usize) -> Duration {
        if total_requests == 0 {
            return Duration::ZERO;
        }
        let full_cycles = (total_requests / self.max_calls as usize) as u32;
        Duration::from_secs(total_requests as u64) + self.pause * full_cycles
    }
}
