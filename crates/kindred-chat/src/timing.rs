//! Simulated "thinking" latency before the companion answers.

use std::time::Duration;

use kindred_core::config::EngineConfig;
use rand::Rng;

/// Half-open range `[min_ms, max_ms)` the reply delay is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThinkingDelay {
    min_ms: u64,
    max_ms: u64,
}

impl Default for ThinkingDelay {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl ThinkingDelay {
    /// Build a delay range. An empty or inverted range collapses to `min_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self {
            min_ms,
            max_ms: max_ms.max(min_ms),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.min_delay_ms, config.max_delay_ms)
    }

    /// Draw a delay uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min_ms >= self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(rng.random_range(self.min_ms..self.max_ms))
    }

    pub fn min(&self) -> Duration {
        Duration::from_millis(self.min_ms)
    }

    pub fn max(&self) -> Duration {
        Duration::from_millis(self.max_ms)
    }
}

/// Suspend the current task for `delay` without blocking the runtime.
///
/// Dropping the returned future abandons the wait.
pub async fn wait(delay: Duration) {
    tokio::time::sleep(delay).await;
}
