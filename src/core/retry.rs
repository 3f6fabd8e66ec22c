use std::time::Duration;

/// Bounded retry with fixed delays.
///
/// `limit` counts every attempt, the first one included. A rate-limited
/// attempt waits twice the base delay; any other transient failure waits
/// the base delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub limit: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            limit: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(limit: u32, base_delay: Duration) -> Self {
        Self { limit, base_delay }
    }

    pub fn rate_limit_delay(&self) -> Duration {
        self.base_delay.saturating_mul(2)
    }

    pub fn error_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn has_attempts_left(&self, attempts: u32) -> bool {
        attempts < self.limit
    }
}
