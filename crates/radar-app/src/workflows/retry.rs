//! Bounded retry policy for registration attempts.

use radar_core::RegistrationConfig;

/// Attempt cap and linear back-off.
///
/// After `n` failed attempts the next one waits `n * step_ms`; once `n`
/// reaches `max_attempts` no further attempt is allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    step_ms: u64,
}

impl RetryPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, step_ms: u64) -> Self {
        Self {
            max_attempts,
            step_ms,
        }
    }

    /// Policy from registration settings.
    pub fn from_config(config: &RegistrationConfig) -> Self {
        Self::new(config.max_error_count, config.retry_delay_step_ms)
    }

    /// Configured maximum.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether `failed` attempts exhaust the budget.
    pub fn is_exhausted(&self, failed: u32) -> bool {
        failed >= self.max_attempts
    }

    /// Delay before the next attempt, or `None` on a clean first attempt.
    pub fn delay_before(&self, failed: u32) -> Option<u64> {
        (failed > 0).then(|| self.step_ms.saturating_mul(u64::from(failed)))
    }
}
