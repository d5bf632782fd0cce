//! Layer 3: Time Effect Handlers - Production Only
//!
//! Stateless implementation of `SleepEffects` backed by the tokio timer.
//! Deterministic handlers for tests live in `radar-testkit`.

use async_trait::async_trait;
use radar_core::effects::SleepEffects;
use std::time::Duration;
use tokio::time;

/// Real time handler for production use
#[derive(Debug, Clone, Default)]
pub struct RealTimeHandler;

impl RealTimeHandler {
    /// Create a new real time handler
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SleepEffects for RealTimeHandler {
    async fn sleep_ms(&self, ms: u64) {
        time::sleep(Duration::from_millis(ms)).await;
    }
}
