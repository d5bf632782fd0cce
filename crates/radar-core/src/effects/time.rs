//! Time effects
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `radar-effects` (tokio), `radar-testkit` (recording)
//! - **Usage**: cooperative retry delays

use async_trait::async_trait;
use std::sync::Arc;

/// Cooperative (non-blocking) waiting.
#[async_trait]
pub trait SleepEffects: Send + Sync {
    /// Suspend the current task for `ms` milliseconds.
    async fn sleep_ms(&self, ms: u64);
}

/// Blanket implementation for Arc<T> where T: SleepEffects
#[async_trait]
impl<T: SleepEffects + ?Sized> SleepEffects for Arc<T> {
    async fn sleep_ms(&self, ms: u64) {
        (**self).sleep_ms(ms).await;
    }
}
