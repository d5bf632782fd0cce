//! Exposure notification platform effects
//!
//! # Effect Classification
//!
//! - **Category**: Platform Effect
//! - **Implementation**: host frontend (mobile bridge), `radar-effects` (file-backed)
//! - **Usage**: registration workflow (enablement check, key history)

use crate::types::TemporaryExposureKey;
use crate::RadarError;
use async_trait::async_trait;
use std::sync::Arc;

/// Access to the platform exposure-notification API.
#[async_trait]
pub trait ExposureNotificationEffects: Send + Sync {
    /// Whether exposure notification is switched on.
    async fn is_enabled(&self) -> Result<bool, RadarError>;

    /// Retrieve the device's temporary exposure key history.
    ///
    /// On mobile platforms this may prompt the user for consent; hosts call
    /// back into the workflow once access is granted.
    async fn temporary_exposure_key_history(
        &self,
    ) -> Result<Vec<TemporaryExposureKey>, RadarError>;
}

/// Blanket implementation for Arc<T> where T: ExposureNotificationEffects
#[async_trait]
impl<T: ExposureNotificationEffects + ?Sized> ExposureNotificationEffects for Arc<T> {
    async fn is_enabled(&self) -> Result<bool, RadarError> {
        (**self).is_enabled().await
    }

    async fn temporary_exposure_key_history(
        &self,
    ) -> Result<Vec<TemporaryExposureKey>, RadarError> {
        (**self).temporary_exposure_key_history().await
    }
}
