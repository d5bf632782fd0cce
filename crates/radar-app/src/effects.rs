//! Effect bundle handed to the registration flow.

use radar_core::effects::{
    DiagnosisKeyRegisterEffects, DialogEffects, ExposureNotificationEffects, LifecycleEffects,
    NavigationEffects, PhoneDialerEffects, SleepEffects,
};
use std::sync::Arc;

/// Every collaborator the registration flow calls.
///
/// Frontends assemble this from their own UI handlers plus the production
/// handlers in `radar-effects`. Tests build it from one mock through
/// [`RegistrationEffects::from_handler`].
#[derive(Clone)]
pub struct RegistrationEffects {
    /// Alerts, confirmation and loading indicator
    pub dialogs: Arc<dyn DialogEffects>,
    /// Page navigation
    pub navigation: Arc<dyn NavigationEffects>,
    /// Application close
    pub lifecycle: Arc<dyn LifecycleEffects>,
    /// Telephone dialer
    pub dialer: Arc<dyn PhoneDialerEffects>,
    /// Cooperative delays
    pub time: Arc<dyn SleepEffects>,
    /// Exposure notification platform
    pub exposure: Arc<dyn ExposureNotificationEffects>,
    /// Key upload
    pub register: Arc<dyn DiagnosisKeyRegisterEffects>,
}

impl RegistrationEffects {
    /// Use one handler for every effect.
    pub fn from_handler<H>(handler: Arc<H>) -> Self
    where
        H: DialogEffects
            + NavigationEffects
            + LifecycleEffects
            + PhoneDialerEffects
            + SleepEffects
            + ExposureNotificationEffects
            + DiagnosisKeyRegisterEffects
            + 'static,
    {
        Self {
            dialogs: handler.clone(),
            navigation: handler.clone(),
            lifecycle: handler.clone(),
            dialer: handler.clone(),
            time: handler.clone(),
            exposure: handler.clone(),
            register: handler,
        }
    }
}

impl std::fmt::Debug for RegistrationEffects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationEffects").finish_non_exhaustive()
    }
}
