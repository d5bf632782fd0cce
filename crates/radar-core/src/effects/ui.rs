//! UI effect interfaces: dialogs, navigation, app lifecycle, phone dialer
//!
//! # Effect Classification
//!
//! - **Category**: Frontend Effect
//! - **Implementation**: each frontend (`radar-cli`, mobile hosts)
//! - **Usage**: registration workflow
//!
//! These replace process-wide dialog and navigation singletons. The workflow
//! receives them explicitly and never reaches for global state.

use crate::types::{Alert, Confirmation, Route};
use crate::RadarError;
use async_trait::async_trait;

/// Modal dialogs and the loading indicator.
#[async_trait]
pub trait DialogEffects: Send + Sync {
    /// Ask a yes/no question. `true` means the accepting button was chosen.
    async fn confirm(&self, confirmation: &Confirmation) -> bool;

    /// Show an alert and wait for it to be dismissed.
    async fn alert(&self, alert: &Alert);

    /// Show a blocking loading indicator.
    async fn show_loading(&self, text: &str);

    /// Hide the loading indicator. Hiding when nothing is shown is a no-op.
    async fn hide_loading(&self);
}

/// Page navigation.
#[async_trait]
pub trait NavigationEffects: Send + Sync {
    /// Navigate to `route`.
    async fn navigate(&self, route: &Route) -> Result<(), RadarError>;
}

/// Application lifecycle control.
#[async_trait]
pub trait LifecycleEffects: Send + Sync {
    /// End the current application session.
    async fn close_application(&self);
}

/// Telephone dialer.
#[async_trait]
pub trait PhoneDialerEffects: Send + Sync {
    /// Open the dialer with `number` (digits only).
    async fn open_dialer(&self, number: &str) -> Result<(), RadarError>;
}
