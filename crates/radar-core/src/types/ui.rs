//! Plain data handed to UI effect handlers.
//!
//! Handlers render these however their frontend does; the core only decides
//! what is said and where the user goes next.

use serde::{Deserialize, Serialize};

/// A dialog with a single dismiss button.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Dialog title
    pub title: String,
    /// Body text (may be empty)
    pub message: String,
    /// Dismiss button label
    pub button: String,
}

impl Alert {
    /// Create an alert.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        button: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            button: button.into(),
        }
    }
}

/// A yes/no dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Dialog title
    pub title: String,
    /// Body text
    pub message: String,
    /// Label of the accepting button
    pub accept: String,
    /// Label of the cancelling button
    pub cancel: String,
}

/// Navigation targets reachable from the registration screen.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    /// Root of the app (menu → home)
    Home,
    /// Consent page, carrying the processing number entered so far
    SubmitConsent {
        /// Identifier to pre-fill on the consent page
        processing_number: String,
    },
}

impl Route {
    /// Path understood by page-stack navigators.
    pub fn path(&self) -> &'static str {
        match self {
            Self::Home => "/MenuPage/NavigationPage/HomePage",
            Self::SubmitConsent { .. } => "SubmitConsentPage",
        }
    }
}
