//! # Registration Notices
//!
//! Portable catalog of every dialog the registration screen can raise.
//! Frontends that localize can match on [`Notice`] and ignore the English
//! defaults.

use radar_core::types::{Alert, Confirmation};
use serde::{Deserialize, Serialize};

/// Dismiss button label shared by all notices.
pub const BUTTON_OK: &str = "OK";

/// Loading indicator text while keys are uploaded.
pub const LOADING_REGISTERING: &str = "Registering";

// ============================================================================
// Confirmation
// ============================================================================

/// Question asked before anything is uploaded.
#[must_use]
pub fn confirm_registration() -> Confirmation {
    Confirmation {
        title: "Register your positive result".to_string(),
        message: "Your anonymous keys from the last two weeks will be shared so others \
                  can learn they may have been exposed. Continue?"
            .to_string(),
        accept: "Register".to_string(),
        cancel: "Cancel".to_string(),
    }
}

// ============================================================================
// Alerts
// ============================================================================

/// Alerts raised by the registration flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Notice {
    /// User backed out of the confirmation
    Cancelled,
    /// Retry limit reached; the app is about to close
    AppWillClose,
    /// Waiting before the next attempt
    RetryWait,
    /// No processing number entered
    EmptyIdentifier,
    /// Processing number has the wrong shape
    MalformedIdentifier,
    /// Exposure notification is off
    PlatformDisabled,
    /// No key fell inside the submission window
    NoKeysFound,
    /// Generic failure (platform or network)
    RegistrationFailed,
    /// Server accepted the keys
    Submitted,
    /// Server did not recognise the processing number
    IdentifierIncorrect,
    /// Server unavailable
    CannotConnect,
    /// Server refused the record data
    RecordDataProblem,
}

impl Notice {
    /// Get dialog title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Cancelled => "Registration cancelled",
            Self::AppWillClose => "Too many attempts",
            Self::RetryWait => "Please wait",
            Self::EmptyIdentifier => "Processing number required",
            Self::MalformedIdentifier => "Invalid processing number",
            Self::PlatformDisabled => "Exposure notification is off",
            Self::NoKeysFound => "No keys to register",
            Self::RegistrationFailed => "Registration failed",
            Self::Submitted => "Registration complete",
            Self::IdentifierIncorrect => "Processing number not recognised",
            Self::CannotConnect => "Cannot connect to the server",
            Self::RecordDataProblem => "Problem with the record data",
        }
    }

    /// Get dialog body.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Cancelled => "",
            Self::AppWillClose => {
                "Registration failed too many times. The app will close; \
                 open it again to retry."
            }
            Self::RetryWait => "Registration will be retried after a short wait.",
            Self::EmptyIdentifier => "Enter the processing number you were given.",
            Self::MalformedIdentifier => "Check the processing number and enter it again.",
            Self::PlatformDisabled => {
                "Turn on exposure notification in the settings and register again."
            }
            Self::NoKeysFound => "No keys were recorded for the selected period.",
            Self::RegistrationFailed => "Something went wrong. Please try again later.",
            Self::Submitted => "Thank you for helping to stop the spread.",
            Self::IdentifierIncorrect => "Check the processing number and enter it again.",
            Self::CannotConnect => "Please try again later.",
            Self::RecordDataProblem => "Please contact the inquiry desk.",
        }
    }

    /// Build the alert handed to the dialog handler.
    #[must_use]
    pub fn alert(self) -> Alert {
        Alert::new(self.title(), self.message(), BUTTON_OK)
    }
}
