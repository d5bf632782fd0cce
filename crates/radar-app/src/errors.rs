//! Categorized registration errors
//!
//! Provides structured error types that enable:
//! - Categorized error handling (input vs platform vs network vs server)
//! - Deciding whether an attempt counts against the retry limit
//! - Choosing the notice shown to the user

use crate::messages::Notice;
use radar_core::types::{IdentifierError, SubmissionOutcome};
use radar_core::RadarError;
use std::fmt;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Processing number problems (correctable by user)
    Input,
    /// Exposure notification platform is off or failing
    Platform,
    /// Registration server could not be reached
    Network,
    /// Registration server answered with a refusal or failure
    Server,
    /// Session state: cancelled, busy, or out of attempts
    Session,
}

impl ErrorCategory {
    /// Check if this error category is user-correctable.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Input | Self::Platform)
    }

    /// Check if this error category is likely transient.
    ///
    /// Transient errors may resolve on retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network | Self::Server)
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Platform => "Platform",
            Self::Network => "Network",
            Self::Server => "Server",
            Self::Session => "Session",
        }
    }

    /// Get a hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Input => "Check the processing number and try again",
            Self::Platform => "Turn on exposure notifications and try again",
            Self::Network => "Check your network connection and retry",
            Self::Server => "Wait a while before registering again",
            Self::Session => "Restart registration from the beginning",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Registration Error
// ============================================================================

/// Everything that can end a registration attempt without success.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// User declined the confirmation dialog
    #[error("registration cancelled by user")]
    UserCancelled,

    /// Processing number empty or malformed
    #[error("invalid processing number: {0}")]
    Validation(#[from] IdentifierError),

    /// Exposure notification is turned off
    #[error("exposure notification is disabled")]
    PlatformDisabled,

    /// Exposure notification platform call failed
    #[error("exposure notification platform failed: {0}")]
    Platform(RadarError),

    /// Nothing left to upload after filtering
    #[error("no temporary exposure keys in the submission window")]
    NoKeysToSubmit,

    /// Registration server unreachable
    #[error("could not reach the registration server: {0}")]
    Transport(RadarError),

    /// Server did not recognise the processing number
    #[error("server rejected the processing number")]
    ServerRejected,

    /// Server failed or is unavailable
    #[error("registration server unavailable")]
    ServerUnavailable,

    /// Server refused the request body
    #[error("server refused the submitted data")]
    MalformedRequest,

    /// Status outside the protocol's table
    #[error("unexpected registration status {0}")]
    UnknownStatus(u16),

    /// Failed attempts reached the configured maximum
    #[error("exceeded {max} registration attempts")]
    RetryLimitExceeded {
        /// Configured maximum
        max: u32,
    },

    /// Another registration is still running
    #[error("a registration is already in progress")]
    AlreadyInFlight,

    /// Unexpected local failure (serialization, misconfiguration)
    #[error("registration failed: {0}")]
    Internal(RadarError),
}

impl RegistrationError {
    /// Map a non-accepted server outcome to its error.
    ///
    /// Returns `None` for [`SubmissionOutcome::Accepted`].
    pub fn from_outcome(outcome: SubmissionOutcome) -> Option<Self> {
        match outcome {
            SubmissionOutcome::Accepted => None,
            SubmissionOutcome::Rejected => Some(Self::ServerRejected),
            SubmissionOutcome::ServerError => Some(Self::ServerUnavailable),
            SubmissionOutcome::MalformedRequest => Some(Self::MalformedRequest),
            SubmissionOutcome::Unknown(status) => Some(Self::UnknownStatus(status)),
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Input,
            Self::PlatformDisabled | Self::Platform(_) | Self::NoKeysToSubmit => {
                ErrorCategory::Platform
            }
            Self::Transport(_) => ErrorCategory::Network,
            Self::ServerRejected
            | Self::ServerUnavailable
            | Self::MalformedRequest
            | Self::UnknownStatus(_) => ErrorCategory::Server,
            Self::UserCancelled
            | Self::RetryLimitExceeded { .. }
            | Self::AlreadyInFlight
            | Self::Internal(_) => ErrorCategory::Session,
        }
    }

    /// Whether this ending increments the failed-attempt counter.
    ///
    /// Cancelling, a disabled platform, a busy flow and the limit itself
    /// never count. Everything that reached validation or the server does.
    pub fn counts_as_failure(&self) -> bool {
        !matches!(
            self,
            Self::UserCancelled
                | Self::PlatformDisabled
                | Self::RetryLimitExceeded { .. }
                | Self::AlreadyInFlight
        )
    }

    /// Notice shown when the flow ends with this error.
    ///
    /// Server outcomes are announced by the result presenter, so they map to
    /// `None` here, as does `AlreadyInFlight` which is silent.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Self::UserCancelled => Some(Notice::Cancelled),
            Self::Validation(err) if err.is_empty() => Some(Notice::EmptyIdentifier),
            Self::Validation(_) => Some(Notice::MalformedIdentifier),
            Self::PlatformDisabled => Some(Notice::PlatformDisabled),
            Self::NoKeysToSubmit => Some(Notice::NoKeysFound),
            Self::Platform(_) | Self::Transport(_) | Self::Internal(_) => {
                Some(Notice::RegistrationFailed)
            }
            Self::RetryLimitExceeded { .. } => Some(Notice::AppWillClose),
            Self::ServerRejected
            | Self::ServerUnavailable
            | Self::MalformedRequest
            | Self::UnknownStatus(_)
            | Self::AlreadyInFlight => None,
        }
    }

    /// Short machine-readable code for logs and host bindings.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UserCancelled => "user_cancelled",
            Self::Validation(err) if err.is_empty() => "identifier_empty",
            Self::Validation(_) => "identifier_malformed",
            Self::PlatformDisabled => "platform_disabled",
            Self::Platform(_) => "platform_failed",
            Self::NoKeysToSubmit => "no_keys",
            Self::Transport(_) => "transport",
            Self::ServerRejected => "server_rejected",
            Self::ServerUnavailable => "server_unavailable",
            Self::MalformedRequest => "malformed_request",
            Self::UnknownStatus(_) => "unknown_status",
            Self::RetryLimitExceeded { .. } => "retry_limit",
            Self::AlreadyInFlight => "in_flight",
            Self::Internal(_) => "internal",
        }
    }
}
