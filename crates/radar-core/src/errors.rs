//! Unified error system for Radar core
//!
//! A single error type shared by every effect interface. Workflow-level
//! taxonomies (what the user is told) live in `radar-app`; this type only
//! says which collaborator failed and why.

use serde::{Deserialize, Serialize};

/// Unified error type for all Radar effect operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RadarError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Config error: {message}")]
    Config {
        /// Error message describing the configuration problem
        message: String,
    },

    /// The platform exposure-notification API reported a failure
    #[error("Platform error: {message}")]
    Platform {
        /// Error message reported by the platform
        message: String,
    },

    /// Network or transport error
    #[error("Transport error: {message}")]
    Transport {
        /// Error message describing the transport issue
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl RadarError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a platform error
    pub fn platform(message: impl Into<String>) -> Self {
        Self::Platform {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether this error came from the network layer rather than the server's answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

/// Standard Result type for Radar operations
pub type Result<T> = std::result::Result<T, RadarError>;

impl From<serde_json::Error> for RadarError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RadarError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<std::io::Error> for RadarError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                Self::invalid(err.to_string())
            }
            _ => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = RadarError::invalid("test message");
        assert!(matches!(err, RadarError::Invalid { .. }));
        assert_eq!(err.to_string(), "Invalid: test message");
    }

    #[test]
    fn test_transport_is_distinct() {
        assert!(RadarError::transport("connection reset").is_transport());
        assert!(!RadarError::platform("disabled").is_transport());
        assert!(!RadarError::internal("bug").is_transport());
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = RadarError::from(io_err);
        assert!(matches!(err, RadarError::Invalid { .. }));

        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(matches!(
            RadarError::from(json_err),
            RadarError::Serialization { .. }
        ));
    }

    #[test]
    fn test_result_type() {
        fn test_function() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(test_function().unwrap(), 42);
    }
}
