//! # Radar Core - Layer 1: Foundation
//!
//! Domain types, the unified error type, effect interfaces and configuration
//! for diagnosis key registration.
//!
//! **Purpose**: Define what the registration workflow talks to without
//! deciding how. No runtime, network client or UI toolkit is referenced here.
//!
//! - **Types**: temporary exposure keys, processing numbers, submissions,
//!   outcomes, dialog and navigation payloads
//! - **Effects**: platform, registration server, dialogs, navigation,
//!   lifecycle, dialer, time
//! - **Config**: TOML + environment configuration with validation

#![forbid(unsafe_code)]

pub mod config;
pub mod effects;
pub mod errors;
pub mod types;

pub use config::{RadarConfig, RegistrationConfig, ServerConfig};
pub use errors::{RadarError, Result};
pub use types::{
    DayNumber, DiagnosisSubmission, ProcessingNumber, SubmissionOutcome, SubmissionProtocol,
    TemporaryExposureKey,
};
