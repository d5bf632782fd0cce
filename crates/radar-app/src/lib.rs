//! # Radar App - Portable Registration Core
//!
//! Headless core of the diagnosis-key registration screen: the key filter,
//! the submission client, the result presenter and the registration flow
//! that ties them together.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use radar_app::{RegistrationEffects, RegistrationFlow};
//!
//! let flow = RegistrationFlow::new(effects, config.registration, today);
//! flow.set_identifier("12345678").await;
//! flow.select_symptoms("Yes").await;
//! let report = flow.register().await?;
//! ```

#![forbid(unsafe_code)]

pub mod effects;
pub mod errors;
pub mod messages;
pub mod workflows;

pub use effects::RegistrationEffects;
pub use errors::{ErrorCategory, RegistrationError};
pub use messages::Notice;
pub use workflows::{
    filter_temporary_exposure_keys, present, FollowUpAction, FormState, Presentation,
    RegistrationFlow, RegistrationReport, RetryPolicy, SubmissionClient, SymptomSelection,
    ViewFlags,
};
