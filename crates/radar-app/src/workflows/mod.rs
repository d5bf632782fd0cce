//! # Workflows - Portable Business Logic
//!
//! Registration logic shared by every frontend (CLI, mobile hosts).
//!
//! ## Architecture
//!
//! Workflows follow the "what to do" / "how to display it" separation:
//! - **Workflows (radar-app)**: decide what happens and what is said
//! - **Handlers (frontends, radar-effects)**: render dialogs, talk to the
//!   platform and the network
//!
//! Pure pieces ([`keys`], [`presenter`], [`form`], [`retry`]) have no effects.
//! [`submission`] and [`registration`] call effects only through traits.

pub mod form;
pub mod keys;
pub mod presenter;
pub mod registration;
pub mod retry;
pub mod submission;

pub use form::{FormState, SymptomSelection, ViewFlags};
pub use keys::{filter_temporary_exposure_keys, KeyWindow};
pub use presenter::{present, FollowUpAction, Presentation};
pub use registration::{RegistrationFlow, RegistrationReport};
pub use retry::RetryPolicy;
pub use submission::SubmissionClient;
