//! Effect interfaces
//!
//! Every collaborator the registration workflow talks to is one of these
//! traits. Production handlers live in `radar-effects`, frontend handlers in
//! each frontend, and deterministic mocks in `radar-testkit`.

pub mod exposure;
pub mod register;
pub mod time;
pub mod ui;

pub use exposure::ExposureNotificationEffects;
pub use register::DiagnosisKeyRegisterEffects;
pub use time::SleepEffects;
pub use ui::{DialogEffects, LifecycleEffects, NavigationEffects, PhoneDialerEffects};
