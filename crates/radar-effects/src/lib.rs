//! # Radar Effects - Layer 3: Production Handlers
//!
//! Stateless production implementations of the effect traits defined in
//! `radar-core`:
//!
//! - [`HttpsDiagnosisKeyRegister`]: reqwest client for the registration server
//! - [`RealTimeHandler`]: tokio-backed cooperative sleep
//! - [`FileExposureNotification`]: key history from a JSON file
//!
//! **Layer Constraint**: no mock handlers here; those belong in
//! `radar-testkit`.

#![forbid(unsafe_code)]

pub mod exposure;
pub mod register;
pub mod time;

pub use exposure::FileExposureNotification;
pub use register::{HttpsDiagnosisKeyRegister, IDEMPOTENCY_HEADER};
pub use time::RealTimeHandler;
