//! Registration server handlers

pub mod https;

pub use https::{HttpsDiagnosisKeyRegister, IDEMPOTENCY_HEADER};
