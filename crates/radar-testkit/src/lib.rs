//! # Radar Testkit - Layer 8: Test Infrastructure
//!
//! Deterministic mock effects and fixtures shared by the workspace's tests.
//! Nothing in here is meant for production builds.

#![allow(clippy::unwrap_used)]

pub mod fixtures;
pub mod mock_effects;

pub use fixtures::{date_of_day, key_on_day, keys_on_days};
pub use mock_effects::{EffectCall, MockEffects, SubmissionGate};
