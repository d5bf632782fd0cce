//! Diagnosis key registration effects
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `radar-effects` (HTTPS)
//! - **Usage**: submission client in `radar-app`
//!
//! Handlers transmit one attempt and report raw HTTP statuses. Mapping a
//! status to an outcome, validating the identifier and retrying are the
//! caller's job.

use crate::types::DiagnosisSubmission;
use crate::RadarError;
use async_trait::async_trait;
use std::sync::Arc;

/// Upload of diagnosis keys to the registration server.
#[async_trait]
pub trait DiagnosisKeyRegisterEffects: Send + Sync {
    /// Submit one attempt.
    ///
    /// Returns one status per endpoint contacted, in endpoint order. A
    /// failure to reach the server is `RadarError::Transport`, never a status.
    async fn submit_diagnosis_keys(
        &self,
        submission: &DiagnosisSubmission,
    ) -> Result<Vec<u16>, RadarError>;
}

/// Blanket implementation for Arc<T> where T: DiagnosisKeyRegisterEffects
#[async_trait]
impl<T: DiagnosisKeyRegisterEffects + ?Sized> DiagnosisKeyRegisterEffects for Arc<T> {
    async fn submit_diagnosis_keys(
        &self,
        submission: &DiagnosisSubmission,
    ) -> Result<Vec<u16>, RadarError> {
        (**self).submit_diagnosis_keys(submission).await
    }
}
