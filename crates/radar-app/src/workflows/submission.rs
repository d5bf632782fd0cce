//! Submission Client Workflow
//!
//! Validates the processing number, packages the filtered keys into a
//! [`DiagnosisSubmission`] and classifies the server's answers. Validation
//! and empty-key checks happen before the register handler is touched.

use crate::errors::RegistrationError;
use chrono::NaiveDate;
use radar_core::effects::DiagnosisKeyRegisterEffects;
use radar_core::types::{
    DiagnosisSubmission, IdentifierRules, ProcessingNumber, SubmissionOutcome, SubmissionProtocol,
    TemporaryExposureKey,
};
use radar_core::RadarError;
use std::sync::Arc;

/// Uploads diagnosis keys through a register handler.
#[derive(Clone)]
pub struct SubmissionClient {
    register: Arc<dyn DiagnosisKeyRegisterEffects>,
    rules: IdentifierRules,
    protocol: SubmissionProtocol,
}

impl std::fmt::Debug for SubmissionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionClient")
            .field("rules", &self.rules)
            .field("protocol", &self.protocol)
            .finish_non_exhaustive()
    }
}

impl SubmissionClient {
    /// Create a client.
    pub fn new(
        register: Arc<dyn DiagnosisKeyRegisterEffects>,
        rules: IdentifierRules,
        protocol: SubmissionProtocol,
    ) -> Self {
        Self {
            register,
            rules,
            protocol,
        }
    }

    /// Protocol version used to classify statuses.
    pub fn protocol(&self) -> SubmissionProtocol {
        self.protocol
    }

    /// Check a raw identifier against the configured rules.
    pub fn validate(&self, raw: &str) -> Result<ProcessingNumber, RegistrationError> {
        Ok(ProcessingNumber::parse(raw, &self.rules)?)
    }

    /// Validate `identifier` and upload `keys`.
    ///
    /// Returns one outcome per status the handler reported.
    pub async fn submit(
        &self,
        keys: Vec<TemporaryExposureKey>,
        identifier: &str,
        diagnosis_date: NaiveDate,
    ) -> Result<Vec<SubmissionOutcome>, RegistrationError> {
        let identifier = self.validate(identifier)?;
        self.submit_validated(identifier, diagnosis_date, keys).await
    }

    /// Upload `keys` under an already validated identifier.
    ///
    /// A fresh idempotency key is generated for every call.
    pub async fn submit_validated(
        &self,
        identifier: ProcessingNumber,
        diagnosis_date: NaiveDate,
        keys: Vec<TemporaryExposureKey>,
    ) -> Result<Vec<SubmissionOutcome>, RegistrationError> {
        if keys.is_empty() {
            return Err(RegistrationError::NoKeysToSubmit);
        }

        let submission = DiagnosisSubmission::new(identifier, diagnosis_date, keys);
        tracing::debug!(
            idempotency_key = %submission.idempotency_key,
            key_count = submission.keys.len(),
            "built diagnosis submission"
        );

        let statuses = self
            .register
            .submit_diagnosis_keys(&submission)
            .await
            .map_err(classify_register_error)?;

        if statuses.is_empty() {
            return Err(RegistrationError::Internal(RadarError::internal(
                "Register handler reported no status",
            )));
        }

        Ok(statuses
            .into_iter()
            .map(|status| SubmissionOutcome::from_status(status, self.protocol))
            .collect())
    }
}

fn classify_register_error(err: RadarError) -> RegistrationError {
    if err.is_transport() {
        RegistrationError::Transport(err)
    } else {
        RegistrationError::Internal(err)
    }
}
