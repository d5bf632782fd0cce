//! Registration Workflow - Portable Business Logic
//!
//! Drives one registration screen: confirmation, bounded retry with linear
//! back-off, identifier validation, platform checks, upload and result
//! presentation. All side effects go through [`RegistrationEffects`].
//!
//! ## Failed Attempts
//!
//! The flow counts failed attempts for the lifetime of the screen. Each
//! counted failure delays the next attempt by `failed * retry_delay_step_ms`;
//! reaching `max_error_count` closes the application instead of retrying.
//! An accepted submission resets the counter.
//!
//! ## Single Flight
//!
//! At most one registration runs per flow. A second call while one is in
//! progress returns [`RegistrationError::AlreadyInFlight`] without touching
//! any effect.

use crate::effects::RegistrationEffects;
use crate::errors::RegistrationError;
use crate::messages::{self, Notice, LOADING_REGISTERING};
use crate::workflows::form::{FormState, SymptomSelection, ViewFlags};
use crate::workflows::keys::filter_temporary_exposure_keys;
use crate::workflows::presenter::{present, FollowUpAction};
use crate::workflows::retry::RetryPolicy;
use crate::workflows::submission::SubmissionClient;
use async_lock::RwLock;
use chrono::NaiveDate;
use radar_core::types::{mask_identifier, ProcessingNumber, Route, SubmissionOutcome};
use radar_core::{RadarError, RegistrationConfig};
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of an accepted registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegistrationReport {
    /// Outcome per endpoint, in order
    pub outcomes: Vec<SubmissionOutcome>,
    /// Number of keys uploaded
    pub key_count: usize,
}

#[derive(Debug)]
struct FlowState {
    form: FormState,
    failed_attempts: u32,
}

/// Releases the in-flight flag when dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Registration screen state and workflow.
#[derive(Debug)]
pub struct RegistrationFlow {
    effects: RegistrationEffects,
    config: RegistrationConfig,
    client: SubmissionClient,
    retry: RetryPolicy,
    state: RwLock<FlowState>,
    in_flight: AtomicBool,
}

impl RegistrationFlow {
    /// Create a flow with an empty form dated `today`.
    pub fn new(effects: RegistrationEffects, config: RegistrationConfig, today: NaiveDate) -> Self {
        let client = SubmissionClient::new(
            effects.register.clone(),
            config.identifier_rules(),
            config.protocol,
        );
        Self {
            retry: RetryPolicy::from_config(&config),
            client,
            effects,
            config,
            state: RwLock::new(FlowState {
                form: FormState::new(today),
                failed_attempts: 0,
            }),
            in_flight: AtomicBool::new(false),
        }
    }

    // ------------------------------------------------------------------
    // Form
    // ------------------------------------------------------------------

    /// Prepare the screen, optionally from a deep link carrying the
    /// processing number.
    pub async fn initialize(&self, deep_link_processing_number: Option<String>) {
        let mut state = self.state.write().await;
        match deep_link_processing_number {
            Some(number) => {
                tracing::info!(identifier = %mask_identifier(&number), "opened from deep link");
                state.form.identifier = number;
                state.form.deep_link = true;
            }
            None => state.form.deep_link = false,
        }
    }

    /// Replace the typed processing number.
    pub async fn set_identifier(&self, identifier: impl Into<String>) {
        self.state.write().await.form.identifier = identifier.into();
    }

    /// Set the symptom onset or test date.
    pub async fn set_diagnosis_date(&self, date: NaiveDate) {
        self.state.write().await.form.diagnosis_date = date;
    }

    /// Apply a radio-button choice.
    pub async fn select_symptoms(&self, label: &str) -> SymptomSelection {
        let selection = SymptomSelection::from_label(label);
        self.state.write().await.form.selection = selection;
        selection
    }

    /// Snapshot of the form inputs.
    pub async fn form(&self) -> FormState {
        self.state.read().await.form.clone()
    }

    /// Current visibility and enablement flags.
    pub async fn view_flags(&self) -> ViewFlags {
        ViewFlags::derive(&self.state.read().await.form, &self.config.identifier_rules())
    }

    /// Failed attempts counted so far.
    pub async fn failed_attempts(&self) -> u32 {
        self.state.read().await.failed_attempts
    }

    /// Whether a registration is running.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------
    // Side links
    // ------------------------------------------------------------------

    /// Navigate to the consent page with the current processing number.
    pub async fn open_consent_page(&self) -> Result<(), RadarError> {
        let processing_number = self.form().await.identifier;
        self.effects
            .navigation
            .navigate(&Route::SubmitConsent { processing_number })
            .await
    }

    /// Open the dialer with the inquiry number, digits only.
    ///
    /// Dialer failures are logged and swallowed.
    pub async fn dial_inquiry_number(&self) {
        let digits: String = self
            .config
            .inquiry_phone_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if let Err(error) = self.effects.dialer.open_dialer(&digits).await {
            tracing::error!(%error, "failed to open the dialer");
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Run one user-initiated registration attempt.
    ///
    /// **What it does**: Confirms with the user, enforces the attempt cap
    /// and back-off, validates the form, then uploads and presents results.
    ///
    /// **Returns**: the report when any endpoint accepted the keys.
    #[tracing::instrument(skip_all, fields(attempt = tracing::field::Empty))]
    pub async fn register(&self) -> Result<RegistrationReport, RegistrationError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("registration already in progress");
            return Err(RegistrationError::AlreadyInFlight);
        };
        let dialogs = &self.effects.dialogs;

        if !dialogs.confirm(&messages::confirm_registration()).await {
            tracing::info!("registration cancelled by user");
            dialogs.alert(&Notice::Cancelled.alert()).await;
            return Err(RegistrationError::UserCancelled);
        }

        let failed = self.failed_attempts().await;
        if self.retry.is_exhausted(failed) {
            let max = self.retry.max_attempts();
            tracing::error!(failed, max, "registration attempts exhausted, closing");
            dialogs.alert(&Notice::AppWillClose.alert()).await;
            dialogs.hide_loading().await;
            self.effects.lifecycle.close_application().await;
            return Err(RegistrationError::RetryLimitExceeded { max });
        }

        tracing::Span::current().record("attempt", failed + 1);
        if let Some(delay_ms) = self.retry.delay_before(failed) {
            tracing::info!(failed, delay_ms, "waiting before retry");
            dialogs.alert(&Notice::RetryWait.alert()).await;
            self.effects.time.sleep_ms(delay_ms).await;
        }

        let result = self.attempt().await;
        self.record(&result).await;
        result
    }

    /// Resume after the user granted key-history access.
    ///
    /// Re-runs the upload with the current form, skipping confirmation and
    /// back-off.
    #[tracing::instrument(skip_all)]
    pub async fn on_tek_history_allowed(&self) -> Result<RegistrationReport, RegistrationError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::warn!("registration already in progress");
            return Err(RegistrationError::AlreadyInFlight);
        };

        let form = self.form().await;
        let result = match self.validate_identifier(&form.identifier).await {
            Ok(identifier) => self.upload(identifier, form.diagnosis_date).await,
            Err(err) => Err(err),
        };
        self.record(&result).await;
        result
    }

    async fn attempt(&self) -> Result<RegistrationReport, RegistrationError> {
        let form = self.form().await;
        let identifier = self.validate_identifier(&form.identifier).await?;

        match self.effects.exposure.is_enabled().await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("exposure notification disabled");
                self.effects.dialogs.alert(&Notice::PlatformDisabled.alert()).await;
                self.effects.dialogs.hide_loading().await;
                self.navigate(&Route::Home).await;
                return Err(RegistrationError::PlatformDisabled);
            }
            Err(error) => {
                let err = RegistrationError::Platform(error);
                self.announce(&err).await;
                return Err(err);
            }
        }

        self.upload(identifier, form.diagnosis_date).await
    }

    async fn validate_identifier(&self, raw: &str) -> Result<ProcessingNumber, RegistrationError> {
        match self.client.validate(raw) {
            Ok(identifier) => Ok(identifier),
            Err(err) => {
                tracing::warn!(code = err.code(), "processing number refused");
                self.announce(&err).await;
                Err(err)
            }
        }
    }

    /// Fetch, filter, submit and present, with loading shown throughout.
    async fn upload(
        &self,
        identifier: ProcessingNumber,
        diagnosis_date: NaiveDate,
    ) -> Result<RegistrationReport, RegistrationError> {
        self.effects.dialogs.show_loading(LOADING_REGISTERING).await;
        let submitted = self.fetch_and_submit(identifier, diagnosis_date).await;
        self.effects.dialogs.hide_loading().await;

        let (outcomes, key_count) = match submitted {
            Ok(submitted) => submitted,
            Err(err) => {
                tracing::error!(code = err.code(), error = %err, "registration failed");
                self.announce(&err).await;
                return Err(err);
            }
        };

        for outcome in &outcomes {
            self.show_result(*outcome).await;
        }

        if outcomes.iter().any(|o| o.is_accepted()) {
            return Ok(RegistrationReport {
                outcomes,
                key_count,
            });
        }
        Err(outcomes
            .iter()
            .find_map(|o| RegistrationError::from_outcome(*o))
            .unwrap_or(RegistrationError::UnknownStatus(0)))
    }

    async fn fetch_and_submit(
        &self,
        identifier: ProcessingNumber,
        diagnosis_date: NaiveDate,
    ) -> Result<(Vec<SubmissionOutcome>, usize), RegistrationError> {
        let keys = self
            .effects
            .exposure
            .temporary_exposure_key_history()
            .await
            .map_err(RegistrationError::Platform)?;
        tracing::info!(tek_count = keys.len(), "loaded key history");

        let keys =
            filter_temporary_exposure_keys(keys, diagnosis_date, self.config.days_to_send_tek)
                .map_err(RegistrationError::Internal)?;
        let key_count = keys.len();
        tracing::info!(filtered_count = key_count, "filtered key history");

        let outcomes = self
            .client
            .submit_validated(identifier, diagnosis_date, keys)
            .await?;
        Ok((outcomes, key_count))
    }

    async fn show_result(&self, outcome: SubmissionOutcome) {
        match outcome {
            SubmissionOutcome::Unknown(status) => {
                tracing::warn!(status, "unexpected registration status");
            }
            other => tracing::info!(outcome = %other, "registration result"),
        }

        let presentation = present(outcome);
        if let Some(notice) = presentation.notice {
            self.effects.dialogs.alert(&notice.alert()).await;
        }
        if presentation.action == FollowUpAction::NavigateHome {
            self.navigate(&Route::Home).await;
        }
    }

    async fn announce(&self, err: &RegistrationError) {
        if let Some(notice) = err.notice() {
            self.effects.dialogs.alert(&notice.alert()).await;
        }
    }

    async fn navigate(&self, route: &Route) {
        if let Err(error) = self.effects.navigation.navigate(route).await {
            tracing::error!(%error, path = route.path(), "navigation failed");
        }
    }

    async fn record(&self, result: &Result<RegistrationReport, RegistrationError>) {
        let mut state = self.state.write().await;
        match result {
            Ok(_) => state.failed_attempts = 0,
            Err(err) if err.counts_as_failure() => {
                state.failed_attempts = state.failed_attempts.saturating_add(1);
                tracing::info!(
                    failed_attempts = state.failed_attempts,
                    category = %err.category(),
                    "registration attempt failed"
                );
            }
            Err(_) => {}
        }
    }
}
