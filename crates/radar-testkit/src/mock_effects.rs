//! Mock effects implementation for workflow testing
//!
//! `MockEffects` implements every Radar effect trait with scripted,
//! deterministic behaviour and records each call in one ordered log, so
//! tests can assert both what happened and in which order.
//!
//! # Blocking Lock Usage
//!
//! Uses `std::sync::Mutex` because this is test infrastructure: the lock is
//! never held across an await point and contention is not a concern.

use async_trait::async_trait;
use radar_core::effects::{
    DiagnosisKeyRegisterEffects, DialogEffects, ExposureNotificationEffects, LifecycleEffects,
    NavigationEffects, PhoneDialerEffects, SleepEffects,
};
use radar_core::types::{
    Alert, Confirmation, DiagnosisSubmission, Route, TemporaryExposureKey,
};
use radar_core::RadarError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// One recorded effect call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectCall {
    /// `DialogEffects::confirm`
    Confirm(Confirmation),
    /// `DialogEffects::alert`
    Alert(Alert),
    /// `DialogEffects::show_loading`
    ShowLoading(String),
    /// `DialogEffects::hide_loading`
    HideLoading,
    /// `NavigationEffects::navigate`
    Navigate(Route),
    /// `LifecycleEffects::close_application`
    CloseApplication,
    /// `PhoneDialerEffects::open_dialer`
    Dial(String),
    /// `SleepEffects::sleep_ms`
    Sleep(u64),
    /// `ExposureNotificationEffects::is_enabled`
    IsEnabled,
    /// `ExposureNotificationEffects::temporary_exposure_key_history`
    KeyHistory,
    /// `DiagnosisKeyRegisterEffects::submit_diagnosis_keys`
    Submit(DiagnosisSubmission),
}

#[derive(Debug)]
struct MockState {
    calls: Vec<EffectCall>,
    confirm_responses: VecDeque<bool>,
    default_confirm: bool,
    enabled: Result<bool, RadarError>,
    key_history: Result<Vec<TemporaryExposureKey>, RadarError>,
    submit_responses: VecDeque<Result<Vec<u16>, RadarError>>,
    default_submit: Result<Vec<u16>, RadarError>,
    navigation_error: Option<RadarError>,
    dialer_error: Option<RadarError>,
    loading_visible: bool,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            confirm_responses: VecDeque::new(),
            default_confirm: true,
            enabled: Ok(true),
            key_history: Ok(Vec::new()),
            submit_responses: VecDeque::new(),
            default_submit: Ok(vec![200]),
            navigation_error: None,
            dialer_error: None,
            loading_visible: false,
        }
    }
}

/// Pauses submissions until the test releases them.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl SubmissionGate {
    /// Wait until a submission has reached the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the waiting submission continue.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// Mock effects for deterministic workflow tests
///
/// Defaults: confirmations accepted, platform enabled, empty key history,
/// every submission answered with `[200]`.
#[derive(Debug, Clone, Default)]
pub struct MockEffects {
    state: Arc<Mutex<MockState>>,
    gate: Arc<Mutex<Option<SubmissionGate>>>,
}

impl MockEffects {
    /// Create mock effects with default behaviour.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    fn record(&self, call: EffectCall) {
        self.with_state(|state| state.calls.push(call));
    }

    // ------------------------------------------------------------------
    // Scripting
    // ------------------------------------------------------------------

    /// Answer every confirmation with `accept` once the queue is empty.
    pub fn set_confirm(&self, accept: bool) -> &Self {
        self.with_state(|state| state.default_confirm = accept);
        self
    }

    /// Queue one confirmation answer.
    pub fn push_confirm(&self, accept: bool) -> &Self {
        self.with_state(|state| state.confirm_responses.push_back(accept));
        self
    }

    /// Set the platform enablement answer.
    pub fn set_enabled(&self, enabled: Result<bool, RadarError>) -> &Self {
        self.with_state(|state| state.enabled = enabled);
        self
    }

    /// Set the key history answer.
    pub fn set_key_history(&self, keys: Vec<TemporaryExposureKey>) -> &Self {
        self.with_state(|state| state.key_history = Ok(keys));
        self
    }

    /// Make key history retrieval fail.
    pub fn fail_key_history(&self, error: RadarError) -> &Self {
        self.with_state(|state| state.key_history = Err(error));
        self
    }

    /// Queue one submission answer.
    pub fn push_submit_response(&self, response: Result<Vec<u16>, RadarError>) -> &Self {
        self.with_state(|state| state.submit_responses.push_back(response));
        self
    }

    /// Answer every submission with `response` once the queue is empty.
    pub fn set_submit_response(&self, response: Result<Vec<u16>, RadarError>) -> &Self {
        self.with_state(|state| state.default_submit = response);
        self
    }

    /// Make navigation fail.
    pub fn fail_navigation(&self, error: RadarError) -> &Self {
        self.with_state(|state| state.navigation_error = Some(error));
        self
    }

    /// Make the dialer fail.
    pub fn fail_dialer(&self, error: RadarError) -> &Self {
        self.with_state(|state| state.dialer_error = Some(error));
        self
    }

    /// Hold every following submission at a gate.
    pub fn hold_submissions(&self) -> SubmissionGate {
        let gate = SubmissionGate::default();
        *self.gate.lock().unwrap_or_else(|e| e.into_inner()) = Some(gate.clone());
        gate
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<EffectCall> {
        self.with_state(|state| state.calls.clone())
    }

    /// Forget recorded calls, keeping the script.
    pub fn clear_calls(&self) {
        self.with_state(|state| state.calls.clear());
    }

    /// Alerts shown, in order.
    pub fn alerts(&self) -> Vec<Alert> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EffectCall::Alert(alert) => Some(alert),
                _ => None,
            })
            .collect()
    }

    /// Alert titles shown, in order.
    pub fn alert_titles(&self) -> Vec<String> {
        self.alerts().into_iter().map(|alert| alert.title).collect()
    }

    /// Routes navigated to, in order.
    pub fn navigations(&self) -> Vec<Route> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EffectCall::Navigate(route) => Some(route),
                _ => None,
            })
            .collect()
    }

    /// Sleep durations requested, in order.
    pub fn sleeps(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EffectCall::Sleep(ms) => Some(ms),
                _ => None,
            })
            .collect()
    }

    /// Submissions received, in order.
    pub fn submissions(&self) -> Vec<DiagnosisSubmission> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EffectCall::Submit(submission) => Some(submission),
                _ => None,
            })
            .collect()
    }

    /// Numbers passed to the dialer, in order.
    pub fn dialed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                EffectCall::Dial(number) => Some(number),
                _ => None,
            })
            .collect()
    }

    /// Whether the application was asked to close.
    pub fn closed(&self) -> bool {
        self.calls().contains(&EffectCall::CloseApplication)
    }

    /// Whether a loading indicator is still up.
    pub fn loading_visible(&self) -> bool {
        self.with_state(|state| state.loading_visible)
    }
}

#[async_trait]
impl DialogEffects for MockEffects {
    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        self.with_state(|state| {
            state.calls.push(EffectCall::Confirm(confirmation.clone()));
            state
                .confirm_responses
                .pop_front()
                .unwrap_or(state.default_confirm)
        })
    }

    async fn alert(&self, alert: &Alert) {
        self.record(EffectCall::Alert(alert.clone()));
    }

    async fn show_loading(&self, text: &str) {
        self.with_state(|state| {
            state.calls.push(EffectCall::ShowLoading(text.to_string()));
            state.loading_visible = true;
        });
    }

    async fn hide_loading(&self) {
        self.with_state(|state| {
            state.calls.push(EffectCall::HideLoading);
            state.loading_visible = false;
        });
    }
}

#[async_trait]
impl NavigationEffects for MockEffects {
    async fn navigate(&self, route: &Route) -> Result<(), RadarError> {
        self.with_state(|state| {
            state.calls.push(EffectCall::Navigate(route.clone()));
            match &state.navigation_error {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        })
    }
}

#[async_trait]
impl LifecycleEffects for MockEffects {
    async fn close_application(&self) {
        self.record(EffectCall::CloseApplication);
    }
}

#[async_trait]
impl PhoneDialerEffects for MockEffects {
    async fn open_dialer(&self, number: &str) -> Result<(), RadarError> {
        self.with_state(|state| {
            state.calls.push(EffectCall::Dial(number.to_string()));
            match &state.dialer_error {
                Some(error) => Err(error.clone()),
                None => Ok(()),
            }
        })
    }
}

#[async_trait]
impl SleepEffects for MockEffects {
    async fn sleep_ms(&self, ms: u64) {
        self.record(EffectCall::Sleep(ms));
    }
}

#[async_trait]
impl ExposureNotificationEffects for MockEffects {
    async fn is_enabled(&self) -> Result<bool, RadarError> {
        self.with_state(|state| {
            state.calls.push(EffectCall::IsEnabled);
            state.enabled.clone()
        })
    }

    async fn temporary_exposure_key_history(
        &self,
    ) -> Result<Vec<TemporaryExposureKey>, RadarError> {
        self.with_state(|state| {
            state.calls.push(EffectCall::KeyHistory);
            state.key_history.clone()
        })
    }
}

#[async_trait]
impl DiagnosisKeyRegisterEffects for MockEffects {
    async fn submit_diagnosis_keys(
        &self,
        submission: &DiagnosisSubmission,
    ) -> Result<Vec<u16>, RadarError> {
        let response = self.with_state(|state| {
            state.calls.push(EffectCall::Submit(submission.clone()));
            state
                .submit_responses
                .pop_front()
                .unwrap_or_else(|| state.default_submit.clone())
        });

        let gate = self.gate.lock().unwrap_or_else(|e| e.into_inner()).clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_queue_then_default() {
        let mock = MockEffects::new();
        mock.push_confirm(false).set_confirm(true);

        let question = Confirmation::default();
        assert!(!mock.confirm(&question).await);
        assert!(mock.confirm(&question).await);
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_queue_then_default() {
        let mock = MockEffects::new();
        mock.push_submit_response(Ok(vec![406]));

        let submission = crate::fixtures::submission("12345678", Vec::new());
        assert_eq!(mock.submit_diagnosis_keys(&submission).await.unwrap(), vec![406]);
        assert_eq!(mock.submit_diagnosis_keys(&submission).await.unwrap(), vec![200]);
        assert_eq!(mock.submissions().len(), 2);
    }

    #[tokio::test]
    async fn test_loading_tracking() {
        let mock = MockEffects::new();
        mock.show_loading("working").await;
        assert!(mock.loading_visible());
        mock.hide_loading().await;
        assert!(!mock.loading_visible());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_gate_holds_submission() {
        let mock = MockEffects::new();
        let gate = mock.hold_submissions();
        let submission = crate::fixtures::submission("12345678", Vec::new());

        let task = {
            let mock = mock.clone();
            tokio::spawn(async move { mock.submit_diagnosis_keys(&submission).await })
        };

        gate.entered().await;
        assert!(!task.is_finished());
        gate.release();
        assert_eq!(task.await.unwrap().unwrap(), vec![200]);
    }
}
