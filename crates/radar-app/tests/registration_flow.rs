//! Registration flow integration tests
//!
//! Drives `RegistrationFlow` end to end against `MockEffects`:
//! - Attempt cap and linear back-off
//! - Single-flight guard under concurrent taps
//! - Loading indicator hidden on every exit path
//! - Result presentation and failure accounting
//! - Submission over HTTPS with a failing mirror endpoint

use assert_matches::assert_matches;
use radar_app::{Notice, RegistrationEffects, RegistrationError, RegistrationFlow};
use radar_core::types::{Route, SubmissionOutcome};
use radar_core::{RadarError, RegistrationConfig, ServerConfig};
use radar_effects::HttpsDiagnosisKeyRegister;
use radar_testkit::{date_of_day, keys_on_days, EffectCall, MockEffects};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DIAGNOSIS_DAY: u32 = 18_659;

fn flow_with(mock: &Arc<MockEffects>, config: RegistrationConfig) -> RegistrationFlow {
    RegistrationFlow::new(
        RegistrationEffects::from_handler(mock.clone()),
        config,
        date_of_day(DIAGNOSIS_DAY),
    )
}

async fn ready_flow(mock: &Arc<MockEffects>) -> RegistrationFlow {
    mock.set_key_history(keys_on_days(&[18_650, 18_655]));
    let flow = flow_with(mock, RegistrationConfig::default());
    flow.set_identifier("12345678").await;
    flow.select_symptoms("Yes").await;
    flow
}

fn submit_count(mock: &MockEffects) -> usize {
    mock.submissions().len()
}

#[tokio::test]
async fn accepted_submission_shows_success_and_goes_home() {
    let mock = Arc::new(MockEffects::new());
    let flow = ready_flow(&mock).await;

    let report = flow.register().await.unwrap();
    assert_eq!(report.outcomes, vec![SubmissionOutcome::Accepted]);
    assert_eq!(report.key_count, 2);

    assert_eq!(mock.alert_titles(), vec![Notice::Submitted.title().to_string()]);
    assert_eq!(mock.navigations(), vec![Route::Home]);
    assert!(!mock.loading_visible());

    let calls = mock.calls();
    let shown = calls
        .iter()
        .position(|c| matches!(c, EffectCall::ShowLoading(_)))
        .unwrap();
    let hidden = calls
        .iter()
        .position(|c| matches!(c, EffectCall::HideLoading))
        .unwrap();
    let submitted = calls
        .iter()
        .position(|c| matches!(c, EffectCall::Submit(_)))
        .unwrap();
    assert!(shown < submitted && submitted < hidden);
}

#[tokio::test]
async fn cancelling_does_not_count() {
    let mock = Arc::new(MockEffects::new());
    mock.set_confirm(false);
    let flow = ready_flow(&mock).await;

    assert_eq!(flow.register().await.unwrap_err(), RegistrationError::UserCancelled);
    assert_eq!(flow.failed_attempts().await, 0);
    assert_eq!(mock.alert_titles(), vec![Notice::Cancelled.title().to_string()]);
    assert_eq!(submit_count(&mock), 0);
    assert!(mock.sleeps().is_empty());
}

#[tokio::test]
async fn retries_back_off_linearly_then_close_the_app() {
    let mock = Arc::new(MockEffects::new());
    mock.set_submit_response(Ok(vec![503]));
    let flow = ready_flow(&mock).await;

    for expected_failed in 1..=3 {
        assert_eq!(
            flow.register().await.unwrap_err(),
            RegistrationError::ServerUnavailable
        );
        assert_eq!(flow.failed_attempts().await, expected_failed);
    }
    assert_eq!(mock.sleeps(), vec![5_000, 10_000]);
    assert_eq!(submit_count(&mock), 3);

    mock.clear_calls();
    assert_eq!(
        flow.register().await.unwrap_err(),
        RegistrationError::RetryLimitExceeded { max: 3 }
    );
    assert!(mock.closed());
    assert!(!mock.loading_visible());
    assert_eq!(submit_count(&mock), 0);
    assert!(mock.sleeps().is_empty());
    assert_eq!(mock.alert_titles(), vec![Notice::AppWillClose.title().to_string()]);
}

#[tokio::test]
async fn wait_notice_precedes_the_delay() {
    let mock = Arc::new(MockEffects::new());
    mock.push_submit_response(Ok(vec![406]));
    let flow = ready_flow(&mock).await;

    assert_eq!(flow.register().await.unwrap_err(), RegistrationError::ServerRejected);
    mock.clear_calls();
    flow.register().await.unwrap();

    let calls = mock.calls();
    let wait = calls
        .iter()
        .position(|c| matches!(c, EffectCall::Alert(a) if a.title == Notice::RetryWait.title()))
        .unwrap();
    let sleep = calls.iter().position(|c| matches!(c, EffectCall::Sleep(5_000))).unwrap();
    let enabled = calls.iter().position(|c| matches!(c, EffectCall::IsEnabled)).unwrap();
    assert!(wait < sleep && sleep < enabled);
}

#[tokio::test]
async fn invalid_identifiers_count_without_touching_the_platform() {
    let mock = Arc::new(MockEffects::new());
    let flow = flow_with(&mock, RegistrationConfig::default());

    let err = flow.register().await.unwrap_err();
    assert_matches!(err, RegistrationError::Validation(e) if e.is_empty());

    flow.set_identifier("12ab5678").await;
    let err = flow.register().await.unwrap_err();
    assert_matches!(err, RegistrationError::Validation(_));

    assert_eq!(flow.failed_attempts().await, 2);
    assert!(!mock.calls().contains(&EffectCall::IsEnabled));
    let titles = mock.alert_titles();
    assert!(titles.contains(&Notice::EmptyIdentifier.title().to_string()));
    assert!(titles.contains(&Notice::MalformedIdentifier.title().to_string()));
}

#[tokio::test]
async fn disabled_platform_goes_home_without_counting() {
    let mock = Arc::new(MockEffects::new());
    mock.set_enabled(Ok(false));
    let flow = ready_flow(&mock).await;

    assert_eq!(flow.register().await.unwrap_err(), RegistrationError::PlatformDisabled);
    assert_eq!(flow.failed_attempts().await, 0);
    assert_eq!(mock.navigations(), vec![Route::Home]);
    assert!(mock.calls().contains(&EffectCall::HideLoading));
    assert_eq!(submit_count(&mock), 0);
}

#[tokio::test]
async fn platform_error_shows_generic_failure() {
    let mock = Arc::new(MockEffects::new());
    mock.set_enabled(Err(RadarError::platform("api unavailable")));
    let flow = ready_flow(&mock).await;

    assert_matches!(flow.register().await, Err(RegistrationError::Platform(_)));
    assert_eq!(flow.failed_attempts().await, 1);
    assert_eq!(
        mock.alert_titles(),
        vec![Notice::RegistrationFailed.title().to_string()]
    );
}

#[tokio::test]
async fn no_keys_in_window_is_reported_before_upload() {
    let mock = Arc::new(MockEffects::new());
    let flow = ready_flow(&mock).await;
    mock.set_key_history(keys_on_days(&[18_600, 18_700]));

    assert_eq!(flow.register().await.unwrap_err(), RegistrationError::NoKeysToSubmit);
    assert_eq!(flow.failed_attempts().await, 1);
    assert_eq!(submit_count(&mock), 0);
    assert!(!mock.loading_visible());
    assert_eq!(mock.alert_titles(), vec![Notice::NoKeysFound.title().to_string()]);
}

#[tokio::test]
async fn history_failure_hides_loading() {
    let mock = Arc::new(MockEffects::new());
    let flow = ready_flow(&mock).await;
    mock.fail_key_history(RadarError::platform("history denied"));

    assert_matches!(flow.register().await, Err(RegistrationError::Platform(_)));
    assert!(mock.calls().contains(&EffectCall::HideLoading));
    assert!(!mock.loading_visible());
}

#[tokio::test]
async fn transport_failure_is_counted_and_announced() {
    let mock = Arc::new(MockEffects::new());
    mock.push_submit_response(Err(RadarError::transport("connection refused")));
    let flow = ready_flow(&mock).await;

    assert_matches!(flow.register().await, Err(RegistrationError::Transport(_)));
    assert_eq!(flow.failed_attempts().await, 1);
    assert!(!mock.loading_visible());
    assert_eq!(
        mock.alert_titles(),
        vec![Notice::RegistrationFailed.title().to_string()]
    );
}

#[tokio::test]
async fn unknown_status_is_logged_only() {
    let mock = Arc::new(MockEffects::new());
    mock.push_submit_response(Ok(vec![302]));
    let flow = ready_flow(&mock).await;

    assert_eq!(flow.register().await.unwrap_err(), RegistrationError::UnknownStatus(302));
    assert!(mock.alerts().is_empty());
    assert!(mock.navigations().is_empty());
    assert_eq!(flow.failed_attempts().await, 1);
}

#[tokio::test]
async fn every_endpoint_result_is_presented() {
    let mock = Arc::new(MockEffects::new());
    mock.push_submit_response(Ok(vec![406, 200]));
    let flow = ready_flow(&mock).await;

    let report = flow.register().await.unwrap();
    assert_eq!(
        report.outcomes,
        vec![SubmissionOutcome::Rejected, SubmissionOutcome::Accepted]
    );
    assert_eq!(
        mock.alert_titles(),
        vec![
            Notice::IdentifierIncorrect.title().to_string(),
            Notice::Submitted.title().to_string(),
        ]
    );
    assert_eq!(flow.failed_attempts().await, 0);
}

#[tokio::test]
async fn unreachable_mirror_does_not_undo_acceptance() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/diagnosis"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = RegistrationConfig::default();
    let register = HttpsDiagnosisKeyRegister::new(
        &ServerConfig {
            endpoints: vec![
                format!("{}/diagnosis", server.uri()),
                "http://127.0.0.1:1/mirror".to_string(),
            ],
            ..ServerConfig::default()
        },
        config.protocol,
    )
    .unwrap();

    let mock = Arc::new(MockEffects::new());
    mock.set_key_history(keys_on_days(&[18_650, 18_655]));
    let effects = RegistrationEffects {
        register: Arc::new(register),
        ..RegistrationEffects::from_handler(mock.clone())
    };
    let flow = RegistrationFlow::new(effects, config, date_of_day(DIAGNOSIS_DAY));
    flow.set_identifier("12345678").await;
    flow.select_symptoms("Yes").await;

    let report = flow.register().await.unwrap();
    assert_eq!(report.outcomes, vec![SubmissionOutcome::Accepted]);
    assert_eq!(flow.failed_attempts().await, 0);
    assert_eq!(mock.alert_titles(), vec![Notice::Submitted.title().to_string()]);
    assert_eq!(mock.navigations(), vec![Route::Home]);
    assert!(!mock.loading_visible());
}

#[tokio::test]
async fn navigation_failure_after_acceptance_keeps_success() {
    let mock = Arc::new(MockEffects::new());
    mock.fail_navigation(RadarError::platform("no navigator"));
    let flow = ready_flow(&mock).await;

    let report = flow.register().await.unwrap();
    assert_eq!(report.outcomes, vec![SubmissionOutcome::Accepted]);
    assert_eq!(flow.failed_attempts().await, 0);
    assert_eq!(mock.navigations(), vec![Route::Home]);
    assert_eq!(mock.alert_titles(), vec![Notice::Submitted.title().to_string()]);
    assert!(!mock.loading_visible());
}

#[tokio::test]
async fn closed_window_keeps_both_ends() {
    let mock = Arc::new(MockEffects::new());
    mock.set_key_history(keys_on_days(&[100, 105, 111]));
    let config = RegistrationConfig {
        days_to_send_tek: 5,
        ..RegistrationConfig::default()
    };
    let flow = flow_with(&mock, config);
    flow.set_identifier("12345678").await;
    flow.set_diagnosis_date(date_of_day(105)).await;

    flow.register().await.unwrap();
    let submissions = mock.submissions();
    let days: Vec<_> = submissions[0]
        .keys
        .iter()
        .map(|k| k.day_number().value())
        .collect();
    assert_eq!(days, vec![100, 105]);
    assert_eq!(submissions[0].diagnosis_date, date_of_day(105));
}

#[tokio::test]
async fn second_tap_while_in_flight_is_refused() {
    let mock = Arc::new(MockEffects::new());
    let gate = mock.hold_submissions();
    let flow = ready_flow(&mock).await;

    let (first, second) = futures::join!(flow.register(), async {
        gate.entered().await;
        assert!(flow.is_in_flight());
        let calls_before = mock.calls().len();
        let second = flow.register().await;
        assert_eq!(mock.calls().len(), calls_before);
        gate.release();
        second
    });

    assert!(first.is_ok());
    assert_eq!(second.unwrap_err(), RegistrationError::AlreadyInFlight);
    assert!(!flow.is_in_flight());
    assert_eq!(submit_count(&mock), 1);
}

#[tokio::test]
async fn guard_is_released_after_errors() {
    let mock = Arc::new(MockEffects::new());
    mock.push_confirm(false);
    let flow = ready_flow(&mock).await;

    assert!(flow.register().await.is_err());
    assert!(!flow.is_in_flight());
    assert!(flow.register().await.is_ok());
}

#[tokio::test]
async fn history_allowed_resumes_without_confirmation() {
    let mock = Arc::new(MockEffects::new());
    let flow = ready_flow(&mock).await;

    let report = flow.on_tek_history_allowed().await.unwrap();
    assert_eq!(report.outcomes, vec![SubmissionOutcome::Accepted]);
    assert!(!mock
        .calls()
        .iter()
        .any(|c| matches!(c, EffectCall::Confirm(_) | EffectCall::Sleep(_))));
    assert_eq!(submit_count(&mock), 1);
}
