//! HTTPS registration handler for diagnosis key submission

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use radar_core::effects::DiagnosisKeyRegisterEffects;
use radar_core::types::{DiagnosisSubmission, SubmissionProtocol, TemporaryExposureKey};
use radar_core::{RadarError, ServerConfig};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Header duplicating the body's idempotency token.
pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";

/// Key as the registration server expects it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireKey {
    key_data: String,
    rolling_start_number: u32,
    rolling_period: u32,
    transmission_risk: u8,
}

impl From<&TemporaryExposureKey> for WireKey {
    fn from(key: &TemporaryExposureKey) -> Self {
        Self {
            key_data: STANDARD.encode(key.key_data()),
            rolling_start_number: key.rolling_start_interval_number(),
            rolling_period: key.rolling_period(),
            transmission_risk: key.transmission_risk_level(),
        }
    }
}

/// Static request fields taken from configuration.
#[derive(Debug, Clone)]
struct RequestContext {
    protocol: SubmissionProtocol,
    regions: Vec<String>,
    platform: String,
    app_package_name: String,
}

/// Build the JSON body for one submission.
///
/// The identifier goes under the protocol's own field name; every other
/// field is shared by both protocol versions.
fn build_request_body(
    submission: &DiagnosisSubmission,
    context: &RequestContext,
) -> Result<serde_json::Value, RadarError> {
    let keys: Vec<WireKey> = submission.keys.iter().map(WireKey::from).collect();

    let mut body = serde_json::Map::new();
    body.insert("keys".to_string(), serde_json::to_value(keys)?);
    body.insert(
        context.protocol.identifier_field().to_string(),
        serde_json::Value::String(submission.identifier.as_str().to_string()),
    );
    body.insert(
        "symptomOnsetDate".to_string(),
        serde_json::Value::String(submission.diagnosis_date.format("%Y-%m-%d").to_string()),
    );
    body.insert(
        "idempotencyKey".to_string(),
        serde_json::Value::String(submission.idempotency_key.to_string()),
    );
    body.insert("regions".to_string(), serde_json::to_value(&context.regions)?);
    body.insert(
        "platform".to_string(),
        serde_json::Value::String(context.platform.clone()),
    );
    body.insert(
        "appPackageName".to_string(),
        serde_json::Value::String(context.app_package_name.clone()),
    );
    Ok(serde_json::Value::Object(body))
}

/// HTTPS transport for diagnosis key registration
///
/// Posts each submission to every configured endpoint in order and reports
/// one status per endpoint that answered. Production configurations carry a
/// single endpoint; additional endpoints mirror submissions to debug servers.
/// Unreachable endpoints are logged and skipped; a transport error is
/// returned only when none answered.
#[derive(Debug, Clone)]
pub struct HttpsDiagnosisKeyRegister {
    client: reqwest::Client,
    endpoints: Vec<Url>,
    context: RequestContext,
}

impl HttpsDiagnosisKeyRegister {
    /// Create a handler from server configuration.
    pub fn new(server: &ServerConfig, protocol: SubmissionProtocol) -> Result<Self, RadarError> {
        let endpoints = server
            .endpoints
            .iter()
            .map(|endpoint| {
                Url::parse(endpoint)
                    .map_err(|e| RadarError::config(format!("Invalid endpoint {endpoint}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if endpoints.is_empty() {
            return Err(RadarError::config("No registration endpoint configured"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()
            .map_err(|e| RadarError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoints,
            context: RequestContext {
                protocol,
                regions: server.regions.clone(),
                platform: server.platform.clone(),
                app_package_name: server.app_package_name.clone(),
            },
        })
    }

    /// Configured endpoints.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    async fn post(
        &self,
        endpoint: &Url,
        body: &serde_json::Value,
        token: &str,
    ) -> Result<u16, RadarError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header(IDEMPOTENCY_HEADER, token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    "timed out"
                } else if e.is_connect() {
                    "connection failed"
                } else {
                    "request failed"
                };
                RadarError::transport(format!("Registration {kind} for {endpoint}: {e}"))
            })?;

        let status = response.status().as_u16();
        tracing::debug!(%endpoint, status, "registration server responded");
        Ok(status)
    }
}

#[async_trait]
impl DiagnosisKeyRegisterEffects for HttpsDiagnosisKeyRegister {
    async fn submit_diagnosis_keys(
        &self,
        submission: &DiagnosisSubmission,
    ) -> Result<Vec<u16>, RadarError> {
        let body = build_request_body(submission, &self.context)?;
        let token = submission.idempotency_key.to_string();

        tracing::info!(
            key_count = submission.keys.len(),
            endpoints = self.endpoints.len(),
            protocol = %self.context.protocol,
            identifier = %submission.identifier.masked(),
            "submitting diagnosis keys"
        );

        // A failing endpoint does not discard answers already received; the
        // call only fails when no endpoint answered at all.
        let mut statuses = Vec::with_capacity(self.endpoints.len());
        let mut first_error = None;
        for endpoint in &self.endpoints {
            match self.post(endpoint, &body, &token).await {
                Ok(status) => statuses.push(status),
                Err(error) => {
                    tracing::warn!(%endpoint, %error, "registration endpoint unreachable");
                    first_error.get_or_insert(error);
                }
            }
        }

        match first_error {
            Some(error) if statuses.is_empty() => Err(error),
            _ => Ok(statuses),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use radar_core::types::{IdentifierRules, ProcessingNumber};
    use wiremock::matchers::{body_partial_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn submission() -> DiagnosisSubmission {
        let identifier = ProcessingNumber::parse("12345678", &IdentifierRules::default()).unwrap();
        DiagnosisSubmission::new(
            identifier,
            NaiveDate::from_ymd_opt(2021, 2, 3).unwrap(),
            vec![
                TemporaryExposureKey::for_day(vec![0u8; 16], 18_660, 4),
                TemporaryExposureKey::for_day(vec![1u8; 16], 18_661, 4),
            ],
        )
    }

    fn server_config(endpoints: Vec<String>) -> ServerConfig {
        ServerConfig {
            endpoints,
            ..ServerConfig::default()
        }
    }

    #[test]
    fn test_body_uses_protocol_field() {
        let context = RequestContext {
            protocol: SubmissionProtocol::DiagnosisUid,
            regions: vec!["440".to_string()],
            platform: "android".to_string(),
            app_package_name: "org.radar.app".to_string(),
        };
        let submission = submission();
        let body = build_request_body(&submission, &context).unwrap();

        assert_eq!(body["diagnosisUid"], "12345678");
        assert!(body.get("processingNumber").is_none());
        assert_eq!(body["symptomOnsetDate"], "2021-02-03");
        assert_eq!(body["idempotencyKey"], submission.idempotency_key.to_string());
        assert_eq!(body["keys"].as_array().unwrap().len(), 2);
        assert_eq!(body["keys"][0]["rollingStartNumber"], 18_660 * 144);
        assert_eq!(body["keys"][0]["keyData"], "AAAAAAAAAAAAAAAAAAAAAA==");
        assert_eq!(body["regions"][0], "440");
    }

    #[tokio::test]
    async fn test_submit_posts_and_returns_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/diagnosis"))
            .and(header_exists(IDEMPOTENCY_HEADER))
            .and(body_partial_json(serde_json::json!({
                "processingNumber": "12345678",
                "symptomOnsetDate": "2021-02-03"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let handler = HttpsDiagnosisKeyRegister::new(
            &server_config(vec![format!("{}/diagnosis", server.uri())]),
            SubmissionProtocol::ProcessingNumber,
        )
        .unwrap();

        let statuses = handler.submit_diagnosis_keys(&submission()).await.unwrap();
        assert_eq!(statuses, vec![200]);
    }

    #[tokio::test]
    async fn test_submit_reports_every_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/primary"))
            .respond_with(ResponseTemplate::new(406))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/mirror"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let handler = HttpsDiagnosisKeyRegister::new(
            &server_config(vec![
                format!("{}/primary", server.uri()),
                format!("{}/mirror", server.uri()),
            ]),
            SubmissionProtocol::ProcessingNumber,
        )
        .unwrap();

        let statuses = handler.submit_diagnosis_keys(&submission()).await.unwrap();
        assert_eq!(statuses, vec![406, 503]);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let handler = HttpsDiagnosisKeyRegister::new(
            &server_config(vec!["http://127.0.0.1:1/diagnosis".to_string()]),
            SubmissionProtocol::ProcessingNumber,
        )
        .unwrap();

        let err = handler.submit_diagnosis_keys(&submission()).await.unwrap_err();
        assert_matches!(err, RadarError::Transport { .. });
    }

    #[tokio::test]
    async fn test_unreachable_mirror_keeps_primary_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/diagnosis"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let handler = HttpsDiagnosisKeyRegister::new(
            &server_config(vec![
                format!("{}/diagnosis", server.uri()),
                "http://127.0.0.1:1/mirror".to_string(),
            ]),
            SubmissionProtocol::ProcessingNumber,
        )
        .unwrap();

        let statuses = handler.submit_diagnosis_keys(&submission()).await.unwrap();
        assert_eq!(statuses, vec![200]);
    }

    #[tokio::test]
    async fn test_unreachable_primary_keeps_mirror_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mirror"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let handler = HttpsDiagnosisKeyRegister::new(
            &server_config(vec![
                "http://127.0.0.1:1/diagnosis".to_string(),
                format!("{}/mirror", server.uri()),
            ]),
            SubmissionProtocol::ProcessingNumber,
        )
        .unwrap();

        let statuses = handler.submit_diagnosis_keys(&submission()).await.unwrap();
        assert_eq!(statuses, vec![503]);
    }

    #[test]
    fn test_rejects_bad_endpoint() {
        let err = HttpsDiagnosisKeyRegister::new(
            &server_config(vec!["not a url".to_string()]),
            SubmissionProtocol::ProcessingNumber,
        )
        .unwrap_err();
        assert_matches!(err, RadarError::Config { .. });

        assert!(HttpsDiagnosisKeyRegister::new(
            &server_config(Vec::new()),
            SubmissionProtocol::ProcessingNumber
        )
        .is_err());
    }
}
