//! Configuration for the registration workflow and the submission endpoint
//!
//! Loading order: defaults, then a TOML file, then `RADAR_*` environment
//! variables, then validation. Keys use dot notation
//! (`registration.max_error_count`); the environment form upper-cases the key
//! and replaces the dot with `__` (`RADAR_REGISTRATION__MAX_ERROR_COUNT`).

use crate::types::{IdentifierCharset, IdentifierRules, SubmissionProtocol};
use crate::RadarError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use url::Url;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "RADAR_";

/// Default failed-attempt cap before the session is closed.
pub const DEFAULT_MAX_ERROR_COUNT: u32 = 3;

/// Default step of the linear retry delay.
pub const DEFAULT_RETRY_DELAY_STEP_MS: u64 = 5_000;

/// Default key window, in days before the diagnosis date.
pub const DEFAULT_DAYS_TO_SEND_TEK: u32 = 14;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Workflow settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Failed attempts allowed before the session is closed
    pub max_error_count: u32,
    /// Retry delay step; the n-th retry waits `n * step`
    pub retry_delay_step_ms: u64,
    /// Key window, in days before the diagnosis date
    pub days_to_send_tek: u32,
    /// Required processing number length
    pub processing_number_length: usize,
    /// Allowed processing number characters
    pub processing_number_charset: IdentifierCharset,
    /// Registration protocol version
    pub protocol: SubmissionProtocol,
    /// Help line shown for registration questions
    pub inquiry_phone_number: String,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            max_error_count: DEFAULT_MAX_ERROR_COUNT,
            retry_delay_step_ms: DEFAULT_RETRY_DELAY_STEP_MS,
            days_to_send_tek: DEFAULT_DAYS_TO_SEND_TEK,
            processing_number_length: IdentifierRules::default().length,
            processing_number_charset: IdentifierCharset::default(),
            protocol: SubmissionProtocol::default(),
            inquiry_phone_number: "0120-000-000".to_string(),
        }
    }
}

impl RegistrationConfig {
    /// Identifier format rules derived from this configuration.
    pub fn identifier_rules(&self) -> IdentifierRules {
        IdentifierRules {
            length: self.processing_number_length,
            charset: self.processing_number_charset,
        }
    }
}

/// Registration server settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Registration endpoints; production uses exactly one
    pub endpoints: Vec<String>,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Region codes sent with every submission
    pub regions: Vec<String>,
    /// Platform name sent with every submission
    pub platform: String,
    /// Application package name sent with every submission
    pub app_package_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["https://localhost/api/v3/diagnosis".to_string()],
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            regions: vec!["440".to_string()],
            platform: std::env::consts::OS.to_string(),
            app_package_name: "org.radar.app".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Workflow settings
    pub registration: RegistrationConfig,
    /// Server settings
    pub server: ServerConfig,
}

impl RadarConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, RadarError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a file.
    pub fn load_from_file(path: &Path) -> Result<Self, RadarError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RadarError::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` if it exists, otherwise start from defaults; then
    /// apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, RadarError> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };
        config.merge_with_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `RADAR_*` environment variables. Entries that are not valid
    /// UTF-8 cannot name a configuration key and are skipped.
    pub fn merge_with_env(&mut self) -> Result<(), RadarError> {
        self.merge_with_vars(std::env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    /// Apply overrides from `(name, value)` pairs. Only prefixed names with a
    /// `__` section separator are overrides; other names, including unrelated
    /// `RADAR_*` variables such as `RADAR_HOME`, are ignored.
    pub fn merge_with_vars<I>(&mut self, vars: I) -> Result<(), RadarError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            if !key.contains("__") {
                tracing::debug!(variable = %name, "ignoring variable without a config section");
                continue;
            }
            let key = key.to_lowercase().replace("__", ".");
            self.set_from_string(&key, &value)?;
        }
        Ok(())
    }

    /// Set one value from its string form (CLI and environment parsing).
    ///
    /// List values are comma-separated.
    pub fn set_from_string(&mut self, key: &str, value: &str) -> Result<(), RadarError> {
        let registration = &mut self.registration;
        let server = &mut self.server;
        match key {
            "registration.max_error_count" => registration.max_error_count = parse(key, value)?,
            "registration.retry_delay_step_ms" => {
                registration.retry_delay_step_ms = parse(key, value)?;
            }
            "registration.days_to_send_tek" => registration.days_to_send_tek = parse(key, value)?,
            "registration.processing_number_length" => {
                registration.processing_number_length = parse(key, value)?;
            }
            "registration.processing_number_charset" => {
                registration.processing_number_charset = parse_enum(key, value)?;
            }
            "registration.protocol" => registration.protocol = parse_enum(key, value)?,
            "registration.inquiry_phone_number" => {
                registration.inquiry_phone_number = value.to_string();
            }
            "server.endpoints" => server.endpoints = split_list(value),
            "server.timeout_secs" => server.timeout_secs = parse(key, value)?,
            "server.regions" => server.regions = split_list(value),
            "server.platform" => server.platform = value.to_string(),
            "server.app_package_name" => server.app_package_name = value.to_string(),
            other => {
                return Err(RadarError::config(format!("Unknown configuration key: {other}")));
            }
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), RadarError> {
        let registration = &self.registration;
        if registration.max_error_count == 0 {
            return Err(RadarError::config(
                "registration.max_error_count must be greater than 0",
            ));
        }
        if registration.days_to_send_tek == 0 {
            return Err(RadarError::config(
                "registration.days_to_send_tek must be greater than 0",
            ));
        }
        if registration.processing_number_length == 0 {
            return Err(RadarError::config(
                "registration.processing_number_length must be greater than 0",
            ));
        }
        if self.server.timeout_secs == 0 {
            return Err(RadarError::config("server.timeout_secs must be greater than 0"));
        }
        if self.server.endpoints.is_empty() {
            return Err(RadarError::config("server.endpoints must not be empty"));
        }
        for endpoint in &self.server.endpoints {
            validate_endpoint(endpoint)?;
        }
        Ok(())
    }
}

/// Endpoints must be HTTPS; plain HTTP is tolerated for loopback test servers.
fn validate_endpoint(endpoint: &str) -> Result<(), RadarError> {
    let url = Url::parse(endpoint)
        .map_err(|e| RadarError::config(format!("Invalid endpoint {endpoint}: {e}")))?;
    match url.scheme() {
        "https" => Ok(()),
        "http" if is_loopback(&url) => Ok(()),
        scheme => Err(RadarError::config(format!(
            "Endpoint {endpoint} must use https (got {scheme})"
        ))),
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(domain)) => domain == "localhost",
        Some(url::Host::Ipv4(addr)) => addr.is_loopback(),
        Some(url::Host::Ipv6(addr)) => addr.is_loopback(),
        None => false,
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, RadarError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| RadarError::config(format!("Invalid value for {key}: {e}")))
}

fn parse_enum<T: serde::de::DeserializeOwned>(key: &str, value: &str) -> Result<T, RadarError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_string()))
        .map_err(|e| RadarError::config(format!("Invalid value for {key}: {e}")))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
