//! Submission payload, identifier validation and protocol variants.

use crate::types::keys::TemporaryExposureKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Default processing number length issued by health authorities.
pub const DEFAULT_PROCESSING_NUMBER_LENGTH: usize = 8;

/// Characters accepted in a processing number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentifierCharset {
    /// ASCII digits only
    #[default]
    Digits,
    /// ASCII letters and digits
    Alphanumeric,
}

impl IdentifierCharset {
    /// Check a single character against this class.
    pub fn accepts(self, ch: char) -> bool {
        match self {
            Self::Digits => ch.is_ascii_digit(),
            Self::Alphanumeric => ch.is_ascii_alphanumeric(),
        }
    }
}

/// Format rules for processing numbers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentifierRules {
    /// Exact number of characters
    pub length: usize,
    /// Allowed character class
    pub charset: IdentifierCharset,
}

impl Default for IdentifierRules {
    fn default() -> Self {
        Self {
            length: DEFAULT_PROCESSING_NUMBER_LENGTH,
            charset: IdentifierCharset::Digits,
        }
    }
}

/// Why an identifier was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    /// Nothing was entered
    #[error("processing number is empty")]
    Empty,
    /// Wrong number of characters
    #[error("processing number must be {expected} characters, got {actual}")]
    WrongLength {
        /// Required length
        expected: usize,
        /// Length entered
        actual: usize,
    },
    /// A character outside the allowed class
    #[error("processing number contains an invalid character at position {position}")]
    InvalidCharacter {
        /// Zero-based character position
        position: usize,
    },
}

impl IdentifierError {
    /// Whether the identifier was missing rather than malformed.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A validated processing number (the health authority's diagnosis identifier).
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProcessingNumber(String);

impl ProcessingNumber {
    /// Validate `raw` against `rules`.
    ///
    /// # Examples
    /// ```rust
    /// use radar_core::types::{IdentifierRules, ProcessingNumber};
    ///
    /// let rules = IdentifierRules::default();
    /// assert!(ProcessingNumber::parse("12345678", &rules).is_ok());
    /// assert!(ProcessingNumber::parse("", &rules).is_err());
    /// assert!(ProcessingNumber::parse("1234abcd", &rules).is_err());
    /// ```
    pub fn parse(raw: &str, rules: &IdentifierRules) -> Result<Self, IdentifierError> {
        if raw.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let actual = raw.chars().count();
        if actual != rules.length {
            return Err(IdentifierError::WrongLength {
                expected: rules.length,
                actual,
            });
        }

        if let Some(position) = raw.chars().position(|ch| !rules.charset.accepts(ch)) {
            return Err(IdentifierError::InvalidCharacter { position });
        }

        Ok(Self(raw.to_string()))
    }

    /// The identifier as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe rendering that keeps only the last two characters.
    pub fn masked(&self) -> String {
        mask_identifier(&self.0)
    }
}

// Debug goes through the mask so identifiers never reach logs verbatim.
impl fmt::Debug for ProcessingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessingNumber({})", self.masked())
    }
}

/// Mask all but the last two characters of a raw identifier.
pub fn mask_identifier(raw: &str) -> String {
    let count = raw.chars().count();
    let visible = count.min(2);
    raw.chars()
        .enumerate()
        .map(|(i, ch)| if i + visible < count { '*' } else { ch })
        .collect()
}

/// Versioned variants of the registration protocol.
///
/// Both versions carry the same payload; they differ in the wire name of the
/// identifier field and in the status code that signals acceptance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionProtocol {
    /// v1: `processingNumber`, accepted with 200
    #[default]
    ProcessingNumber,
    /// v2: `diagnosisUid`, accepted with 204
    DiagnosisUid,
}

impl SubmissionProtocol {
    /// JSON field carrying the identifier.
    pub fn identifier_field(self) -> &'static str {
        match self {
            Self::ProcessingNumber => "processingNumber",
            Self::DiagnosisUid => "diagnosisUid",
        }
    }

    /// Status code the server returns on acceptance.
    pub fn success_status(self) -> u16 {
        match self {
            Self::ProcessingNumber => 200,
            Self::DiagnosisUid => 204,
        }
    }
}

impl fmt::Display for SubmissionProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProcessingNumber => write!(f, "processing-number"),
            Self::DiagnosisUid => write!(f, "diagnosis-uid"),
        }
    }
}

/// Server verdict for one submission, derived from the HTTP status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubmissionOutcome {
    /// Keys registered
    Accepted,
    /// The identifier was not recognised by the server (406)
    Rejected,
    /// Server failed or is unavailable (500, 503)
    ServerError,
    /// The request body was refused (400)
    MalformedRequest,
    /// Any other status
    Unknown(u16),
}

impl SubmissionOutcome {
    /// Classify `status` under `protocol`.
    ///
    /// Only the protocol's own success code counts as acceptance; the other
    /// version's success code is reported as `Unknown`.
    pub fn from_status(status: u16, protocol: SubmissionProtocol) -> Self {
        if status == protocol.success_status() {
            return Self::Accepted;
        }
        match status {
            406 => Self::Rejected,
            500 | 503 => Self::ServerError,
            400 => Self::MalformedRequest,
            other => Self::Unknown(other),
        }
    }

    /// Whether the server accepted the keys.
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl fmt::Display for SubmissionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
            Self::ServerError => write!(f, "server error"),
            Self::MalformedRequest => write!(f, "malformed request"),
            Self::Unknown(code) => write!(f, "unknown status {code}"),
        }
    }
}

/// One submission attempt. Built per attempt, dropped after the response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagnosisSubmission {
    /// Health authority identifier
    pub identifier: ProcessingNumber,
    /// Diagnosis (or symptom onset) date
    pub diagnosis_date: NaiveDate,
    /// Filtered keys, in platform order
    pub keys: Vec<TemporaryExposureKey>,
    /// Per-attempt idempotency token
    pub idempotency_key: Uuid,
}

impl DiagnosisSubmission {
    /// Build an attempt with a fresh idempotency token.
    pub fn new(
        identifier: ProcessingNumber,
        diagnosis_date: NaiveDate,
        keys: Vec<TemporaryExposureKey>,
    ) -> Self {
        Self {
            identifier,
            diagnosis_date,
            keys,
            idempotency_key: Uuid::new_v4(),
        }
    }
}
