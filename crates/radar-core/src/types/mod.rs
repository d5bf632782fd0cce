//! Domain types shared across crates.

pub mod keys;
pub mod submission;
pub mod ui;

pub use keys::{DayNumber, TemporaryExposureKey, DEFAULT_ROLLING_PERIOD, INTERVALS_PER_DAY};
pub use submission::{
    mask_identifier, DiagnosisSubmission, IdentifierCharset, IdentifierError, IdentifierRules,
    ProcessingNumber, SubmissionOutcome, SubmissionProtocol, DEFAULT_PROCESSING_NUMBER_LENGTH,
};
pub use ui::{Alert, Confirmation, Route};
