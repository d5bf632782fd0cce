//! Builders for keys and submissions used across tests.

use chrono::NaiveDate;
use radar_core::types::{
    DiagnosisSubmission, IdentifierRules, ProcessingNumber, TemporaryExposureKey,
};

/// A full-day key active on `day`, with key material derived from the day.
pub fn key_on_day(day: u32) -> TemporaryExposureKey {
    TemporaryExposureKey::for_day(day.to_be_bytes().repeat(4), day, 4)
}

/// Keys active on each of `days`, in the given order.
pub fn keys_on_days(days: &[u32]) -> Vec<TemporaryExposureKey> {
    days.iter().copied().map(key_on_day).collect()
}

/// The calendar date of a day number.
///
/// # Panics
/// Panics if `day` is outside chrono's supported range.
#[allow(clippy::expect_used)]
pub fn date_of_day(day: u32) -> NaiveDate {
    NaiveDate::default()
        .checked_add_days(chrono::Days::new(u64::from(day)))
        .expect("day within chrono range")
}

/// A submission for `identifier` dated 2021-03-01.
///
/// # Panics
/// Panics if `identifier` does not satisfy the default rules.
#[allow(clippy::expect_used)]
pub fn submission(identifier: &str, keys: Vec<TemporaryExposureKey>) -> DiagnosisSubmission {
    let identifier = ProcessingNumber::parse(identifier, &IdentifierRules::default())
        .expect("fixture identifier must be valid");
    DiagnosisSubmission::new(identifier, date_of_day(18_687), keys)
}
