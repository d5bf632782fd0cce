//! Key Filter Workflow - Portable Business Logic
//!
//! Selects the temporary exposure keys worth uploading: those whose rolling
//! start day falls within `retention_days` before the diagnosis date,
//! inclusive at both ends.
//!
//! ## Window
//!
//! Day numbers are whole days since the Unix epoch. A key's day is its
//! rolling start interval divided by 144. For diagnosis day `D` and
//! retention `N`, a key is kept when `D - N <= day <= D`.

use chrono::NaiveDate;
use radar_core::types::{DayNumber, TemporaryExposureKey};
use radar_core::RadarError;

/// Closed range of day numbers eligible for upload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyWindow {
    start: DayNumber,
    end: DayNumber,
}

impl KeyWindow {
    /// Window ending on `diagnosis_date` and reaching back `retention_days`.
    ///
    /// # Validation Rules
    /// - `retention_days` must be greater than 0
    pub fn new(diagnosis_date: NaiveDate, retention_days: u32) -> Result<Self, RadarError> {
        if retention_days == 0 {
            return Err(RadarError::invalid(
                "Invalid key window: retention_days must be greater than 0",
            ));
        }
        let end = DayNumber::from_date(diagnosis_date);
        Ok(Self {
            start: end.minus_days(retention_days),
            end,
        })
    }

    /// First eligible day.
    pub fn start(&self) -> DayNumber {
        self.start
    }

    /// Last eligible day (the diagnosis day).
    pub fn end(&self) -> DayNumber {
        self.end
    }

    /// Whether `key` was generated inside the window.
    pub fn contains(&self, key: &TemporaryExposureKey) -> bool {
        let day = key.day_number();
        self.start <= day && day <= self.end
    }
}

/// Keep the keys inside the submission window, preserving their order.
///
/// # Examples
/// ```rust
/// use chrono::NaiveDate;
/// use radar_app::workflows::keys::filter_temporary_exposure_keys;
/// use radar_core::types::TemporaryExposureKey;
///
/// // 2021-02-01 is day 18659 since the epoch
/// let date = NaiveDate::from_ymd_opt(2021, 2, 1).unwrap();
/// let keys = vec![
///     TemporaryExposureKey::for_day(vec![1; 16], 18_644, 4),
///     TemporaryExposureKey::for_day(vec![2; 16], 18_645, 4),
///     TemporaryExposureKey::for_day(vec![3; 16], 18_660, 4),
/// ];
/// let kept = filter_temporary_exposure_keys(keys, date, 14).unwrap();
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].key_data(), &[2u8; 16]);
/// ```
pub fn filter_temporary_exposure_keys<I>(
    keys: I,
    diagnosis_date: NaiveDate,
    retention_days: u32,
) -> Result<Vec<TemporaryExposureKey>, RadarError>
where
    I: IntoIterator<Item = TemporaryExposureKey>,
{
    let window = KeyWindow::new(diagnosis_date, retention_days)?;
    let mut total = 0usize;
    let kept: Vec<_> = keys
        .into_iter()
        .inspect(|_| total += 1)
        .filter(|key| window.contains(key))
        .collect();
    tracing::debug!(
        tek_count = total,
        filtered_count = kept.len(),
        start = %window.start(),
        end = %window.end(),
        "filtered temporary exposure keys"
    );
    Ok(kept)
}
