//! Temporary exposure keys and the day arithmetic used to window them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of 10-minute rolling intervals in one day.
pub const INTERVALS_PER_DAY: u32 = 144;

/// Default rolling period of a key (one full day of intervals).
pub const DEFAULT_ROLLING_PERIOD: u32 = INTERVALS_PER_DAY;

/// Days elapsed since 1970-01-01 (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayNumber(i64);

impl DayNumber {
    /// Wrap a raw day count.
    pub const fn new(days: i64) -> Self {
        Self(days)
    }

    /// Raw day count.
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Day number of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.signed_duration_since(NaiveDate::default()).num_days())
    }

    /// Day number of a rolling start interval number.
    pub fn from_interval(interval: u32) -> Self {
        Self(i64::from(interval / INTERVALS_PER_DAY))
    }

    /// The day `days` before this one.
    pub fn minus_days(self, days: u32) -> Self {
        Self(self.0.saturating_sub(i64::from(days)))
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}

/// A temporary exposure key as reported by the platform.
///
/// Fields are private: a key is immutable once retrieved.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryExposureKey {
    #[serde(with = "key_data_base64")]
    key_data: Vec<u8>,
    rolling_start_interval_number: u32,
    #[serde(default = "default_rolling_period")]
    rolling_period: u32,
    #[serde(default)]
    transmission_risk_level: u8,
}

fn default_rolling_period() -> u32 {
    DEFAULT_ROLLING_PERIOD
}

impl TemporaryExposureKey {
    /// Create a key from its platform fields.
    pub fn new(
        key_data: Vec<u8>,
        rolling_start_interval_number: u32,
        rolling_period: u32,
        transmission_risk_level: u8,
    ) -> Self {
        Self {
            key_data,
            rolling_start_interval_number,
            rolling_period,
            transmission_risk_level,
        }
    }

    /// Create a full-day key starting at midnight of `day`.
    pub fn for_day(key_data: Vec<u8>, day: u32, transmission_risk_level: u8) -> Self {
        Self::new(
            key_data,
            day.saturating_mul(INTERVALS_PER_DAY),
            DEFAULT_ROLLING_PERIOD,
            transmission_risk_level,
        )
    }

    /// Opaque key material.
    pub fn key_data(&self) -> &[u8] {
        &self.key_data
    }

    /// First 10-minute interval this key was active.
    pub fn rolling_start_interval_number(&self) -> u32 {
        self.rolling_start_interval_number
    }

    /// Number of intervals the key was active.
    pub fn rolling_period(&self) -> u32 {
        self.rolling_period
    }

    /// Transmission-risk level assigned by the platform.
    pub fn transmission_risk_level(&self) -> u8 {
        self.transmission_risk_level
    }

    /// Day the key became active.
    pub fn day_number(&self) -> DayNumber {
        DayNumber::from_interval(self.rolling_start_interval_number)
    }
}

// Key material stays out of logs.
impl fmt::Debug for TemporaryExposureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryExposureKey")
            .field("key_data", &format_args!("<{} bytes>", self.key_data.len()))
            .field(
                "rolling_start_interval_number",
                &self.rolling_start_interval_number,
            )
            .field("rolling_period", &self.rolling_period)
            .field("transmission_risk_level", &self.transmission_risk_level)
            .finish()
    }
}

mod key_data_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
