//! `radar filter`

use anyhow::{Context, Result};
use chrono::NaiveDate;
use radar_app::filter_temporary_exposure_keys;
use radar_core::effects::ExposureNotificationEffects;
use radar_core::types::TemporaryExposureKey;
use radar_effects::FileExposureNotification;
use std::path::Path;

/// Load keys from `keys`, keep those inside the window and render them as JSON.
pub async fn filtered_json(keys: &Path, date: NaiveDate, days: u32) -> Result<String> {
    let history = FileExposureNotification::new(keys)
        .temporary_exposure_key_history()
        .await
        .with_context(|| format!("loading {}", keys.display()))?;
    let total = history.len();

    let kept: Vec<TemporaryExposureKey> = filter_temporary_exposure_keys(history, date, days)?;
    tracing::info!(tek_count = total, filtered_count = kept.len(), %date, days, "filtered keys");

    Ok(serde_json::to_string_pretty(&kept)?)
}

/// Print the filtered keys.
pub async fn run(keys: &Path, date: NaiveDate, days: u32) -> Result<()> {
    println!("{}", filtered_json(keys, date, days).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_filters_file_contents() {
        let keys = vec![
            TemporaryExposureKey::for_day(vec![1; 16], 100, 4),
            TemporaryExposureKey::for_day(vec![2; 16], 105, 4),
            TemporaryExposureKey::for_day(vec![3; 16], 111, 4),
        ];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&keys).unwrap().as_bytes())
            .unwrap();

        let date = NaiveDate::from_ymd_opt(1970, 4, 16).unwrap();
        let json = filtered_json(file.path(), date, 5).await.unwrap();
        let kept: Vec<TemporaryExposureKey> = serde_json::from_str(&json).unwrap();
        assert_eq!(kept, keys[..2].to_vec());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let date = NaiveDate::from_ymd_opt(2021, 2, 1).unwrap();
        assert!(filtered_json(Path::new("/nonexistent/keys.json"), date, 14)
            .await
            .is_err());
    }
}
