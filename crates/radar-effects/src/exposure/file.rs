//! File-backed exposure notification handler
//!
//! Stands in for the platform API on hosts without one (the CLI, test
//! rigs). The key history is a JSON array of keys in wire form.

use async_trait::async_trait;
use radar_core::effects::ExposureNotificationEffects;
use radar_core::types::TemporaryExposureKey;
use radar_core::RadarError;
use std::path::{Path, PathBuf};

/// Exposure notification handler reading the key history from a file.
#[derive(Debug, Clone)]
pub struct FileExposureNotification {
    path: PathBuf,
    enabled: bool,
}

impl FileExposureNotification {
    /// Read keys from `path`; reported as enabled.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
        }
    }

    /// Override the reported enablement state.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Path of the key history file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ExposureNotificationEffects for FileExposureNotification {
    async fn is_enabled(&self) -> Result<bool, RadarError> {
        Ok(self.enabled)
    }

    async fn temporary_exposure_key_history(
        &self,
    ) -> Result<Vec<TemporaryExposureKey>, RadarError> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            RadarError::platform(format!(
                "Failed to read key history {}: {e}",
                self.path.display()
            ))
        })?;
        let keys: Vec<TemporaryExposureKey> = serde_json::from_str(&content)?;
        tracing::debug!(path = %self.path.display(), count = keys.len(), "loaded key history");
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[tokio::test]
    async fn test_reads_key_history() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"keyData":"AAAAAAAAAAAAAAAAAAAAAA==","rollingStartIntervalNumber":2654208,"rollingPeriod":144,"transmissionRiskLevel":4}},
                {{"keyData":"AQEBAQEBAQEBAQEBAQEBAQ==","rollingStartIntervalNumber":2654352}}
            ]"#
        )
        .unwrap();

        let handler = FileExposureNotification::new(file.path());
        assert!(handler.is_enabled().await.unwrap());

        let keys = handler.temporary_exposure_key_history().await.unwrap();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].transmission_risk_level(), 4);
        assert_eq!(keys[1].key_data(), &[1u8; 16]);
    }

    #[tokio::test]
    async fn test_missing_file_is_platform_error() {
        let dir = tempfile::tempdir().unwrap();
        let handler = FileExposureNotification::new(dir.path().join("keys.json"));
        assert_matches!(
            handler.temporary_exposure_key_history().await,
            Err(RadarError::Platform { .. })
        );
    }

    #[tokio::test]
    async fn test_disabled_flag() {
        let handler = FileExposureNotification::new("unused.json").with_enabled(false);
        assert!(!handler.is_enabled().await.unwrap());
    }
}
