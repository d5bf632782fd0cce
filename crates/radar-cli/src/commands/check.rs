//! `radar check-number`

use anyhow::{bail, Result};
use radar_core::types::ProcessingNumber;
use radar_core::RadarConfig;

/// Validate `number` against the configured rules.
pub fn run(number: &str, config: &RadarConfig) -> Result<()> {
    let rules = config.registration.identifier_rules();
    match ProcessingNumber::parse(number, &rules) {
        Ok(valid) => {
            println!("valid: {}", valid.masked());
            Ok(())
        }
        Err(err) => bail!("invalid processing number: {err}"),
    }
}
