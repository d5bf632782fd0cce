//! `radar submit`

use crate::terminal::TerminalHandler;
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use radar_app::workflows::form::{LABEL_NO_SYMPTOMS, LABEL_WITH_SYMPTOMS};
use radar_app::{RegistrationEffects, RegistrationFlow};
use radar_core::RadarConfig;
use radar_effects::{FileExposureNotification, HttpsDiagnosisKeyRegister, RealTimeHandler};
use std::path::PathBuf;
use std::sync::Arc;

/// Answer to "did you have symptoms?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Symptoms {
    /// Date is the symptom onset date
    Yes,
    /// Date is the test date
    No,
}

impl Symptoms {
    fn label(self) -> &'static str {
        match self {
            Self::Yes => LABEL_WITH_SYMPTOMS,
            Self::No => LABEL_NO_SYMPTOMS,
        }
    }
}

/// Arguments for one registration.
#[derive(Debug, Clone)]
pub struct SubmitArgs {
    /// Key history file
    pub keys: PathBuf,
    /// Processing number
    pub number: String,
    /// Symptom onset or test date
    pub date: NaiveDate,
    /// Symptom answer
    pub symptoms: Symptoms,
    /// Accept the confirmation without asking
    pub yes: bool,
}

/// Run the registration flow once against the configured server.
pub async fn run(args: SubmitArgs, config: &RadarConfig) -> Result<()> {
    let terminal = Arc::new(TerminalHandler::new(args.yes));
    let register = HttpsDiagnosisKeyRegister::new(&config.server, config.registration.protocol)?;

    let effects = RegistrationEffects {
        dialogs: terminal.clone(),
        navigation: terminal.clone(),
        lifecycle: terminal.clone(),
        dialer: terminal.clone(),
        time: Arc::new(RealTimeHandler::new()),
        exposure: Arc::new(FileExposureNotification::new(&args.keys)),
        register: Arc::new(register),
    };

    let flow = RegistrationFlow::new(effects, config.registration.clone(), args.date);
    flow.initialize(None).await;
    flow.set_identifier(args.number).await;
    flow.select_symptoms(args.symptoms.label()).await;

    if !flow.view_flags().await.is_submit_enabled {
        tracing::warn!("processing number length does not match the configured length");
    }

    match flow.register().await {
        Ok(report) => {
            println!(
                "Registered {} keys ({} endpoint(s))",
                report.key_count,
                report.outcomes.len()
            );
            Ok(())
        }
        Err(err) => {
            tracing::debug!(closed = terminal.is_closed(), "registration ended");
            bail!("registration failed [{}]: {err}", err.code())
        }
    }
}
