//! Command-line host for Radar
//!
//! Runs the diagnosis-key registration core from a terminal: validate a
//! processing number, preview the key filter, or register keys against a
//! configured server.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use radar_core::RadarConfig;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

use commands::submit::{SubmitArgs, Symptoms};

#[derive(Parser)]
#[command(name = "radar")]
#[command(about = "Radar - diagnosis key registration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".radar/config.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a processing number
    CheckNumber {
        /// Processing number to check
        number: String,
    },

    /// Print the keys that would be uploaded
    Filter {
        /// Key history file (JSON array)
        #[arg(short, long)]
        keys: PathBuf,

        /// Diagnosis date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Days before the diagnosis date to include (defaults to config)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Register keys with the configured server
    Submit {
        /// Key history file (JSON array)
        #[arg(short, long)]
        keys: PathBuf,

        /// Processing number
        #[arg(short, long)]
        number: String,

        /// Symptom onset or test date (YYYY-MM-DD)
        #[arg(short, long)]
        date: NaiveDate,

        /// Whether the date is a symptom onset date
        #[arg(long, value_enum, default_value = "yes")]
        symptoms: Symptoms,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize unified logging system
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RadarConfig::load(&cli.config)?;
    tracing::debug!(config = %cli.config.display(), "configuration loaded");

    match cli.command {
        Commands::CheckNumber { number } => {
            commands::check::run(&number, &config)?;
        }

        Commands::Filter { keys, date, days } => {
            let days = days.unwrap_or(config.registration.days_to_send_tek);
            commands::filter::run(&keys, date, days).await?;
        }

        Commands::Submit {
            keys,
            number,
            date,
            symptoms,
            yes,
        } => {
            let args = SubmitArgs {
                keys,
                number,
                date,
                symptoms,
                yes,
            };
            commands::submit::run(args, &config).await?;
        }
    }

    Ok(())
}
