//! Terminal UI effect handler
//!
//! Renders dialogs as plain text on stdout and reads confirmations from
//! stdin. Navigation and the dialer have no terminal counterpart, so they
//! are printed instead.

use async_trait::async_trait;
use radar_core::effects::{DialogEffects, LifecycleEffects, NavigationEffects, PhoneDialerEffects};
use radar_core::types::{Alert, Confirmation, Route};
use radar_core::RadarError;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};

/// UI handler for the `radar` binary.
#[derive(Debug, Default)]
pub struct TerminalHandler {
    auto_confirm: bool,
    closed: AtomicBool,
}

impl TerminalHandler {
    /// Create a handler. With `auto_confirm`, every question is accepted.
    pub fn new(auto_confirm: bool) -> Self {
        Self {
            auto_confirm,
            closed: AtomicBool::new(false),
        }
    }

    /// Whether the flow asked to close the application.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Interpret a typed answer; only an explicit yes accepts.
fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl DialogEffects for TerminalHandler {
    async fn confirm(&self, confirmation: &Confirmation) -> bool {
        println!("{}\n{}", confirmation.title, confirmation.message);
        if self.auto_confirm {
            println!("> {}", confirmation.accept);
            return true;
        }

        println!("[y] {} / [N] {}", confirmation.accept, confirmation.cancel);
        let mut answer = String::new();
        match BufReader::new(tokio::io::stdin()).read_line(&mut answer).await {
            Ok(_) => is_affirmative(&answer),
            Err(error) => {
                tracing::warn!(%error, "could not read confirmation, treating as cancel");
                false
            }
        }
    }

    async fn alert(&self, alert: &Alert) {
        if alert.message.is_empty() {
            println!("[{}]", alert.title);
        } else {
            println!("[{}] {}", alert.title, alert.message);
        }
    }

    async fn show_loading(&self, text: &str) {
        eprintln!("{text}...");
    }

    async fn hide_loading(&self) {
        tracing::debug!("loading hidden");
    }
}

#[async_trait]
impl NavigationEffects for TerminalHandler {
    async fn navigate(&self, route: &Route) -> Result<(), RadarError> {
        println!("-> {}", route.path());
        Ok(())
    }
}

#[async_trait]
impl LifecycleEffects for TerminalHandler {
    async fn close_application(&self) {
        self.closed.store(true, Ordering::Release);
        println!("Closing.");
    }
}

#[async_trait]
impl PhoneDialerEffects for TerminalHandler {
    async fn open_dialer(&self, number: &str) -> Result<(), RadarError> {
        println!("Call {number}");
        Ok(())
    }
}
