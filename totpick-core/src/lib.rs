//! Core library for the totpick TOTP picker
//!
//! This crate provides configuration, secret store access, the name cache,
//! code generation, entry selection and code delivery.

pub mod error;
pub mod types;

pub mod config;
pub mod otp;
pub mod output;
pub mod process;
pub mod select;
pub mod session;
pub mod store;

use std::io::IsTerminal;
use tracing_subscriber::filter::LevelFilter;

/// Whether logs should go to the systemd journal
///
/// Launcher calls always log to stderr: the detached child's stderr is the
/// launcher log, even when rofi itself was started by systemd.
#[cfg(target_os = "linux")]
fn journal_logging<E>(environment: E) -> bool
where
    E: Fn(&str) -> Option<String>,
{
    environment("JOURNAL_STREAM").is_some() && !session::Session::from_env(environment).launcher
}

/// Initialize logging infrastructure
///
/// Uses the systemd journal when running under systemd; otherwise logs to
/// stderr. The default level is WARN so ordinary diagnostics on stderr stay
/// free of log noise.
pub fn init_logging(level: LevelFilter) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    #[cfg(target_os = "linux")]
    {
        if journal_logging(|key| std::env::var(key).ok()) {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(level)
                .init();
            return Ok(());
        }
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .with(level)
        .init();

    Ok(())
}
