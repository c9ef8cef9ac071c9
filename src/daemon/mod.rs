//! Launcher detach
//!
//! rofi keeps its window open until the script exits. When a name was chosen
//! the process daemonizes: the parent exits at once with nothing on stdout,
//! and the child carries on with the clipboard/autopaste work. The child's
//! stdout goes to /dev/null and its stderr (and therefore its logs) to
//! `launcher.log` in the cache directory.

use std::fs::OpenOptions;
use std::path::PathBuf;

use daemonize::Daemonize;
use tracing::info;

use totpick_core::config::Config;
use totpick_core::error::OutputError;
use totpick_core::store::cache::ensure_private_dir;
use totpick_core::types::env;

/// Log file of detached launcher deliveries
const LAUNCHER_LOG: &str = "launcher.log";

pub fn launcher_log_path(config: &Config) -> PathBuf {
    config.cache_dir.join(LAUNCHER_LOG)
}

fn detach_error(message: String) -> OutputError {
    OutputError::Detach { message }
}

/// Daemonize the current process
///
/// Returns only in the detached child; the parent exits with status 0.
pub fn detach(config: &Config) -> Result<(), OutputError> {
    ensure_private_dir(&config.cache_dir).map_err(|e| {
        detach_error(format!("cache directory {}: {}", config.cache_dir.display(), e))
    })?;

    let log_path = launcher_log_path(config);
    let log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| detach_error(format!("failed to open {}: {}", log_path.display(), e)))?;

    Daemonize::new()
        .working_directory(&config.cache_dir)
        .umask(0o077)
        .stderr(log)
        .start()
        .map_err(|e| detach_error(format!("failed to daemonize process: {}", e)))?;

    // Anything run from here on must not treat itself as a launcher call
    std::env::set_var(env::LAUNCHER_GUARD, "1");

    info!("Detached from launcher, PID: {}", std::process::id());
    Ok(())
}
