//! Logging configuration for SecureCheck.
//!
//! Dashboard mode logs to a file so tracing output cannot corrupt the
//! terminal; one-shot mode logs to stderr where it can be captured.

use std::fs::{self, File};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Initializes logging for dashboard (TUI) mode.
///
/// Logs go to `securecheck.log` in the platform state directory
/// (`~/.local/state/securecheck/` on Linux).
pub fn init_file_logging() {
    let log_path = log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            // Fall back to no logging rather than corrupting the TUI
            return;
        }
    }

    // Truncate on each run to avoid unbounded growth
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}

/// Initializes logging for one-shot mode.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Returns the path for the log file.
pub fn log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("securecheck").join("securecheck.log");
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("securecheck").join("securecheck.log");
    }

    std::env::temp_dir().join("securecheck.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_path_is_absolute() {
        let path = log_path();
        assert!(path.is_absolute());
    }

    #[test]
    fn test_log_path_file_name() {
        let path = log_path();
        assert!(path.ends_with("securecheck.log"));
    }
}
