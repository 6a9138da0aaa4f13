//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use crate::errors::{ExError, ExErrorKind};
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "listwatch=debug",
            Profile::Production | Profile::Test => "listwatch=info",
        }
    }
}

static INIT_ONCE: Once = Once::new();

fn install(profile: Profile, file: Option<File>) {
    INIT_ONCE.call_once(|| {
        if profile == Profile::Test {
            // Test capture is initialized separately via init_test_capture()
            return;
        }

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));

        let console = match profile {
            Profile::Production => fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .boxed(),
            _ => fmt::layer().with_writer(std::io::stderr).boxed(),
        };

        // Plain lines in the file, no ANSI escapes
        let file_layer = file.map(|f| fmt::layer().with_ansi(false).with_writer(Mutex::new(f)));

        let _ = tracing_subscriber::registry()
            .with(console)
            .with(file_layer)
            .with(filter)
            .try_init();
    });
}

/// Initialize the logging facility with console output only
///
/// This function should be called once at application startup.
/// It sets up the tracing subscriber based on the selected profile.
///
/// # Profiles
///
/// - **Development**: Human-readable logs with debug level
/// - **Production**: JSON structured logs with info level
/// - **Test**: Capture mode for test assertions
///
/// `RUST_LOG` overrides the profile's default filter.
pub fn init(profile: Profile) {
    install(profile, None);
}

/// Initialize the logging facility with console output plus an appending
/// log file at `path`, creating parent directories as needed.
///
/// # Errors
///
/// - `Io` if the log file cannot be opened
pub fn init_with_file(profile: Profile, path: &Path) -> Result<(), ExError> {
    let io_error = |e: std::io::Error| {
        ExError::new(ExErrorKind::Io)
            .with_op("init_logging")
            .with_path(path.display().to_string())
            .with_message(e.to_string())
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_error)?;

    install(profile, Some(file));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        // Multiple calls should not panic
        init(Profile::Test);
        init(Profile::Test);
        init(Profile::Development);
    }

    #[test]
    fn test_init_with_file_creates_log_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("logs").join("log_20240101.txt");
        init_with_file(Profile::Test, &path).unwrap();
        assert!(path.exists());
    }
}
