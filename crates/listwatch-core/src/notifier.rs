//! Notification interface for rendered change reports.

use crate::errors::{ExError, ExErrorKind};
use std::sync::Mutex;

/// Deliver a rendered report to a human-facing channel.
///
/// Delivery is fire-and-forget: implementations only guarantee that a
/// failed transport is reported as an error.
#[allow(clippy::result_large_err)]
pub trait Notifier: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Transport` when the message could not be sent.
    fn notify(&self, message: &str) -> Result<(), ExError>;
}

/// Notifier that prints reports to stdout, used for dry runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &str) -> Result<(), ExError> {
        println!("{}", message);
        Ok(())
    }
}

/// Notifier that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) -> Result<(), ExError> {
        self.messages
            .lock()
            .map(|mut m| m.push(message.to_string()))
            .map_err(|_| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("notify")
                    .with_message("recording notifier lock poisoned")
            })
    }
}

/// Notifier whose transport always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _message: &str) -> Result<(), ExError> {
        Err(ExError::new(ExErrorKind::Transport)
            .with_op("notify")
            .with_message("notification transport unavailable"))
    }
}
