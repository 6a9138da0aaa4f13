//! LINE Notify notifier.

#![allow(clippy::result_large_err)]

use crate::transport::transport_error;
use listwatch_core::errors::{ExError, ExErrorKind};
use listwatch_core::notifier::Notifier;
use listwatch_core_types::Sensitive;
use std::time::Duration;

/// LINE Notify message endpoint
pub const LINE_NOTIFY_URL: &str = "https://notify-api.line.me/api/notify";

/// Posts each report as the `message` form field with a bearer token
#[derive(Debug, Clone)]
pub struct LineNotifier {
    client: reqwest::blocking::Client,
    endpoint: String,
    token: Sensitive<String>,
}

impl LineNotifier {
    /// # Errors
    ///
    /// - `InvalidInput` if the token is blank
    /// - `Internal` if the HTTP client cannot be constructed
    pub fn new(token: Sensitive<String>, timeout: Duration) -> Result<Self, ExError> {
        Self::with_endpoint(token, timeout, LINE_NOTIFY_URL)
    }

    /// Same as [`LineNotifier::new`] against a custom endpoint
    ///
    /// # Errors
    ///
    /// See [`LineNotifier::new`].
    pub fn with_endpoint(
        token: Sensitive<String>,
        timeout: Duration,
        endpoint: impl Into<String>,
    ) -> Result<Self, ExError> {
        if token.is_blank() {
            return Err(ExError::new(ExErrorKind::InvalidInput)
                .with_op("line_notifier")
                .with_message("LINE access token is empty"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("http_client")
                    .with_message(e.to_string())
            })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
        })
    }
}

impl Notifier for LineNotifier {
    fn notify(&self, message: &str) -> Result<(), ExError> {
        self.client
            .post(&self.endpoint)
            .bearer_auth(self.token.expose())
            .form(&[("message", message)])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport_error("notify", &self.endpoint, e))?;

        tracing::debug!(chars = message.chars().count(), "Delivered LINE notification");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_rejected() {
        let err = LineNotifier::new(Sensitive::new("  ".to_string()), Duration::from_secs(1))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_token_is_redacted_in_debug() {
        let notifier =
            LineNotifier::new(Sensitive::new("secret-token".to_string()), Duration::from_secs(1))
                .unwrap();
        let debug = format!("{:?}", notifier);
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let notifier = LineNotifier::with_endpoint(
            Sensitive::new("token".to_string()),
            Duration::from_millis(500),
            "http://127.0.0.1:9/api/notify",
        )
        .unwrap();
        let err = notifier.notify("hello").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Transport);
        assert_eq!(err.op(), Some("notify"));
    }
}
