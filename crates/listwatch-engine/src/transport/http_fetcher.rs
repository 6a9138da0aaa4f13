//! Blocking HTTP feed fetcher.

#![allow(clippy::result_large_err)]

use crate::transport::transport_error;
use listwatch_core::errors::{ExError, ExErrorKind};
use listwatch_core::fetcher::FeedFetcher;
use listwatch_core::model::Market;
use std::time::Duration;

/// Fetches each market's CSV feed with a blocking GET
#[derive(Debug, Clone)]
pub struct HttpFeedFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFeedFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// - `Internal` if the HTTP client cannot be constructed
    pub fn new(timeout: Duration) -> Result<Self, ExError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("listwatch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                ExError::new(ExErrorKind::Internal)
                    .with_op("http_client")
                    .with_message(e.to_string())
            })?;
        Ok(Self { client })
    }
}

impl FeedFetcher for HttpFeedFetcher {
    fn fetch(&self, market: Market) -> Result<String, ExError> {
        let url = market.config().feed_url;

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport_error("fetch", url, e).with_market(market.as_str()))?;

        let bytes = response
            .bytes()
            .map_err(|e| transport_error("fetch", url, e).with_market(market.as_str()))?;

        tracing::debug!(market = market.as_str(), bytes = bytes.len(), "Fetched feed");

        String::from_utf8(bytes.to_vec()).map_err(|e| {
            transport_error("fetch", url, format!("feed is not valid UTF-8: {}", e))
                .with_market(market.as_str())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        assert!(HttpFeedFetcher::new(Duration::from_secs(5)).is_ok());
    }
}
