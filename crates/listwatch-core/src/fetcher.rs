//! Feed fetching interface.

use crate::errors::{ExError, ExErrorKind};
use crate::model::Market;
use std::collections::HashMap;

/// Retrieve the raw CSV text of a market's listing feed.
#[allow(clippy::result_large_err)]
pub trait FeedFetcher: Send + Sync {
    /// Fetch the current full table for `market`.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Transport` when the feed cannot be retrieved.
    fn fetch(&self, market: Market) -> Result<String, ExError>;
}

/// Fetcher serving fixed texts per market, for tests and offline runs.
/// Markets without a text fail with `Transport`.
#[derive(Debug, Clone, Default)]
pub struct StaticFeedFetcher {
    feeds: HashMap<Market, String>,
}

impl StaticFeedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, market: Market, text: impl Into<String>) -> Self {
        self.feeds.insert(market, text.into());
        self
    }
}

impl FeedFetcher for StaticFeedFetcher {
    fn fetch(&self, market: Market) -> Result<String, ExError> {
        self.feeds.get(&market).cloned().ok_or_else(|| {
            ExError::new(ExErrorKind::Transport)
                .with_op("fetch")
                .with_market(market.as_str())
                .with_message("no feed configured")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_fetcher_serves_configured_market() {
        let fetcher = StaticFeedFetcher::new().with_feed(Market::Twse, "a,b\n");
        assert_eq!(fetcher.fetch(Market::Twse).unwrap(), "a,b\n");
    }

    #[test]
    fn test_static_fetcher_missing_market_is_transport_error() {
        let fetcher = StaticFeedFetcher::new();
        let err = fetcher.fetch(Market::Tpex).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Transport);
        assert_eq!(err.market(), Some("tpex"));
    }
}
