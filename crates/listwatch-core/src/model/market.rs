//! Supported markets and their per-feed configuration.
//!
//! Each market publishes its own listing-application table with its own
//! column names. The differences the loader cares about are captured in a
//! static [`MarketConfig`] row per market.

use crate::errors::ListingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column holding the application date in both feeds.
pub const APPLICATION_DATE_COLUMN: &str = "申請日期";

/// Static configuration for one market feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    /// Public open-data endpoint serving the full table as CSV
    pub feed_url: &'static str,
    /// Decorative index column removed before keying, if the feed has one
    pub drop_column: Option<&'static str>,
    /// Column holding the company / stock code (first half of the uid)
    pub company_code_column: &'static str,
    /// Column holding the application date (second half of the uid)
    pub application_date_column: &'static str,
}

const TWSE: MarketConfig = MarketConfig {
    feed_url: "https://www.twse.com.tw/company/applylistingCsvAndHtml?type=open_data",
    drop_column: Some("索引"),
    company_code_column: "公司代號",
    application_date_column: APPLICATION_DATE_COLUMN,
};

const TPEX: MarketConfig = MarketConfig {
    feed_url: "https://www.tpex.org.tw/web/regular_emerging/apply_schedule/applicant/applicant_companies_download_UTF-8.php?l=zh-tw&y=ALL",
    drop_column: None,
    company_code_column: "股票代號",
    application_date_column: APPLICATION_DATE_COLUMN,
};

/// A listing-application feed
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    /// Taiwan Stock Exchange
    Twse,
    /// Taipei Exchange
    Tpex,
}

impl Market {
    /// Every supported market, in processing order
    pub const ALL: [Market; 2] = [Market::Twse, Market::Tpex];

    /// Lower-case identifier used in paths and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Twse => "twse",
            Market::Tpex => "tpex",
        }
    }

    /// Upper-case label used as the report title
    pub fn label(&self) -> &'static str {
        match self {
            Market::Twse => "TWSE",
            Market::Tpex => "TPEX",
        }
    }

    pub fn config(&self) -> &'static MarketConfig {
        match self {
            Market::Twse => &TWSE,
            Market::Tpex => &TPEX,
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Market {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "twse" => Ok(Market::Twse),
            "tpex" => Ok(Market::Tpex),
            _ => Err(ListingError::UnknownMarket {
                market: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("TWSE".parse::<Market>().unwrap(), Market::Twse);
        assert_eq!("tpex".parse::<Market>().unwrap(), Market::Tpex);
        assert_eq!(" Tpex ".parse::<Market>().unwrap(), Market::Tpex);
    }

    #[test]
    fn test_parse_unknown_market() {
        let err = "nyse".parse::<Market>().unwrap_err();
        assert_eq!(
            err,
            ListingError::UnknownMarket {
                market: "nyse".to_string()
            }
        );
    }

    #[test]
    fn test_only_twse_drops_index_column() {
        assert_eq!(Market::Twse.config().drop_column, Some("索引"));
        assert_eq!(Market::Tpex.config().drop_column, None);
    }

    #[test]
    fn test_serde_uses_lowercase_identifier() {
        let json = serde_json::to_string(&Market::Twse).unwrap();
        assert_eq!(json, "\"twse\"");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for market in Market::ALL {
            assert_eq!(market.to_string().parse::<Market>().unwrap(), market);
        }
    }
}
