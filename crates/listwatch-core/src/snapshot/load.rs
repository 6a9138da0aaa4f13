//! Snapshot loader.
//!
//! Turns raw CSV text into a [`Snapshot`]. Two entry points share one
//! table reader:
//!
//! - [`load_feed`] for text fetched from a market endpoint, which derives
//!   the uid from the market's company-code and application-date columns
//! - [`load_persisted`] for a previously written snapshot file, whose
//!   `uid` column was stored alongside the schema columns
//!
//! All values stay strings. Codes such as `0050` keep their leading
//! zeros and dates keep their source formatting. Empty cells are absent.

use crate::errors::{ExError, ListingError, Result};
use crate::model::{Cell, Market, Record, Snapshot};
use std::collections::HashSet;

/// Header of the uid column in the persisted form
pub const UID_COLUMN: &str = "uid";

/// A parsed CSV table: header plus rows of optional cells
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

fn read_table(text: &str) -> std::result::Result<Table, ListingError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(ListingError::Unparseable {
            reason: "no header row".to_string(),
        });
    }

    let mut seen = HashSet::with_capacity(headers.len());
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(ListingError::Unparseable {
                reason: format!("duplicate header `{}`", header),
            });
        }
    }

    // Short rows are padded with absent cells; long rows are rejected
    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > headers.len() {
            return Err(ListingError::Unparseable {
                reason: format!(
                    "row {} has {} fields, header has {}",
                    line + 1,
                    record.len(),
                    headers.len()
                ),
            });
        }
        let mut row: Vec<Option<String>> = record
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect();
        row.resize(headers.len(), None);
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

fn column_index(headers: &[String], column: &str) -> std::result::Result<usize, ListingError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| ListingError::MissingColumn {
            column: column.to_string(),
        })
}

/// Load a snapshot from a market feed.
///
/// Drops the market's decorative column when present and keys every row by
/// `companyCode-applicationDate`. Rows missing either uid part cannot be
/// keyed and are skipped with a warning.
///
/// # Errors
///
/// - `Parse` if the text is not a CSV table with a header, or a row is
///   longer than the header
/// - `Schema` if a uid-source column is missing or a uid repeats
pub fn load_feed(text: &str, market: Market) -> Result<Snapshot> {
    load_feed_inner(text, market)
        .map_err(|e| ExError::from(e).with_op("load_feed").with_market(market.as_str()))
}

fn load_feed_inner(text: &str, market: Market) -> std::result::Result<Snapshot, ListingError> {
    let config = market.config();
    let table = read_table(text)?;

    let dropped = config
        .drop_column
        .and_then(|col| table.headers.iter().position(|h| h == col));
    let code_idx = column_index(&table.headers, config.company_code_column)?;
    let date_idx = column_index(&table.headers, config.application_date_column)?;

    let kept: Vec<usize> = (0..table.headers.len())
        .filter(|i| Some(*i) != dropped)
        .collect();
    let columns: Vec<String> = kept.iter().map(|&i| table.headers[i].clone()).collect();

    let mut records = Vec::with_capacity(table.rows.len());
    for (line, row) in table.rows.into_iter().enumerate() {
        let (code, date) = match (&row[code_idx], &row[date_idx]) {
            (Some(code), Some(date)) => (code, date),
            _ => {
                tracing::warn!(
                    market = market.as_str(),
                    row = line + 1,
                    "Skipping feed row without company code or application date"
                );
                continue;
            }
        };
        let uid = format!("{}-{}", code, date);
        let cells = kept
            .iter()
            .map(|&i| Cell::new(table.headers[i].clone(), row[i].clone()))
            .collect();
        records.push(Record::new(uid, cells));
    }

    let snapshot = Snapshot::new(market, columns, records)?;
    tracing::debug!(
        market = market.as_str(),
        row_count = snapshot.len(),
        "Loaded feed snapshot"
    );
    Ok(snapshot)
}

/// Load a snapshot from its persisted at-rest form.
///
/// The `uid` column is used as the key and removed from the schema
/// columns; every other column is kept in file order.
///
/// # Errors
///
/// - `Parse` if the text is not a CSV table, a row is longer than the
///   header, or a uid is empty
/// - `Schema` if the `uid` column is missing or a uid repeats
pub fn load_persisted(text: &str, market: Market) -> Result<Snapshot> {
    load_persisted_inner(text, market).map_err(|e| {
        ExError::from(e)
            .with_op("load_persisted")
            .with_market(market.as_str())
    })
}

fn load_persisted_inner(
    text: &str,
    market: Market,
) -> std::result::Result<Snapshot, ListingError> {
    let table = read_table(text)?;
    let uid_idx = column_index(&table.headers, UID_COLUMN)?;

    let columns: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != uid_idx)
        .map(|(_, h)| h.clone())
        .collect();

    let mut records = Vec::with_capacity(table.rows.len());
    for (line, mut row) in table.rows.into_iter().enumerate() {
        let uid = row[uid_idx].take().ok_or_else(|| ListingError::Unparseable {
            reason: format!("row {} has an empty uid", line + 1),
        })?;
        let cells = table
            .headers
            .iter()
            .zip(row)
            .enumerate()
            .filter(|(i, _)| *i != uid_idx)
            .map(|(_, (header, value))| Cell::new(header.clone(), value))
            .collect();
        records.push(Record::new(uid, cells));
    }

    Snapshot::new(market, columns, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    const TWSE_FEED: &str = "\u{feff}索引,公司代號,公司簡稱,申請日期,進度\n\
1,1101,台泥,20240101,審議中\n\
2,0050,元大,20240115,\n";

    #[test]
    fn test_feed_drops_index_and_keys_rows() {
        let snap = load_feed(TWSE_FEED, Market::Twse).unwrap();
        assert_eq!(snap.columns(), &["公司代號", "公司簡稱", "申請日期", "進度"]);
        let uids: Vec<&str> = snap.uids().collect();
        assert_eq!(uids, vec!["1101-20240101", "0050-20240115"]);
    }

    #[test]
    fn test_feed_keeps_leading_zeros_and_absent_cells() {
        let snap = load_feed(TWSE_FEED, Market::Twse).unwrap();
        let rec = snap.get("0050-20240115").unwrap();
        assert_eq!(rec.value("公司代號"), Some("0050"));
        assert_eq!(rec.get("進度"), Some(None));
    }

    #[test]
    fn test_feed_missing_uid_column_is_schema_error() {
        let text = "索引,公司簡稱,申請日期\n1,台泥,20240101\n";
        let err = load_feed(text, Market::Twse).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Schema);
        assert_eq!(err.column(), Some("公司代號"));
        assert_eq!(err.market(), Some("twse"));
    }

    #[test]
    fn test_overlong_row_is_parse_error() {
        let text = "股票代號,申請日期\n6666,20240101,extra\n";
        let err = load_feed(text, Market::Tpex).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
    }

    #[test]
    fn test_short_row_is_padded_with_absent_cells() {
        let text = "股票代號,公司名稱,申請日期,備註\n6666,甲,20240101,x\n7777,乙,20240102\n";
        let snap = load_feed(text, Market::Tpex).unwrap();
        assert_eq!(snap.len(), 2);
        let rec = snap.get("7777-20240102").unwrap();
        assert_eq!(rec.value("公司名稱"), Some("乙"));
        assert_eq!(rec.get("備註"), Some(None));
    }

    #[test]
    fn test_short_persisted_row_is_padded() {
        let snap = load_persisted("uid,a,b\nx-1,1\n", Market::Twse).unwrap();
        assert_eq!(snap.get("x-1").unwrap().get("b"), Some(None));
    }

    #[test]
    fn test_empty_text_is_parse_error() {
        let err = load_feed("", Market::Tpex).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
    }

    #[test]
    fn test_duplicate_uid_is_schema_error() {
        let text = "股票代號,申請日期\n6666,20240101\n6666,20240101\n";
        let err = load_feed(text, Market::Tpex).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Schema);
        assert_eq!(err.uid(), Some("6666-20240101"));
    }

    #[test]
    fn test_unkeyable_rows_are_skipped() {
        let text = "股票代號,申請日期,公司名稱\n6666,20240101,甲\n,20240102,乙\n";
        let snap = load_feed(text, Market::Tpex).unwrap();
        assert_eq!(snap.len(), 1);
    }

    #[test]
    fn test_tpex_without_drop_column_keeps_all() {
        let text = "股票代號,公司名稱,申請日期\n6666,甲,20240101\n";
        let snap = load_feed(text, Market::Tpex).unwrap();
        assert_eq!(snap.columns().len(), 3);
    }

    #[test]
    fn test_persisted_form_uses_uid_column() {
        let text = "uid,公司代號,申請日期,進度\n1101-20240101,1101,20240101,\n";
        let snap = load_persisted(text, Market::Twse).unwrap();
        assert_eq!(snap.columns(), &["公司代號", "申請日期", "進度"]);
        let rec = snap.get("1101-20240101").unwrap();
        assert_eq!(rec.get("進度"), Some(None));
    }

    #[test]
    fn test_persisted_without_uid_is_schema_error() {
        let err = load_persisted("a,b\n1,2\n", Market::Twse).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Schema);
        assert_eq!(err.op(), Some("load_persisted"));
    }

    #[test]
    fn test_persisted_empty_uid_is_parse_error() {
        let err = load_persisted("uid,a\n,1\n", Market::Twse).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Parse);
    }
}
