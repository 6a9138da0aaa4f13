#![allow(clippy::unwrap_used, clippy::expect_used)]

use listwatch_core::errors::{ExError, ExErrorKind, ListingError};
use listwatch_core::model::Market;

#[test]
fn test_unknown_market_is_invalid_input() {
    let err: ExError = "nyse".parse::<Market>().unwrap_err().into();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.code(), "ERR_INVALID_INPUT");
    assert_eq!(err.market(), Some("nyse"));
}

#[test]
fn test_listing_errors_map_to_parse_or_schema() {
    let cases = [
        (
            ListingError::Unparseable {
                reason: "ragged row".to_string(),
            },
            ExErrorKind::Parse,
        ),
        (
            ListingError::MissingColumn {
                column: "uid".to_string(),
            },
            ExErrorKind::Schema,
        ),
        (
            ListingError::DuplicateUid {
                uid: "1101-20240101".to_string(),
            },
            ExErrorKind::Schema,
        ),
        (
            ListingError::ColumnMismatch {
                only_in_new: vec!["a".to_string()],
                only_in_old: vec![],
            },
            ExErrorKind::Schema,
        ),
        (
            ListingError::MarketMismatch {
                new: "twse".to_string(),
                old: "tpex".to_string(),
            },
            ExErrorKind::Schema,
        ),
    ];

    for (listing, kind) in cases {
        let message = listing.to_string();
        let err = ExError::from(listing);
        assert_eq!(err.kind(), kind);
        assert_eq!(err.message(), message);
    }
}

#[test]
fn test_duplicate_uid_carries_uid_context() {
    let err = ExError::from(ListingError::DuplicateUid {
        uid: "1101-20240101".to_string(),
    })
    .with_op("load_feed");
    assert_eq!(err.uid(), Some("1101-20240101"));
    assert!(err.to_string().contains("(uid: 1101-20240101)"));
}
