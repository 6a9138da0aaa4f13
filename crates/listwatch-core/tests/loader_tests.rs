//! Loader and at-rest encoding tests against realistic market feeds.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use listwatch_core::errors::ExErrorKind;
use listwatch_core::model::Market;
use listwatch_core::snapshot::{
    content_digest, encode_csv, load_feed, load_persisted, FetchTimestamp, MemorySnapshotStore,
    SnapshotStore,
};

const TWSE_FEED: &str = "\u{feff}索引,公司代號,公司簡稱,申請日期,董事長,實收資本額(元),進度\n\
1,1101,\"台泥, 股份\",20240101,張三,\"1,000,000\",審議中\n\
2,0050,元大,20240115,李四,500000,\n";

const TPEX_FEED: &str = "股票代號,公司名稱,申請日期,主辦券商\n\
6666,甲公司,113/01/02,某證券\n\
7777,乙公司,113/01/05,\n";

#[test]
fn test_twse_feed_round_trips_through_at_rest_form() {
    let snap = load_feed(TWSE_FEED, Market::Twse).unwrap();
    let bytes = encode_csv(&snap).unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.starts_with("uid,公司代號,公司簡稱,申請日期,董事長,實收資本額(元),進度\n"));
    assert!(!text.contains("索引"));

    let reloaded = load_persisted(&text, Market::Twse).unwrap();
    assert_eq!(reloaded, snap);
    assert_eq!(reloaded.columns(), snap.columns());
}

#[test]
fn test_quoted_fields_are_kept_verbatim() {
    let snap = load_feed(TWSE_FEED, Market::Twse).unwrap();
    let rec = snap.get("1101-20240101").unwrap();
    assert_eq!(rec.value("公司簡稱"), Some("台泥, 股份"));
    assert_eq!(rec.value("實收資本額(元)"), Some("1,000,000"));
}

#[test]
fn test_tpex_feed_keys_by_stock_code_and_keeps_roc_dates() {
    let snap = load_feed(TPEX_FEED, Market::Tpex).unwrap();
    let uids: Vec<&str> = snap.uids().collect();
    assert_eq!(uids, vec!["6666-113/01/02", "7777-113/01/05"]);
    assert_eq!(snap.get("7777-113/01/05").unwrap().get("主辦券商"), Some(None));
}

#[test]
fn test_twse_columns_do_not_satisfy_tpex() {
    let err = load_feed(TWSE_FEED, Market::Tpex).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::Schema);
    assert_eq!(err.column(), Some("股票代號"));
}

#[test]
fn test_digest_is_stable_and_content_sensitive() {
    let a = load_feed(TPEX_FEED, Market::Tpex).unwrap();
    let b = load_feed(TPEX_FEED, Market::Tpex).unwrap();
    assert_eq!(content_digest(&a).unwrap(), content_digest(&b).unwrap());

    let changed = TPEX_FEED.replace("某證券", "他證券");
    let c = load_feed(&changed, Market::Tpex).unwrap();
    assert_ne!(content_digest(&a).unwrap(), content_digest(&c).unwrap());
}

#[test]
fn test_memory_store_returns_greatest_timestamp() {
    let store = MemorySnapshotStore::new();
    let first = load_feed(TPEX_FEED, Market::Tpex).unwrap();
    let second = load_feed(&TPEX_FEED.replace("某證券", "他證券"), Market::Tpex).unwrap();

    store
        .persist(&second, FetchTimestamp::parse("20240102090000").unwrap())
        .unwrap();
    store
        .persist(&first, FetchTimestamp::parse("20240101090000").unwrap())
        .unwrap();

    let latest = store.latest(Market::Tpex).unwrap().unwrap();
    assert_eq!(latest.fetched_at.to_string(), "20240102090000");
    assert_eq!(latest.snapshot, second);
    assert!(store.latest(Market::Twse).unwrap().is_none());
}
