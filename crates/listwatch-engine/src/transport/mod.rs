//! Network-backed collaborators: the HTTP feed fetcher and the LINE
//! Notify notifier.

pub mod http_fetcher;
pub mod line;

pub use http_fetcher::HttpFeedFetcher;
pub use line::{LineNotifier, LINE_NOTIFY_URL};

use listwatch_core::errors::{ExError, ExErrorKind};

pub(crate) fn transport_error(op: &str, url: &str, err: impl std::fmt::Display) -> ExError {
    ExError::new(ExErrorKind::Transport)
        .with_op(op.to_string())
        .with_path(url.to_string())
        .with_message(err.to_string())
}
