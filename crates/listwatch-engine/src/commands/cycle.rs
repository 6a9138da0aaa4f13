//! Per-market fetch, compare, report and persist cycle.
//!
//! ## Cycle steps (in order):
//! 1. Stamp the fetch time and fetch the market feed
//! 2. Load the feed into a snapshot
//! 3. Read the latest persisted snapshot
//! 4. Compare; on a reportable diff render, log and notify
//! 5. Persist when first observed or structurally changed
//!
//! Fetch, load, compare and store failures abort the cycle before
//! anything is persisted. A failed notification is recorded in the
//! [`CycleReport`] and does not prevent persistence.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for cycles:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.

#![allow(clippy::result_large_err)]

use listwatch_core::diff::{compare, DiffOptions, DiffOutcome};
use listwatch_core::errors::{ExError, Result};
use listwatch_core::fetcher::FeedFetcher;
use listwatch_core::model::Market;
use listwatch_core::notifier::Notifier;
use listwatch_core::render::render_market_report;
use listwatch_core::snapshot::{content_digest, load_feed, FetchTimestamp, SnapshotStore};
use listwatch_core::{log_op_end, log_op_error, log_op_start};
use listwatch_core_types::schema::EVENT_REPORT;
use listwatch_core_types::CycleId;

/// Source of fetch timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> FetchTimestamp;
}

/// Wall clock in Taiwan local time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> FetchTimestamp {
        FetchTimestamp::now()
    }
}

/// Clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub FetchTimestamp);

impl Clock for FixedClock {
    fn now(&self) -> FetchTimestamp {
        self.0
    }
}

/// Collaborators and options shared by every cycle of a run
pub struct CycleContext<'a> {
    pub fetcher: &'a dyn FeedFetcher,
    pub store: &'a dyn SnapshotStore,
    pub notifier: &'a dyn Notifier,
    pub clock: &'a dyn Clock,
    pub diff_options: DiffOptions,
}

/// What a cycle found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No history existed; the snapshot became the baseline
    FirstObservation,
    /// Identical to the latest snapshot; nothing written
    Unchanged,
    /// Structurally different from the latest snapshot
    Changed {
        new_count: usize,
        updated_count: usize,
    },
}

/// Summary of one completed cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: CycleId,
    pub market: Market,
    pub fetched_at: FetchTimestamp,
    pub outcome: CycleOutcome,
    /// SHA-256 of the fetched snapshot's at-rest encoding
    pub digest: String,
    /// Rendered report, when there was something to report
    pub report: Option<String>,
    /// Location of the newly persisted snapshot
    pub persisted_to: Option<String>,
    /// Delivery failure of the report, if any
    pub notify_error: Option<ExError>,
}

/// Run one cycle for `market`.
///
/// # Errors
///
/// - `Transport` if the feed cannot be fetched
/// - `Parse`/`Schema` if the feed or the latest snapshot cannot be loaded,
///   or the two do not share a column set
/// - `Io`/`Persistence`/`AlreadyExists` on store failure
pub fn run_market_cycle(market: Market, ctx: &CycleContext<'_>) -> Result<CycleReport> {
    let cycle_id = CycleId::new();
    let span = tracing::info_span!("cycle", cycle_id = %cycle_id, market = market.as_str());
    let _guard = span.enter();

    log_op_start!("market_cycle", market = market.as_str());
    let start = std::time::Instant::now();

    let result = run_market_cycle_impl(market, ctx, cycle_id);

    let elapsed = start.elapsed().as_millis() as u64;
    match &result {
        Ok(report) => log_op_end!(
            "market_cycle",
            duration_ms = elapsed,
            market = market.as_str(),
            outcome = ?report.outcome,
            persisted = report.persisted_to.is_some()
        ),
        Err(e) => {
            let e_clone = e.clone();
            log_op_error!(
                "market_cycle",
                e_clone,
                duration_ms = elapsed,
                market = market.as_str()
            );
        }
    }
    result
}

fn run_market_cycle_impl(
    market: Market,
    ctx: &CycleContext<'_>,
    cycle_id: CycleId,
) -> Result<CycleReport> {
    let fetched_at = ctx.clock.now();
    let text = ctx.fetcher.fetch(market)?;
    let snapshot = load_feed(&text, market)?;
    let digest = content_digest(&snapshot)?;

    let previous = ctx.store.latest(market)?;
    let outcome = compare(
        &snapshot,
        previous.as_ref().map(|p| &p.snapshot),
        &ctx.diff_options,
    )?;

    let mut report = None;
    let mut notify_error = None;
    if let Some(diff) = outcome.reportable() {
        for change in &diff.changes {
            tracing::debug!(
                uid = %change.uid,
                column = %change.column,
                old = ?change.old,
                new = ?change.new,
                "Cell changed"
            );
        }

        let message = render_market_report(market, diff);
        tracing::info!(
            event = EVENT_REPORT,
            market = market.as_str(),
            new_count = diff.new_count(),
            updated_count = diff.updated_count(),
            "{}",
            message
        );

        if let Err(e) = ctx.notifier.notify(&message) {
            tracing::warn!(
                market = market.as_str(),
                err.code = e.code(),
                error = %e,
                "Report delivery failed; snapshot will still be persisted"
            );
            notify_error = Some(e);
        }
        report = Some(message);
    }

    let persisted_to = if outcome.should_persist() {
        Some(ctx.store.persist(&snapshot, fetched_at)?)
    } else {
        tracing::debug!(market = market.as_str(), "Snapshot unchanged, nothing persisted");
        None
    };

    let outcome = match &outcome {
        DiffOutcome::FirstObservation => CycleOutcome::FirstObservation,
        DiffOutcome::Unchanged => CycleOutcome::Unchanged,
        DiffOutcome::Changed(diff) => CycleOutcome::Changed {
            new_count: diff.new_count(),
            updated_count: diff.updated_count(),
        },
    };

    Ok(CycleReport {
        cycle_id,
        market,
        fetched_at,
        outcome,
        digest,
        report,
        persisted_to,
        notify_error,
    })
}

/// Run one cycle per market in order. A failing market does not stop the
/// ones after it.
pub fn run_cycles(
    markets: &[Market],
    ctx: &CycleContext<'_>,
) -> Vec<(Market, Result<CycleReport>)> {
    markets
        .iter()
        .map(|&market| (market, run_market_cycle(market, ctx)))
        .collect()
}
