//! listwatch Engine - Orchestration layer
//!
//! Runs fetch-compare-report-persist cycles per market, coordinating the
//! core diff logic with the feed, notification and storage collaborators.
//! Also provides the network-backed collaborators.

pub mod commands;
pub mod transport;

pub use commands::cycle::{
    run_cycles, run_market_cycle, Clock, CycleContext, CycleOutcome, CycleReport, FixedClock,
    SystemClock,
};
