//! Command orchestration layer.
//!
//! Provides high-level command functions that coordinate between
//! core domain logic and the storage and transport collaborators.

pub mod cycle;
