//! Runtime orchestration layer for the PLV strategic dashboard.
//!
//! Coordinates the data layer and the TUI: a background task re-runs the
//! analysis pipeline on a fixed cadence and streams snapshots to the
//! presentation layer.

pub mod orchestrator;

pub use cme_core as core;
pub use cme_data as data;
