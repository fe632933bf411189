//! Data layer for the PLV strategic dashboard.
//!
//! Responsible for acquiring intervention rows from the SQL view or from
//! local spreadsheet/CSV exports, normalizing them to the canonical schema,
//! aggregating monthly series and breakdowns and running the top-level
//! refresh pipeline.

pub mod aggregator;
pub mod analysis;
pub mod reader;
pub mod remote;

pub use cme_core as core;
