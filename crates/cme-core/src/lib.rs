//! Core domain layer for the PLV strategic dashboard.
//!
//! Holds the tabular data model shared by every ingestion source, the
//! column canonicalization rules, the KPI math, display formatting,
//! CLI settings with last-used persistence, and timezone helpers.

pub mod error;
pub mod formatting;
pub mod kpi;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
pub use models::{CellValue, DataOrigin, Outcome, RecordBatch};
