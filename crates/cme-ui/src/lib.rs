//! Terminal UI layer for the PLV strategic dashboard.
//!
//! Provides themes, KPI cards, bar charts, the header, the four dashboard
//! tabs, and the main application event loop built on top of [`ratatui`]
//! for rendering intervention analytics in the terminal.

pub mod analitica_view;
pub mod app;
pub mod components;
pub mod placeholder_views;
pub mod themes;

pub use cme_core as core;
