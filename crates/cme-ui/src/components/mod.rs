//! Reusable rendering components shared by the dashboard views.

pub mod bar_chart;
pub mod header;
pub mod kpi_cards;
