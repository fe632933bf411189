//! Column canonicalization and date coercion for raw input batches.
//!
//! Source tables arrive with inconsistent headers ("Mes Inicio", "TOTAL
//! Intervenciones", trailing spaces) and month values in half a dozen
//! shapes. Everything downstream works on one canonical layout, produced
//! here:
//!
//! - header names trimmed, lowercased, spaces replaced with underscores
//! - the first column containing "mes" renamed to `mes_inicio` and coerced
//!   to dates (unparseable values become [`CellValue::Missing`])
//! - the first column containing "total" renamed to `total_intervenciones`
//! - `distrito`, `unidad` and `tipo` pass through when present

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{CellValue, RecordBatch};

/// Canonical name of the month column.
pub const MONTH_COLUMN: &str = "mes_inicio";
/// Canonical name of the metric column.
pub const TOTAL_COLUMN: &str = "total_intervenciones";
/// Optional dimension columns recognized by the aggregation step.
pub const DISTRITO_COLUMN: &str = "distrito";
pub const UNIDAD_COLUMN: &str = "unidad";
pub const TIPO_COLUMN: &str = "tipo";

// ── Column names ───────────────────────────────────────────────────────────────

/// Canonical form of a header: trimmed, lowercased, spaces as underscores.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

// ── Date coercion ──────────────────────────────────────────────────────────────

/// Parse a textual date in any of the accepted shapes.
///
/// Accepted: ISO date, ISO datetime (`T` or space separated), `YYYY-MM`,
/// `DD/MM/YYYY`, `DD-MM-YYYY`. Datetimes keep only the date part.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }
    // Year-month shorthand pins the value to the first of the month.
    let year_month = Regex::new(r"^\d{4}-\d{2}$").expect("regex is valid");
    if year_month.is_match(text) {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d") {
            return Some(date);
        }
    }
    for fmt in ["%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date);
        }
    }
    None
}

/// Coerce one cell of the month column to a date.
///
/// Dates pass through, text goes through [`parse_date_text`], everything
/// else (numbers included) becomes [`CellValue::Missing`].
pub fn coerce_date_cell(cell: &CellValue) -> CellValue {
    match cell {
        CellValue::Date(d) => CellValue::Date(*d),
        CellValue::Text(s) => match parse_date_text(s) {
            Some(date) => CellValue::Date(date),
            None => CellValue::Missing,
        },
        CellValue::Number(_) | CellValue::Missing => CellValue::Missing,
    }
}

// ── Batch normalization ────────────────────────────────────────────────────────

/// Normalize a raw batch into the canonical layout.
///
/// Never fails: a batch with no recognizable month or total column comes
/// back with its remaining columns untouched, and the aggregation step
/// decides what it can still compute.
pub fn normalize_batch(batch: RecordBatch) -> RecordBatch {
    let mut batch = batch;
    batch.columns = batch
        .columns
        .iter()
        .map(|c| normalize_column_name(c))
        .collect();

    apply_month_column(&mut batch);
    apply_total_column(&mut batch);
    batch
}

/// Locate the month column and coerce its cells to dates.
///
/// An exact [`MONTH_COLUMN`] always wins; only when it is absent is the
/// first column containing "mes" renamed to it.
fn apply_month_column(batch: &mut RecordBatch) {
    let idx = match batch.column_index(MONTH_COLUMN) {
        Some(idx) => idx,
        None => {
            let Some(idx) = batch.columns.iter().position(|c| c.contains("mes")) else {
                tracing::debug!("no month column found in {:?}", batch.columns);
                return;
            };
            tracing::debug!(
                "renaming month column '{}' to '{}'",
                batch.columns[idx],
                MONTH_COLUMN
            );
            batch.columns[idx] = MONTH_COLUMN.to_string();
            idx
        }
    };
    for row in &mut batch.rows {
        if let Some(cell) = row.get_mut(idx) {
            *cell = coerce_date_cell(cell);
        }
    }
}

/// Rename the first column containing "total" to [`TOTAL_COLUMN`].
///
/// No type coercion happens here: whether the column is actually numeric is
/// checked when the metric is selected.
fn apply_total_column(batch: &mut RecordBatch) {
    if batch.has_column(TOTAL_COLUMN) {
        return;
    }
    let Some(idx) = batch.columns.iter().position(|c| c.contains("total")) else {
        tracing::debug!("no total column found in {:?}", batch.columns);
        return;
    };
    tracing::debug!(
        "renaming total column '{}' to '{}'",
        batch.columns[idx],
        TOTAL_COLUMN
    );
    batch.columns[idx] = TOTAL_COLUMN.to_string();
}
