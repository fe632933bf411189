use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ── CellValue ──────────────────────────────────────────────────────────────────

/// A single cell of an input table.
///
/// Source data arrives duck-typed (spreadsheet cells, SQL columns of unknown
/// shape), so every cell is carried as a tagged variant and downstream steps
/// pattern-match instead of guessing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    /// Free-form text.
    Text(String),
    /// Any numeric value (integers are widened to `f64`).
    Number(f64),
    /// A calendar date.
    Date(NaiveDate),
    /// Explicit missing marker. Replaces nulls, blanks, and values that
    /// failed coercion; never a crash.
    Missing,
}

impl CellValue {
    /// Numeric value of the cell, or `None` for anything that is not a
    /// [`CellValue::Number`]. Text is deliberately not parsed here: a
    /// non-numeric metric column contributes zero, it does not get guessed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Date value of the cell, if it holds one.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// `true` for the explicit missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Display label for grouping keys (distrito / tipo breakdowns).
    ///
    /// Returns `None` for missing cells so callers can exclude them from
    /// categorical groupings.
    pub fn label(&self) -> Option<String> {
        match self {
            CellValue::Text(s) => Some(s.trim().to_string()),
            CellValue::Number(n) => {
                if n.fract() == 0.0 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{n}"))
                }
            }
            CellValue::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            CellValue::Missing => None,
        }
    }
}

// ── RecordBatch ────────────────────────────────────────────────────────────────

/// An ordered tabular dataset: column names plus row-major cells.
///
/// The same type carries both the raw shape (free-form, case/spacing
/// inconsistent headers straight from the source) and the canonical shape
/// produced by [`crate::normalize::normalize_batch`]. Column order is always
/// the original declaration order; inference rules depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    /// Column names, in original declaration order.
    pub columns: Vec<String>,
    /// Row-major cell values. Every row has `columns.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl RecordBatch {
    /// Build a batch from headers and rows. Short rows are padded with
    /// [`CellValue::Missing`]; long rows are truncated to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Index of the column with the exact name `name`, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// `true` when the batch has a column with the exact name `name`.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterator over the cells of column `idx`, one per row.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &CellValue> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` when the batch holds no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `true` when column `idx` is numeric in the dataframe sense: at least
    /// one [`CellValue::Number`] cell and no [`CellValue::Text`] cells.
    /// Date columns do not count as numeric.
    pub fn column_is_numeric(&self, idx: usize) -> bool {
        let mut saw_number = false;
        for cell in self.column_cells(idx) {
            match cell {
                CellValue::Number(_) => saw_number = true,
                CellValue::Missing => {}
                CellValue::Text(_) | CellValue::Date(_) => return false,
            }
        }
        saw_number
    }
}

// ── Outcome ────────────────────────────────────────────────────────────────────

/// Graceful-degradation result used by every pipeline stage.
///
/// The pipeline never raises for data-quality reasons: a stage either
/// produces data, reports that there is none, or reports why the stage could
/// not run. Callers pattern-match explicitly instead of relying on the
/// truthiness of an empty container.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The stage produced usable data.
    Ready(T),
    /// The stage ran but there is nothing to show ("no data" placeholder).
    Empty,
    /// The stage could not run; the reason is shown to the user.
    Unavailable(String),
}

impl<T> Outcome<T> {
    /// `true` for [`Outcome::Ready`].
    pub fn is_ready(&self) -> bool {
        matches!(self, Outcome::Ready(_))
    }

    /// Reference to the payload, if ready.
    pub fn as_ready(&self) -> Option<&T> {
        match self {
            Outcome::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Map the ready payload, leaving `Empty` / `Unavailable` untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ready(value) => Outcome::Ready(f(value)),
            Outcome::Empty => Outcome::Empty,
            Outcome::Unavailable(reason) => Outcome::Unavailable(reason),
        }
    }
}

// ── DataOrigin ─────────────────────────────────────────────────────────────────

/// Where the currently displayed batch came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataOrigin {
    /// The SQL warehouse view.
    Remote,
    /// A spreadsheet on disk.
    LocalFile(PathBuf),
    /// Neither source produced data.
    None,
}

impl DataOrigin {
    /// Short label for the header info line.
    pub fn describe(&self) -> String {
        match self {
            DataOrigin::Remote => "sql".to_string(),
            DataOrigin::LocalFile(path) => path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| "archivo local".to_string()),
            DataOrigin::None => "sin datos".to_string(),
        }
    }
}
