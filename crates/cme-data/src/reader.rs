//! Local spreadsheet and CSV ingestion for the PLV dashboard.
//!
//! Reads intervention exports dropped under `data/` (or an explicit
//! `--data-file` path) into a raw [`RecordBatch`] for normalization
//! downstream. Excel files go through `calamine`, CSV through the `csv`
//! crate.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader as _};
use cme_core::error::{DashboardError, Result};
use cme_core::models::{CellValue, RecordBatch};
use tracing::{debug, warn};

/// Conventional drop location for manual exports.
pub const DEFAULT_DATA_DIR: &str = "data";

// ── Public API ────────────────────────────────────────────────────────────────

/// Find all intervention export files under `data_dir`, sorted by path.
///
/// An export file is named `intervenciones*` with an `xlsx`, `xls` or `csv`
/// extension.
pub fn find_data_files(data_dir: &Path) -> Vec<PathBuf> {
    if !data_dir.exists() {
        debug!("Data path does not exist: {}", data_dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(data_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_export_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Resolve which local file to load.
///
/// Priority:
/// 1. The explicit `data_file` path when given (even if it does not exist;
///    the load step reports the failure). A directory here means "search
///    that directory instead of the default one".
/// 2. `{data_dir}/intervenciones_{year}.xlsx` when present.
/// 3. The last export file found under `data_dir` (file names carry the
///    year, so the lexicographically greatest is the most recent).
pub fn resolve_local_file(
    data_file: Option<&Path>,
    data_dir: &Path,
    year: i32,
) -> Option<PathBuf> {
    if let Some(path) = data_file {
        if path.is_dir() {
            return find_data_files(path).pop();
        }
        return Some(path.to_path_buf());
    }

    let conventional = data_dir.join(format!("intervenciones_{year}.xlsx"));
    if conventional.exists() {
        return Some(conventional);
    }

    find_data_files(data_dir).pop()
}

/// Load a local export into a raw batch, dispatching on the extension.
///
/// The file is read as-is: no year filtering and no column interpretation
/// happen here.
pub fn load_local_batch(path: &Path) -> Result<RecordBatch> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "xlsx" | "xls" | "xlsm" => read_spreadsheet(path),
        "csv" => read_csv(path),
        other => Err(DashboardError::Spreadsheet {
            path: path.to_path_buf(),
            message: format!("unsupported file type '{other}'"),
        }),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// `true` when `path` looks like an intervention export.
fn is_export_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    name.starts_with("intervenciones") && matches!(ext.as_str(), "xlsx" | "xls" | "csv")
}

/// Read the first worksheet of an Excel file.
///
/// The first row is taken as the header; every other row becomes cells.
fn read_spreadsheet(path: &Path) -> Result<RecordBatch> {
    let mut workbook = open_workbook_auto(path).map_err(|e| DashboardError::Spreadsheet {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let Some(sheet_name) = sheet_names.first().cloned() else {
        return Err(DashboardError::Spreadsheet {
            path: path.to_path_buf(),
            message: "workbook has no sheets".to_string(),
        });
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| DashboardError::Spreadsheet {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut rows_iter = range.rows();
    let Some(header_row) = rows_iter.next() else {
        debug!("Spreadsheet {} is empty", path.display());
        return Ok(RecordBatch::default());
    };

    let columns: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let text = header_text(cell);
            if i == 0 { strip_bom(&text) } else { text }
        })
        .collect();

    let rows: Vec<Vec<CellValue>> = rows_iter
        .map(|row| row.iter().map(sheet_cell_to_value).collect())
        .collect();

    debug!(
        "Read {} rows from sheet '{}' of {}",
        rows.len(),
        sheet_name,
        path.display()
    );

    Ok(RecordBatch::new(columns, rows))
}

/// Header cell to column name.
fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Map one spreadsheet cell into the shared cell model.
fn sheet_cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Missing,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Missing
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Date(naive.date()),
            None => CellValue::Missing,
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) => CellValue::Missing,
    }
}

/// Read a CSV export. Fields are typed per cell: empty becomes missing,
/// plain numbers become numeric, everything else stays text.
fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DashboardError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let headers = rdr
        .headers()
        .map_err(|e| DashboardError::Csv {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .clone();

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                strip_bom(h)
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for record in rdr.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                warn!("Skipping malformed CSV record in {}: {}", path.display(), e);
                continue;
            }
        };
        rows.push(record.iter().map(csv_field_to_value).collect());
    }

    debug!("Read {} rows from {}", rows.len(), path.display());

    Ok(RecordBatch::new(columns, rows))
}

/// Type a CSV field the way a dataframe would.
fn csv_field_to_value(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Missing;
    }
    if let Ok(n) = trimmed.parse::<f64>() {
        if n.is_finite() {
            return CellValue::Number(n);
        }
    }
    CellValue::Text(trimmed.to_string())
}

/// Remove a UTF-8 byte order mark some exports prepend to the first header.
fn strip_bom(s: &str) -> String {
    s.trim_start_matches('\u{feff}').to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
