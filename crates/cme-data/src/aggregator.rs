//! Filtering, monthly grouping and breakdowns over a normalized batch.
//!
//! Everything here is pure: a canonical [`RecordBatch`] goes in, an
//! [`Outcome`] comes out. Data-quality problems (no rows, no usable metric
//! column) are reported through the outcome, never as errors.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use cme_core::kpi::{compute_kpis, KpiSummary, MonthlyPoint};
use cme_core::models::{Outcome, RecordBatch};
use cme_core::normalize::{DISTRITO_COLUMN, MONTH_COLUMN, TIPO_COLUMN, TOTAL_COLUMN, UNIDAD_COLUMN};
use serde::{Deserialize, Serialize};

// ── Filters ───────────────────────────────────────────────────────────────────

/// Case-insensitive substring filters over the dimension columns.
///
/// A filter on a column the batch does not have is a no-op; rows whose
/// dimension cell is missing never match an active filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters {
    pub distrito: Option<String>,
    pub unidad: Option<String>,
}

impl Filters {
    pub fn new(distrito: Option<String>, unidad: Option<String>) -> Self {
        Self { distrito, unidad }
    }

    /// `true` when at least one filter is set to a non-blank value.
    pub fn is_active(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        set(&self.distrito) || set(&self.unidad)
    }
}

// ── Result types ──────────────────────────────────────────────────────────────

/// Metric total for one category label (one distrito, one tipo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub label: String,
    pub total: f64,
}

/// Complete analysis of one batch: the ordered monthly series, its KPIs and
/// the year-to-date breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAnalysis {
    /// Monthly buckets in ascending month order. When rows without an
    /// interpretable month exist, their bucket comes first.
    pub series: Vec<MonthlyPoint>,
    pub kpis: KpiSummary,
    /// Per-distrito totals, descending. Empty when the column is absent.
    pub by_distrito: Vec<CategoryTotal>,
    /// Per-tipo totals, descending. Empty when the column is absent.
    pub by_tipo: Vec<CategoryTotal>,
    /// Name of the column the totals were summed from.
    pub metric_column: String,
}

// ── InterventionAggregator ────────────────────────────────────────────────────

/// Stateless analysis over a normalized batch.
pub struct InterventionAggregator;

impl InterventionAggregator {
    /// Run the full analysis: filters, metric selection, monthly series,
    /// KPIs and breakdowns.
    pub fn analyze(batch: &RecordBatch, filters: &Filters) -> Outcome<MonthlyAnalysis> {
        if batch.is_empty() {
            return Outcome::Empty;
        }

        let filtered = Self::apply_filters(batch, filters);
        if filtered.is_empty() {
            return Outcome::Empty;
        }

        let Some(metric_idx) = Self::select_metric_column(&filtered) else {
            return Outcome::Unavailable("sin columna de totales".to_string());
        };

        let series = Self::monthly_series(&filtered, metric_idx);
        let kpis = compute_kpis(&series);
        let by_distrito = Self::category_totals(&filtered, DISTRITO_COLUMN, metric_idx);
        let by_tipo = Self::category_totals(&filtered, TIPO_COLUMN, metric_idx);

        Outcome::Ready(MonthlyAnalysis {
            series,
            kpis,
            by_distrito,
            by_tipo,
            metric_column: filtered.columns[metric_idx].clone(),
        })
    }

    /// Apply both dimension filters, returning the surviving rows.
    pub fn apply_filters(batch: &RecordBatch, filters: &Filters) -> RecordBatch {
        let mut out = batch.clone();
        Self::retain_matching(&mut out, DISTRITO_COLUMN, filters.distrito.as_deref());
        Self::retain_matching(&mut out, UNIDAD_COLUMN, filters.unidad.as_deref());
        out
    }

    // ── Private ───────────────────────────────────────────────────────────────

    /// Keep rows whose `column` cell contains `needle`, case-insensitively.
    fn retain_matching(batch: &mut RecordBatch, column: &str, needle: Option<&str>) {
        let Some(needle) = needle else { return };
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return;
        }
        let Some(idx) = batch.column_index(column) else {
            return;
        };

        batch.rows.retain(|row| {
            row.get(idx)
                .and_then(|cell| cell.label())
                .map(|label| label.to_lowercase().contains(&needle))
                .unwrap_or(false)
        });
    }

    /// Pick the metric column: `total_intervenciones` when present,
    /// otherwise the first numeric column in declaration order.
    fn select_metric_column(batch: &RecordBatch) -> Option<usize> {
        if let Some(idx) = batch.column_index(TOTAL_COLUMN) {
            return Some(idx);
        }
        (0..batch.columns.len()).find(|&idx| batch.column_is_numeric(idx))
    }

    /// Sum the metric per exact month value.
    ///
    /// Rows whose month is missing (or when the batch has no month column
    /// at all) land in a single `None` bucket, which `BTreeMap` orders
    /// before every dated bucket.
    fn monthly_series(batch: &RecordBatch, metric_idx: usize) -> Vec<MonthlyPoint> {
        let month_idx = batch.column_index(MONTH_COLUMN);

        let mut buckets: BTreeMap<Option<NaiveDate>, f64> = BTreeMap::new();
        for row in &batch.rows {
            let month = month_idx
                .and_then(|idx| row.get(idx))
                .and_then(|cell| cell.as_date());
            let value = row
                .get(metric_idx)
                .and_then(|cell| cell.as_number())
                .unwrap_or(0.0);
            *buckets.entry(month).or_insert(0.0) += value;
        }

        buckets
            .into_iter()
            .map(|(month, total)| MonthlyPoint::new(month, total))
            .collect()
    }

    /// Sum the metric per category label, descending by total.
    ///
    /// Rows with a missing category cell are excluded; an absent column
    /// yields an empty breakdown.
    fn category_totals(
        batch: &RecordBatch,
        column: &str,
        metric_idx: usize,
    ) -> Vec<CategoryTotal> {
        let Some(cat_idx) = batch.column_index(column) else {
            return Vec::new();
        };

        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for row in &batch.rows {
            let Some(label) = row.get(cat_idx).and_then(|cell| cell.label()) else {
                continue;
            };
            let value = row
                .get(metric_idx)
                .and_then(|cell| cell.as_number())
                .unwrap_or(0.0);
            *totals.entry(label).or_insert(0.0) += value;
        }

        let mut out: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(label, total)| CategoryTotal { label, total })
            .collect();
        out.sort_by(|a, b| {
            b.total
                .partial_cmp(&a.total)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.label.cmp(&b.label))
        });
        out
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cme_core::models::CellValue;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(n: f64) -> CellValue {
        CellValue::Number(n)
    }

    fn date(y: i32, m: u32) -> CellValue {
        CellValue::Date(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    /// Canonical batch: month, total, distrito, unidad, tipo.
    fn make_batch(rows: Vec<Vec<CellValue>>) -> RecordBatch {
        RecordBatch::new(
            vec![
                MONTH_COLUMN.to_string(),
                TOTAL_COLUMN.to_string(),
                DISTRITO_COLUMN.to_string(),
                UNIDAD_COLUMN.to_string(),
                TIPO_COLUMN.to_string(),
            ],
            rows,
        )
    }

    fn sample_batch() -> RecordBatch {
        make_batch(vec![
            vec![date(2025, 1), num(100.0), text("Centro"), text("UDO"), text("Tráfico")],
            vec![date(2025, 1), num(50.0), text("Marítimo"), text("GOE"), text("Seguridad")],
            vec![date(2025, 2), num(80.0), text("Centro"), text("UDO"), text("Tráfico")],
            vec![
                CellValue::Missing,
                num(20.0),
                text("Centro"),
                text("UDO"),
                text("Convivencia"),
            ],
        ])
    }

    fn filter_distrito(needle: &str) -> Filters {
        Filters::new(Some(needle.to_string()), None)
    }

    // ── Filters ───────────────────────────────────────────────────────────────

    #[test]
    fn test_filters_is_active() {
        assert!(!Filters::default().is_active());
        assert!(!Filters::new(Some("  ".to_string()), None).is_active());
        assert!(filter_distrito("centro").is_active());
        assert!(Filters::new(None, Some("goe".to_string())).is_active());
    }

    #[test]
    fn test_filter_case_insensitive_substring() {
        let batch = sample_batch();
        let filtered = InterventionAggregator::apply_filters(&batch, &filter_distrito("CENT"));
        assert_eq!(filtered.row_count(), 3);
        let filtered = InterventionAggregator::apply_filters(&batch, &filter_distrito("marítimo"));
        assert_eq!(filtered.row_count(), 1);
    }

    #[test]
    fn test_filter_on_missing_cells_excludes_rows() {
        let batch = make_batch(vec![
            vec![date(2025, 1), num(10.0), CellValue::Missing, text("UDO"), text("Tráfico")],
            vec![date(2025, 1), num(20.0), text("Centro"), text("UDO"), text("Tráfico")],
        ]);
        let filtered = InterventionAggregator::apply_filters(&batch, &filter_distrito("c"));
        assert_eq!(filtered.row_count(), 1);
    }

    #[test]
    fn test_filter_absent_column_is_noop() {
        let batch = RecordBatch::new(
            vec![MONTH_COLUMN.to_string(), TOTAL_COLUMN.to_string()],
            vec![vec![date(2025, 1), num(10.0)]],
        );
        let filtered = InterventionAggregator::apply_filters(&batch, &filter_distrito("centro"));
        assert_eq!(filtered.row_count(), 1);
    }

    #[test]
    fn test_both_filters_combine() {
        let batch = sample_batch();
        let filters = Filters::new(Some("centro".to_string()), Some("udo".to_string()));
        let filtered = InterventionAggregator::apply_filters(&batch, &filters);
        assert_eq!(filtered.row_count(), 3);

        let filters = Filters::new(Some("centro".to_string()), Some("goe".to_string()));
        let filtered = InterventionAggregator::apply_filters(&batch, &filters);
        assert_eq!(filtered.row_count(), 0);
    }

    // ── Outcome states ────────────────────────────────────────────────────────

    #[test]
    fn test_analyze_empty_batch() {
        let outcome = InterventionAggregator::analyze(&RecordBatch::default(), &Filters::default());
        assert_eq!(outcome, Outcome::Empty);
    }

    #[test]
    fn test_analyze_empty_after_filter() {
        let outcome =
            InterventionAggregator::analyze(&sample_batch(), &filter_distrito("ruzafa"));
        assert_eq!(outcome, Outcome::Empty);
    }

    #[test]
    fn test_analyze_no_metric_column() {
        let batch = RecordBatch::new(
            vec![MONTH_COLUMN.to_string(), DISTRITO_COLUMN.to_string()],
            vec![vec![date(2025, 1), text("Centro")]],
        );
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        assert_eq!(
            outcome,
            Outcome::Unavailable("sin columna de totales".to_string())
        );
    }

    // ── Metric selection ──────────────────────────────────────────────────────

    #[test]
    fn test_metric_prefers_total_column() {
        let batch = RecordBatch::new(
            vec![
                "otros_numeros".to_string(),
                TOTAL_COLUMN.to_string(),
            ],
            vec![vec![num(999.0), num(10.0)], vec![num(999.0), num(20.0)]],
        );
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        let analysis = outcome.as_ready().unwrap();
        assert_eq!(analysis.metric_column, TOTAL_COLUMN);
        assert_eq!(analysis.kpis.ytd_total, 30.0);
    }

    #[test]
    fn test_metric_falls_back_to_first_numeric() {
        let batch = RecordBatch::new(
            vec![
                MONTH_COLUMN.to_string(),
                DISTRITO_COLUMN.to_string(),
                "efectivos".to_string(),
                "horas".to_string(),
            ],
            vec![
                vec![date(2025, 1), text("Centro"), num(5.0), num(40.0)],
                vec![date(2025, 2), text("Centro"), num(7.0), num(60.0)],
            ],
        );
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        let analysis = outcome.as_ready().unwrap();
        // First numeric column in declaration order wins; dates don't count.
        assert_eq!(analysis.metric_column, "efectivos");
        assert_eq!(analysis.kpis.ytd_total, 12.0);
    }

    #[test]
    fn test_non_numeric_total_column_sums_to_zero() {
        let batch = RecordBatch::new(
            vec![MONTH_COLUMN.to_string(), TOTAL_COLUMN.to_string()],
            vec![vec![date(2025, 1), text("muchos")]],
        );
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        // The canonical name wins even when its cells are not numeric;
        // text cells simply contribute nothing.
        let analysis = outcome.as_ready().unwrap();
        assert_eq!(analysis.kpis.ytd_total, 0.0);
    }

    // ── Monthly series ────────────────────────────────────────────────────────

    #[test]
    fn test_series_groups_and_sorts_months() {
        let outcome = InterventionAggregator::analyze(&sample_batch(), &Filters::default());
        let analysis = outcome.as_ready().unwrap();

        let months: Vec<Option<NaiveDate>> =
            analysis.series.iter().map(|p| p.month).collect();
        assert_eq!(
            months,
            vec![
                None,
                NaiveDate::from_ymd_opt(2025, 1, 1),
                NaiveDate::from_ymd_opt(2025, 2, 1),
            ]
        );
        // January sums both rows.
        assert_eq!(analysis.series[1].total, 150.0);
        assert_eq!(analysis.series[0].total, 20.0);
    }

    #[test]
    fn test_series_no_undated_bucket_when_all_dated() {
        let batch = make_batch(vec![
            vec![date(2025, 1), num(10.0), text("Centro"), text("UDO"), text("Tráfico")],
        ]);
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        let analysis = outcome.as_ready().unwrap();
        assert_eq!(analysis.series.len(), 1);
        assert!(analysis.series[0].month.is_some());
    }

    #[test]
    fn test_series_all_rows_undated_without_month_column() {
        let batch = RecordBatch::new(
            vec![TOTAL_COLUMN.to_string()],
            vec![vec![num(5.0)], vec![num(7.0)]],
        );
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        let analysis = outcome.as_ready().unwrap();
        assert_eq!(analysis.series.len(), 1);
        assert_eq!(analysis.series[0].month, None);
        assert_eq!(analysis.series[0].total, 12.0);
        assert_eq!(analysis.kpis.months_analyzed, 0);
    }

    // ── KPIs through analyze ──────────────────────────────────────────────────

    #[test]
    fn test_analyze_kpis() {
        let outcome = InterventionAggregator::analyze(&sample_batch(), &Filters::default());
        let analysis = outcome.as_ready().unwrap();

        assert_eq!(analysis.kpis.ytd_total, 250.0);
        assert_eq!(analysis.kpis.months_analyzed, 2);
        // (80 - 150) / 150
        let mom = analysis.kpis.mom_change.unwrap();
        assert!((mom - (-70.0 / 150.0)).abs() < 1e-9);
    }

    // ── Breakdowns ────────────────────────────────────────────────────────────

    #[test]
    fn test_breakdown_by_distrito_sorted_descending() {
        let outcome = InterventionAggregator::analyze(&sample_batch(), &Filters::default());
        let analysis = outcome.as_ready().unwrap();

        let labels: Vec<&str> = analysis
            .by_distrito
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Centro", "Marítimo"]);
        assert_eq!(analysis.by_distrito[0].total, 200.0);
        assert_eq!(analysis.by_distrito[1].total, 50.0);
    }

    #[test]
    fn test_breakdown_ties_sorted_by_label() {
        let batch = make_batch(vec![
            vec![date(2025, 1), num(10.0), text("Zaidía"), text("UDO"), text("B")],
            vec![date(2025, 1), num(10.0), text("Abastos"), text("UDO"), text("A")],
        ]);
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        let analysis = outcome.as_ready().unwrap();

        let labels: Vec<&str> = analysis
            .by_distrito
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Abastos", "Zaidía"]);
    }

    #[test]
    fn test_breakdown_skips_missing_category() {
        let batch = make_batch(vec![
            vec![date(2025, 1), num(10.0), CellValue::Missing, text("UDO"), text("Tráfico")],
            vec![date(2025, 1), num(20.0), text("Centro"), text("UDO"), text("Tráfico")],
        ]);
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        let analysis = outcome.as_ready().unwrap();

        assert_eq!(analysis.by_distrito.len(), 1);
        assert_eq!(analysis.by_distrito[0].label, "Centro");
        // The missing-distrito row still counts toward the total.
        assert_eq!(analysis.kpis.ytd_total, 30.0);
    }

    #[test]
    fn test_breakdown_empty_when_column_absent() {
        let batch = RecordBatch::new(
            vec![MONTH_COLUMN.to_string(), TOTAL_COLUMN.to_string()],
            vec![vec![date(2025, 1), num(10.0)]],
        );
        let outcome = InterventionAggregator::analyze(&batch, &Filters::default());
        let analysis = outcome.as_ready().unwrap();
        assert!(analysis.by_distrito.is_empty());
        assert!(analysis.by_tipo.is_empty());
    }

    #[test]
    fn test_analyze_respects_filters() {
        let outcome =
            InterventionAggregator::analyze(&sample_batch(), &filter_distrito("marítimo"));
        let analysis = outcome.as_ready().unwrap();
        assert_eq!(analysis.kpis.ytd_total, 50.0);
        assert_eq!(analysis.by_distrito.len(), 1);
        assert_eq!(analysis.by_tipo[0].label, "Seguridad");
    }
}
