//! KPI math over a monthly series.
//!
//! Pure calculations, no I/O. The aggregation step produces the ordered
//! series; this module reduces it to the four headline indicators shown in
//! the analytics view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One bucket of the monthly series.
///
/// `month` is `None` for the bucket of rows whose month value could not be
/// interpreted. That bucket participates in totals but is not a month for
/// trend purposes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    pub month: Option<NaiveDate>,
    pub total: f64,
}

impl MonthlyPoint {
    pub fn new(month: Option<NaiveDate>, total: f64) -> Self {
        Self { month, total }
    }
}

/// Headline indicators for the analytics view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    /// Sum of the metric over every bucket, the unparseable-month bucket
    /// included.
    pub ytd_total: f64,
    /// Relative change between the last two dated months, `None` when
    /// fewer than two dated months exist.
    pub mom_change: Option<f64>,
    /// Mean of the dated monthly totals divided by 30.
    pub daily_average: f64,
    /// Number of dated months in the series.
    pub months_analyzed: usize,
}

/// Reduce an ordered monthly series to its KPIs.
///
/// Expects the series in ascending month order (the order the aggregation
/// step emits). The month-over-month change divides by `max(previous, 1)`
/// so a zero-activity month cannot blow up the ratio.
pub fn compute_kpis(series: &[MonthlyPoint]) -> KpiSummary {
    let ytd_total: f64 = series.iter().map(|p| p.total).sum();

    let dated: Vec<f64> = series
        .iter()
        .filter(|p| p.month.is_some())
        .map(|p| p.total)
        .collect();

    let mom_change = if dated.len() >= 2 {
        let last = dated[dated.len() - 1];
        let prev = dated[dated.len() - 2];
        Some((last - prev) / prev.max(1.0))
    } else {
        None
    };

    let daily_average = if dated.is_empty() {
        0.0
    } else {
        let mean = dated.iter().sum::<f64>() / dated.len() as f64;
        mean / 30.0
    };

    KpiSummary {
        ytd_total,
        mom_change,
        daily_average,
        months_analyzed: dated.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── helpers ────────────────────────────────────────────────────────────

    fn month(y: i32, m: u32) -> Option<NaiveDate> {
        Some(NaiveDate::from_ymd_opt(y, m, 1).unwrap())
    }

    fn series(points: &[(Option<NaiveDate>, f64)]) -> Vec<MonthlyPoint> {
        points
            .iter()
            .map(|(m, t)| MonthlyPoint::new(*m, *t))
            .collect()
    }

    // ── KPIs ───────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_series() {
        let kpis = compute_kpis(&[]);
        assert_eq!(kpis.ytd_total, 0.0);
        assert_eq!(kpis.mom_change, None);
        assert_eq!(kpis.daily_average, 0.0);
        assert_eq!(kpis.months_analyzed, 0);
    }

    #[test]
    fn test_single_month_has_no_mom() {
        let kpis = compute_kpis(&series(&[(month(2025, 1), 300.0)]));
        assert_eq!(kpis.ytd_total, 300.0);
        assert_eq!(kpis.mom_change, None);
        assert_eq!(kpis.daily_average, 10.0);
        assert_eq!(kpis.months_analyzed, 1);
    }

    #[test]
    fn test_mom_uses_last_two_months() {
        let kpis = compute_kpis(&series(&[
            (month(2025, 1), 100.0),
            (month(2025, 2), 200.0),
            (month(2025, 3), 150.0),
        ]));
        // (150 - 200) / 200
        assert_eq!(kpis.mom_change, Some(-0.25));
        assert_eq!(kpis.ytd_total, 450.0);
        assert_eq!(kpis.months_analyzed, 3);
    }

    #[test]
    fn test_mom_divisor_floors_at_one() {
        let kpis = compute_kpis(&series(&[
            (month(2025, 1), 0.0),
            (month(2025, 2), 50.0),
        ]));
        // Previous month is zero, divisor floors at 1 instead of dividing
        // by zero.
        assert_eq!(kpis.mom_change, Some(50.0));
    }

    #[test]
    fn test_daily_average_is_mean_over_thirty() {
        let kpis = compute_kpis(&series(&[
            (month(2025, 1), 90.0),
            (month(2025, 2), 150.0),
        ]));
        // mean = 120, / 30 = 4
        assert_eq!(kpis.daily_average, 4.0);
    }

    #[test]
    fn test_undated_bucket_counts_toward_total_only() {
        let kpis = compute_kpis(&series(&[
            (None, 40.0),
            (month(2025, 1), 100.0),
            (month(2025, 2), 110.0),
        ]));
        assert_eq!(kpis.ytd_total, 250.0);
        assert_eq!(kpis.months_analyzed, 2);
        // MoM compares the two dated months, the undated bucket is ignored.
        assert_eq!(kpis.mom_change, Some(0.1));
        assert_eq!(kpis.daily_average, 3.5);
    }

    #[test]
    fn test_only_undated_rows() {
        let kpis = compute_kpis(&series(&[(None, 75.0)]));
        assert_eq!(kpis.ytd_total, 75.0);
        assert_eq!(kpis.months_analyzed, 0);
        assert_eq!(kpis.mom_change, None);
        assert_eq!(kpis.daily_average, 0.0);
    }
}
