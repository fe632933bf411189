//! End-to-end refresh pipeline: acquire, normalize, analyze.
//!
//! One call to [`run_pipeline`] produces a complete [`DashboardSnapshot`]
//! regardless of what went wrong underneath. Source acquisition is
//! remote-first: the SQL view when configured and reachable, then the local
//! export directory, then an explicit "no data" state.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use cme_core::models::{DataOrigin, Outcome, RecordBatch};
use cme_core::normalize::normalize_batch;
use cme_core::DashboardError;

use crate::aggregator::{Filters, InterventionAggregator, MonthlyAnalysis};
use crate::reader::{self, DEFAULT_DATA_DIR};
use crate::remote;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Everything one refresh cycle needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Campaign year, used for the SQL query and the conventional file name.
    pub year: i32,
    /// Explicit export file. When set it wins over directory discovery.
    pub data_file: Option<PathBuf>,
    /// Directory scanned for `intervenciones_*` exports.
    pub data_dir: PathBuf,
    pub filters: Filters,
}

impl PipelineConfig {
    pub fn new(year: i32, filters: Filters) -> Self {
        Self {
            year,
            data_file: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            filters,
        }
    }
}

/// Result of one refresh cycle, ready for rendering.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub year: i32,
    /// Where the rows came from, for the header and the empty-state hint.
    pub origin: DataOrigin,
    pub filters: Filters,
    /// Raw rows acquired from the source, before filtering.
    pub rows_loaded: usize,
    /// Wall-clock seconds spent acquiring the rows.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent normalizing and aggregating.
    pub analysis_time_seconds: f64,
    pub analysis: Outcome<MonthlyAnalysis>,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Run one full refresh cycle.
///
/// Never returns an error: acquisition failures degrade to the next source
/// and data-quality problems surface through the snapshot's [`Outcome`].
pub async fn run_pipeline(config: &PipelineConfig) -> DashboardSnapshot {
    // ── Step 1: acquire rows, remote first ──
    let load_start = std::time::Instant::now();
    let (origin, batch) = load_source(config).await;
    let load_time = load_start.elapsed().as_secs_f64();
    let rows_loaded = batch.as_ref().map_or(0, RecordBatch::row_count);

    // ── Step 2: normalize to the canonical schema ──
    let analysis_start = std::time::Instant::now();
    let batch = batch.map(normalize_batch);

    // ── Step 3: filter and aggregate ──
    let analysis = match &batch {
        Some(batch) => InterventionAggregator::analyze(batch, &config.filters),
        None => Outcome::Empty,
    };
    let analysis_time = analysis_start.elapsed().as_secs_f64();

    tracing::debug!(
        rows = rows_loaded,
        load_seconds = load_time,
        analysis_seconds = analysis_time,
        "refresh cycle complete"
    );

    DashboardSnapshot {
        generated_at: Utc::now(),
        year: config.year,
        origin,
        filters: config.filters.clone(),
        rows_loaded,
        load_time_seconds: load_time,
        analysis_time_seconds: analysis_time,
        analysis,
    }
}

/// Try the SQL view, then the local export directory.
async fn load_source(config: &PipelineConfig) -> (DataOrigin, Option<RecordBatch>) {
    match remote::fetch_intervenciones(config.year).await {
        Ok(batch) if !batch.is_empty() => {
            tracing::debug!(rows = batch.row_count(), "using remote source");
            return (DataOrigin::Remote, Some(batch));
        }
        Ok(_) => {
            tracing::debug!("remote source returned no rows, trying local files");
        }
        Err(DashboardError::Config(reason)) => {
            tracing::debug!(%reason, "remote source not configured");
        }
        Err(err) => {
            tracing::warn!(error = %err, "remote source failed, trying local files");
        }
    }

    let Some(path) = reader::resolve_local_file(
        config.data_file.as_deref(),
        &config.data_dir,
        config.year,
    ) else {
        tracing::debug!(dir = %config.data_dir.display(), "no local export found");
        return (DataOrigin::None, None);
    };

    match reader::load_local_batch(&path) {
        Ok(batch) => {
            tracing::debug!(path = %path.display(), rows = batch.row_count(), "using local source");
            (DataOrigin::LocalFile(path), Some(batch))
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "local export failed to load");
            (DataOrigin::None, None)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Make the remote branch deterministically unconfigured.
    fn clear_sql_env() {
        for var in [
            "DATABASE_URL",
            "SQL_SERVER",
            "SQL_DATABASE",
            "SQL_USERNAME",
            "SQL_PASSWORD",
        ] {
            std::env::remove_var(var);
        }
    }

    fn write_export(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn config_for(dir: &TempDir, year: i32) -> PipelineConfig {
        let mut config = PipelineConfig::new(year, Filters::default());
        config.data_dir = dir.path().to_path_buf();
        config
    }

    const SAMPLE_CSV: &str = "\
Mes Inicio,Total Intervenciones,Distrito
2025-01-01,100,Centro
2025-02-01,80,Centro
";

    // ── Pipeline ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_pipeline_loads_local_export() {
        clear_sql_env();
        let dir = TempDir::new().unwrap();
        let path = write_export(&dir, "intervenciones_2025.csv", SAMPLE_CSV);

        let snapshot = run_pipeline(&config_for(&dir, 2025)).await;

        assert_eq!(snapshot.origin, DataOrigin::LocalFile(path));
        assert_eq!(snapshot.year, 2025);
        assert_eq!(snapshot.rows_loaded, 2);
        assert!(snapshot.load_time_seconds >= 0.0);
        assert!(snapshot.analysis_time_seconds >= 0.0);
        let analysis = snapshot.analysis.as_ready().unwrap();
        assert_eq!(analysis.kpis.ytd_total, 180.0);
        assert_eq!(analysis.kpis.months_analyzed, 2);
    }

    #[tokio::test]
    async fn test_pipeline_normalizes_headers() {
        clear_sql_env();
        let dir = TempDir::new().unwrap();
        write_export(
            &dir,
            "intervenciones_2025.csv",
            "  Mes Inicio ,Total registros\n2025-03,40\n",
        );

        let snapshot = run_pipeline(&config_for(&dir, 2025)).await;

        let analysis = snapshot.analysis.as_ready().unwrap();
        assert_eq!(analysis.metric_column, "total_intervenciones");
        assert_eq!(analysis.series.len(), 1);
        assert_eq!(
            analysis.series[0].month,
            chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
        );
    }

    #[tokio::test]
    async fn test_pipeline_without_any_source() {
        clear_sql_env();
        let dir = TempDir::new().unwrap();

        let snapshot = run_pipeline(&config_for(&dir, 2025)).await;

        assert_eq!(snapshot.origin, DataOrigin::None);
        assert_eq!(snapshot.rows_loaded, 0);
        assert_eq!(snapshot.analysis, Outcome::Empty);
    }

    #[tokio::test]
    async fn test_pipeline_explicit_data_file() {
        clear_sql_env();
        let dir = TempDir::new().unwrap();
        // A decoy matching the conventional name, plus the explicit pick.
        write_export(&dir, "intervenciones_2025.csv", SAMPLE_CSV);
        let explicit = write_export(
            &dir,
            "revision.csv",
            "mes_inicio,total_intervenciones\n2025-05-01,7\n",
        );

        let mut config = config_for(&dir, 2025);
        config.data_file = Some(explicit.clone());
        let snapshot = run_pipeline(&config).await;

        assert_eq!(snapshot.origin, DataOrigin::LocalFile(explicit));
        let analysis = snapshot.analysis.as_ready().unwrap();
        assert_eq!(analysis.kpis.ytd_total, 7.0);
    }

    #[tokio::test]
    async fn test_pipeline_unreadable_file_degrades_to_no_data() {
        clear_sql_env();
        let dir = TempDir::new().unwrap();

        let mut config = config_for(&dir, 2025);
        config.data_file = Some(dir.path().join("missing.xlsx"));
        let snapshot = run_pipeline(&config).await;

        assert_eq!(snapshot.origin, DataOrigin::None);
        assert_eq!(snapshot.analysis, Outcome::Empty);
    }

    #[tokio::test]
    async fn test_pipeline_applies_filters() {
        clear_sql_env();
        let dir = TempDir::new().unwrap();
        write_export(
            &dir,
            "intervenciones_2025.csv",
            "\
mes_inicio,total_intervenciones,distrito
2025-01-01,100,Centro
2025-01-01,50,Marítimo
",
        );

        let mut config = config_for(&dir, 2025);
        config.filters = Filters::new(Some("marítimo".to_string()), None);
        let snapshot = run_pipeline(&config).await;

        let analysis = snapshot.analysis.as_ready().unwrap();
        assert_eq!(analysis.kpis.ytd_total, 50.0);
        assert_eq!(snapshot.filters.distrito.as_deref(), Some("marítimo"));
    }
}
