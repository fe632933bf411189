//! Async refresh orchestrator.
//!
//! Runs the analysis pipeline in a tokio task on a fixed cadence, sending
//! periodic [`DashboardSnapshot`]s through an `mpsc` channel so the TUI event
//! loop can consume them without any shared mutable state.

use std::time::Duration;

use cme_data::analysis::{run_pipeline, DashboardSnapshot, PipelineConfig};
use tokio::sync::mpsc;
use tokio::time;

// ── RefreshOrchestrator ───────────────────────────────────────────────────────

/// Background refresh coordinator.
///
/// Call [`RefreshOrchestrator::start`] to spin up the refresh loop in a
/// dedicated tokio task and receive a channel endpoint for
/// [`DashboardSnapshot`] updates.
pub struct RefreshOrchestrator {
    /// How often to re-run the pipeline.
    update_interval: Duration,
    /// Source selection and filters passed to every pipeline run.
    config: PipelineConfig,
}

impl RefreshOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Parameters
    /// - `update_interval_secs` – seconds between refreshes.
    /// - `config`               – pipeline configuration used on every cycle.
    pub fn new(update_interval_secs: u64, config: PipelineConfig) -> Self {
        Self {
            update_interval: Duration::from_secs(update_interval_secs),
            config,
        }
    }

    /// Start the refresh loop.
    ///
    /// Spawns a tokio task that runs the loop. Returns:
    /// - An `mpsc::Receiver<DashboardSnapshot>` for the caller to poll.
    /// - A [`RefreshHandle`] that can be used to abort the loop.
    pub fn start(self) -> (mpsc::Receiver<DashboardSnapshot>, RefreshHandle) {
        // Buffer a modest number of snapshots so slow consumers don't stall the loop.
        let (tx, rx) = mpsc::channel(16);

        let handle = tokio::spawn(async move {
            self.refresh_loop(tx).await;
        });

        (rx, RefreshHandle { handle })
    }

    // ── Private implementation ────────────────────────────────────────────

    /// The main refresh loop.
    ///
    /// Performs an immediate refresh on startup, then repeats on
    /// `update_interval`. The loop exits when the receiver side of the
    /// channel is closed.
    async fn refresh_loop(self, tx: mpsc::Sender<DashboardSnapshot>) {
        // Initial refresh so the TUI has data right away.
        self.fetch_and_send(&tx).await;

        let mut interval = time::interval(self.update_interval);
        // Consume the first tick which fires immediately; we already fetched above.
        interval.tick().await;

        loop {
            interval.tick().await;

            if tx.is_closed() {
                tracing::debug!("snapshot channel closed; exiting refresh loop");
                break;
            }

            self.fetch_and_send(&tx).await;
        }
    }

    /// Run the pipeline once and send the snapshot to the channel.
    ///
    /// The pipeline itself never fails; source problems arrive encoded in
    /// the snapshot.
    async fn fetch_and_send(&self, tx: &mpsc::Sender<DashboardSnapshot>) {
        let snapshot = run_pipeline(&self.config).await;

        if let Err(e) = tx.send(snapshot).await {
            tracing::warn!(error = %e, "failed to send dashboard snapshot; receiver dropped");
        }
    }
}

// ── RefreshHandle ─────────────────────────────────────────────────────────────

/// A handle to the background refresh task.
///
/// Drop or call [`RefreshHandle::abort`] to stop the loop.
pub struct RefreshHandle {
    handle: tokio::task::JoinHandle<()>,
}

impl RefreshHandle {
    /// Immediately abort the refresh loop.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
