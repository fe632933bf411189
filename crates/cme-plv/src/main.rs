mod bootstrap;

use anyhow::Result;
use cme_core::settings::Settings;
use cme_data::aggregator::Filters;
use cme_data::analysis::PipelineConfig;
use cme_runtime::orchestrator::RefreshOrchestrator;
use cme_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Pick up SQL connection variables from a local .env if present.
    dotenvy::dotenv().ok();

    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("CME-PLV v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Year: {}, Theme: {}, Refresh: {}s",
        settings.year,
        settings.theme,
        settings.refresh_rate
    );

    let filters = Filters::new(settings.distrito.clone(), settings.unidad.clone());
    let mut config = PipelineConfig::new(settings.year, filters);
    config.data_file = settings.data_file.clone();

    let orchestrator = RefreshOrchestrator::new(u64::from(settings.refresh_rate), config);
    let (rx, handle) = orchestrator.start();

    let app = App::new(&settings.theme, settings.year, settings.timezone.clone());

    // Run the TUI event loop. The loop exits on 'q' / Ctrl+C inside the TUI.
    // We also listen for Ctrl+C at the OS level so that signals received
    // while the terminal is in raw mode are handled cleanly.
    tokio::select! {
        result = app.run(rx) => {
            handle.abort();
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received; shutting down refresh task");
            handle.abort();
        }
    }

    Ok(())
}
