//! Monthly analytics tab for the PLV dashboard TUI.
//!
//! Renders the KPI row and the monthly, per-distrito and per-tipo charts from
//! the latest snapshot.  Degraded snapshot states (no data anywhere, no
//! usable totals column) render explanatory screens instead of charts.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cme_core::formatting::{self, NOT_AVAILABLE};
use cme_core::kpi::KpiSummary;
use cme_core::models::Outcome;
use cme_data::aggregator::{CategoryTotal, MonthlyAnalysis};
use cme_data::analysis::DashboardSnapshot;

use crate::components::bar_chart::{BarItem, HorizontalBarChart};
use crate::components::kpi_cards::{self, KpiCard};
use crate::themes::Theme;

/// Tab subtitle, mirroring the analytical perspective heading.
pub const SUBTITLE: &str = "Evolución mensual y carga operativa";

const KPI_CAPTION: &str = "KPIs: Intervenciones totales, variación mensual, \
promedio diario, % con acta/denuncia, ratio intervención/agente, tiempos medios.";

// ── KPI cards ─────────────────────────────────────────────────────────────────

/// Build the four KPI cards from a computed summary.
///
/// The month-over-month variation shows `—` when fewer than two dated months
/// are available.
pub fn summary_cards<'a>(kpis: &KpiSummary, theme: &'a Theme) -> Vec<KpiCard<'a>> {
    let variation = kpis
        .mom_change
        .map(formatting::format_percent)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    vec![
        KpiCard::new(
            "Intervenciones (YTD)",
            formatting::format_count(kpis.ytd_total),
            theme,
        ),
        KpiCard::new("Variación mensual", variation, theme),
        KpiCard::new(
            "Promedio diario (aprox.)",
            formatting::format_number(kpis.daily_average, 1),
            theme,
        ),
        KpiCard::new("Meses analizados", kpis.months_analyzed.to_string(), theme),
    ]
}

// ── Charts ────────────────────────────────────────────────────────────────────

/// Monthly series chart, one bar per month in ascending order.
///
/// The bucket of rows without an interpretable month is labelled `sin fecha`.
pub fn monthly_chart<'a>(analysis: &MonthlyAnalysis, theme: &'a Theme) -> HorizontalBarChart<'a> {
    let items = analysis
        .series
        .iter()
        .map(|point| BarItem {
            label: formatting::format_month(point.month),
            value: point.total,
        })
        .collect();
    HorizontalBarChart::new("Intervenciones por mes", items, theme)
}

fn category_items(categories: &[CategoryTotal]) -> Vec<BarItem> {
    categories
        .iter()
        .map(|category| BarItem {
            label: category.label.clone(),
            value: category.total,
        })
        .collect()
}

// ── Main render ───────────────────────────────────────────────────────────────

/// Render the analytics tab for the given snapshot.
pub fn render_analitica(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    theme: &Theme,
) {
    match &snapshot.analysis {
        Outcome::Ready(analysis) => render_ready(frame, area, analysis, theme),
        Outcome::Empty => render_empty(frame, area, snapshot.year, theme),
        Outcome::Unavailable(reason) => render_unavailable(frame, area, reason, theme),
    }
}

fn render_ready(frame: &mut Frame, area: Rect, analysis: &MonthlyAnalysis, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // subtitle + caption
        Constraint::Length(4), // KPI cards
        Constraint::Min(0),    // charts
    ])
    .split(area);

    let heading = vec![
        Line::from(Span::styled(SUBTITLE, theme.bold)),
        Line::from(Span::styled(KPI_CAPTION, theme.caption)),
    ];
    frame.render_widget(Paragraph::new(Text::from(heading)), chunks[0]);

    let cards = summary_cards(&analysis.kpis, theme);
    kpi_cards::render_kpi_row(frame, chunks[1], &cards);

    // Monthly evolution on the left, breakdowns stacked on the right.
    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

    let monthly = monthly_chart(analysis, theme);
    frame.render_widget(Paragraph::new(Text::from(monthly.to_lines())), halves[0]);

    let right = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(halves[1]);

    if !analysis.by_distrito.is_empty() {
        let chart = HorizontalBarChart::new(
            "Intervenciones por distrito (YTD)",
            category_items(&analysis.by_distrito),
            theme,
        );
        frame.render_widget(Paragraph::new(Text::from(chart.to_lines())), right[0]);
    }
    if !analysis.by_tipo.is_empty() {
        let chart = HorizontalBarChart::new(
            "Intervenciones por tipo (YTD)",
            category_items(&analysis.by_tipo),
            theme,
        );
        frame.render_widget(Paragraph::new(Text::from(chart.to_lines())), right[1]);
    }
}

/// Render the "no data anywhere" screen with the ingestion hint.
pub fn render_empty(frame: &mut Frame, area: Rect, year: i32, theme: &Theme) {
    let hint = format!(
        "Sube datos a 'data/intervenciones_{year}.xlsx' o configura la conexión SQL en .env."
    );
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Sin datos de intervenciones", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(hint, theme.info)),
        Line::from(Span::styled("Pulsa 'q' para salir", theme.dim)),
    ];
    let paragraph = Paragraph::new(Text::from(text))
        .block(Block::default().borders(Borders::ALL).title(" CME-PLV "));
    frame.render_widget(paragraph, area);
}

/// Render the screen shown when rows exist but no metric could be computed.
pub fn render_unavailable(frame: &mut Frame, area: Rect, reason: &str, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Analítica no disponible", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(reason.to_string(), theme.dim)),
        Line::from(Span::styled("Pulsa 'q' para salir", theme.dim)),
    ];
    let paragraph = Paragraph::new(Text::from(text))
        .block(Block::default().borders(Borders::ALL).title(" CME-PLV "));
    frame.render_widget(paragraph, area);
}

/// Render the waiting screen shown before the first snapshot arrives.
pub fn render_waiting(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("Cargando datos de intervenciones...", theme.info)),
        Line::from(""),
        Line::from(Span::styled(
            "Esperando la primera actualización",
            theme.dim,
        )),
        Line::from(Span::styled("Pulsa 'q' para salir", theme.dim)),
    ];
    let paragraph = Paragraph::new(Text::from(text))
        .block(Block::default().borders(Borders::ALL).title(" CME-PLV "));
    frame.render_widget(paragraph, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
