//! Operational, organizational and strategic tabs.
//!
//! These panels lay out the intended final structure but render static
//! content until the live feeds (CAD/112, RRHH tables, consolidated KPIs)
//! are wired in.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

use cme_core::formatting::NOT_AVAILABLE;

use crate::components::kpi_cards::{self, KpiCard};
use crate::themes::Theme;

// ── Operativa ─────────────────────────────────────────────────────────────────

/// Heading lines for the real-time operations tab.
pub fn operativa_heading_lines(theme: &Theme) -> Vec<Line<'_>> {
    vec![
        Line::from(Span::styled("Situación actual (placeholder)", theme.bold)),
        Line::from(Span::styled(
            "KPIs: Intervenciones activas, unidades en servicio, % cobertura, \
T. medio de respuesta (24h), mapa calor incidencias.",
            theme.caption,
        )),
        Line::from(Span::styled(
            "Esta pestaña está preparada para conectarse a datos en vivo \
(Grafana o SQL con refresco). De momento muestra widgets de ejemplo.",
            theme.info,
        )),
    ]
}

/// The four live-operations metric cards, all pending a data feed.
pub fn operativa_cards(theme: &Theme) -> Vec<KpiCard<'_>> {
    vec![
        KpiCard::new("Intervenciones activas", NOT_AVAILABLE.to_string(), theme),
        KpiCard::new("Unidades en servicio", NOT_AVAILABLE.to_string(), theme),
        KpiCard::new("% Cobertura operativa", NOT_AVAILABLE.to_string(), theme),
        KpiCard::new("T. medio respuesta (24h)", NOT_AVAILABLE.to_string(), theme),
    ]
}

pub fn operativa_footer_lines(theme: &Theme) -> Vec<Line<'_>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "🔧 Integra aquí una consulta SQL de las últimas 24–48h o un iframe de Grafana.",
            theme.dim,
        )),
    ]
}

/// Render the real-time operations tab.
pub fn render_operativa(frame: &mut Frame, area: Rect, theme: &Theme) {
    let chunks = Layout::vertical([
        Constraint::Length(4), // heading
        Constraint::Length(4), // metric cards
        Constraint::Min(0),    // footer
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Text::from(operativa_heading_lines(theme))),
        chunks[0],
    );
    let cards = operativa_cards(theme);
    kpi_cards::render_kpi_row(frame, chunks[1], &cards);
    frame.render_widget(
        Paragraph::new(Text::from(operativa_footer_lines(theme))),
        chunks[2],
    );
}

// ── Organizativa ──────────────────────────────────────────────────────────────

pub fn organizativa_lines(theme: &Theme) -> Vec<Line<'_>> {
    vec![
        Line::from(Span::styled(
            "Personas, procesos e innovación",
            theme.bold,
        )),
        Line::from(Span::styled(
            "KPIs: Plantilla total, % efectivos operativos, formación, \
propuestas, proyectos de innovación.",
            theme.caption,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Carga aquí tus tablas RRHH y de innovación; por defecto no hay datos locales.",
            theme.info,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "🔧 Enlaza vistas como bi.vw_rrhh_mensual y una tabla de \
propuestas/proyectos para gráficos.",
            theme.dim,
        )),
    ]
}

/// Render the people-and-processes tab.
pub fn render_organizativa(frame: &mut Frame, area: Rect, theme: &Theme) {
    frame.render_widget(Paragraph::new(Text::from(organizativa_lines(theme))), area);
}

// ── Estratégica ───────────────────────────────────────────────────────────────

pub fn estrategica_lines(theme: &Theme) -> Vec<Line<'_>> {
    vec![
        Line::from(Span::styled(
            "Balanced Scorecard – Visión estratégica",
            theme.bold,
        )),
        Line::from(Span::styled(
            "KPIs: Satisfacción ciudadana, incidentes graves/1000 hab., \
cumplimiento campañas, tiempo tramitación, % KPIs en verde, formación, innovación.",
            theme.caption,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Índice Global de Eficiencia Policial (IGEP)",
                theme.value,
            ),
            Span::styled(" – promedio ponderado de:", theme.text),
        ]),
        Line::from(Span::styled(
            "  • Eficiencia operativa (analítica)",
            theme.text,
        )),
        Line::from(Span::styled(
            "  • Saturación operativa (operativa)",
            theme.text,
        )),
        Line::from(Span::styled(
            "  • Desarrollo organizativo (organizativa)",
            theme.text,
        )),
        Line::from(Span::styled(
            "  • % KPIs estratégicos cumplidos",
            theme.text,
        )),
        Line::from(""),
        Line::from(Span::styled(
            "🔧 Cuando estén disponibles, conecta aquí los KPIs consolidados \
trimestrales/anuales.",
            theme.dim,
        )),
    ]
}

/// Render the balanced-scorecard tab.
pub fn render_estrategica(frame: &mut Frame, area: Rect, theme: &Theme) {
    frame.render_widget(Paragraph::new(Text::from(estrategica_lines(theme))), area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
