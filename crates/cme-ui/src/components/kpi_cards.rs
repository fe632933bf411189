use crate::themes::Theme;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

// ── KpiCard ──────────────────────────────────────────────────────────────────

/// A single metric card: a short label above its formatted value.
///
/// Cards are rendered side by side in a row of equal widths, each inside its
/// own bordered block.
pub struct KpiCard<'a> {
    /// Metric name shown on the first line.
    pub label: &'a str,
    /// Pre-formatted value shown on the second line.
    pub value: String,
    /// Theme providing colour styles.
    pub theme: &'a Theme,
}

impl<'a> KpiCard<'a> {
    /// Construct a new card.
    pub fn new(label: &'a str, value: String, theme: &'a Theme) -> Self {
        Self {
            label,
            value,
            theme,
        }
    }

    /// Render the card body as two lines: the dimmed label, then the value.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        vec![
            Line::from(Span::styled(self.label, self.theme.kpi_label)),
            Line::from(Span::styled(self.value.clone(), self.theme.kpi_value)),
        ]
    }
}

/// Render a row of equally sized bordered cards across `area`.
pub fn render_kpi_row(frame: &mut Frame, area: Rect, cards: &[KpiCard]) {
    if cards.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len() as u32))
        .collect();
    let chunks = Layout::horizontal(constraints).split(area);

    for (card, chunk) in cards.iter().zip(chunks.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(card.theme.kpi_border);
        let paragraph = Paragraph::new(Text::from(card.to_lines())).block(block);
        frame.render_widget(paragraph, *chunk);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_kpi_card_to_lines() {
        let theme = Theme::dark();
        let card = KpiCard::new("Intervenciones (YTD)", "12,480".to_string(), &theme);
        let lines = card.to_lines();

        assert_eq!(lines.len(), 2, "card body must have 2 lines");
        let label: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        let value: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(label, "Intervenciones (YTD)");
        assert_eq!(value, "12,480");
    }

    #[test]
    fn test_kpi_card_value_uses_kpi_value_style() {
        let theme = Theme::dark();
        let card = KpiCard::new("Meses analizados", "7".to_string(), &theme);
        let lines = card.to_lines();
        assert_eq!(lines[1].spans[0].style, theme.kpi_value);
    }

    #[test]
    fn test_render_kpi_row_does_not_panic() {
        let backend = TestBackend::new(100, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let cards = vec![
            KpiCard::new("Intervenciones (YTD)", "12,480".to_string(), &theme),
            KpiCard::new("Variación mensual", "-12.3%".to_string(), &theme),
            KpiCard::new("Promedio diario (aprox.)", "41.6".to_string(), &theme),
            KpiCard::new("Meses analizados", "10".to_string(), &theme),
        ];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_kpi_row(frame, area, &cards);
            })
            .unwrap();
    }

    #[test]
    fn test_render_kpi_row_empty_does_not_panic() {
        let backend = TestBackend::new(100, 6);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_kpi_row(frame, area, &[]);
            })
            .unwrap();
    }

    #[test]
    fn test_render_kpi_row_narrow_terminal_does_not_panic() {
        let backend = TestBackend::new(20, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let cards = vec![
            KpiCard::new("Intervenciones (YTD)", "12,480".to_string(), &theme),
            KpiCard::new("Variación mensual", "—".to_string(), &theme),
        ];

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_kpi_row(frame, area, &cards);
            })
            .unwrap();
    }
}
