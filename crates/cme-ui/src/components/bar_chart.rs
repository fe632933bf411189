use crate::themes::Theme;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Configuration controlling visual appearance of a bar chart.
pub struct BarChartConfig {
    /// Maximum width in terminal columns of the bar portion.
    pub bar_width: u16,
    /// Character used to draw bars.
    pub bar_char: char,
    /// Maximum width in terminal columns of the label column.
    pub max_label_width: usize,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            bar_width: 30,
            bar_char: '\u{2588}', // █  FULL BLOCK
            max_label_width: 18,
        }
    }
}

/// One labelled value in a horizontal bar chart.
#[derive(Debug, Clone)]
pub struct BarItem {
    pub label: String,
    pub value: f64,
}

// ── HorizontalBarChart ───────────────────────────────────────────────────────

/// Horizontal bar chart: a title line followed by one row per item.
///
/// Each row shows the label (right-padded to a common width), a bar whose
/// length is proportional to the largest value, and the formatted value.
pub struct HorizontalBarChart<'a> {
    /// Chart title rendered above the rows.
    pub title: &'a str,
    /// Items in display order; the caller decides the sorting.
    pub items: Vec<BarItem>,
    /// Theme from which colour styles are taken.
    pub theme: &'a Theme,
    /// Visual configuration.
    pub config: BarChartConfig,
}

impl<'a> HorizontalBarChart<'a> {
    /// Construct a new chart with the default configuration.
    pub fn new(title: &'a str, items: Vec<BarItem>, theme: &'a Theme) -> Self {
        Self {
            title,
            items,
            theme,
            config: BarChartConfig::default(),
        }
    }

    /// Render the chart as lines suitable for embedding in a [`Paragraph`].
    ///
    /// [`Paragraph`]: ratatui::widgets::Paragraph
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let mut lines: Vec<Line<'a>> =
            vec![Line::from(Span::styled(self.title, self.theme.chart_title))];

        if self.items.is_empty() {
            lines.push(Line::from(Span::styled("sin datos", self.theme.dim)));
            return lines;
        }

        let max_value = self
            .items
            .iter()
            .map(|item| item.value)
            .fold(0.0_f64, f64::max);
        let label_width = self
            .items
            .iter()
            .map(|item| UnicodeWidthStr::width(item.label.as_str()))
            .max()
            .unwrap_or(0)
            .min(self.config.max_label_width);

        for (i, item) in self.items.iter().enumerate() {
            let label = fit_label(&item.label, label_width);
            let padding = label_width.saturating_sub(UnicodeWidthStr::width(label.as_str()));

            let chars = if max_value > 0.0 {
                ((item.value / max_value) * self.config.bar_width as f64).round() as usize
            } else {
                0
            };
            // A positive value always gets at least one visible cell.
            let chars = if item.value > 0.0 { chars.max(1) } else { chars };

            let bar: String = std::iter::repeat(self.config.bar_char).take(chars).collect();

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}{}  ", label, " ".repeat(padding)),
                    self.theme.label,
                ),
                Span::styled(bar, self.theme.bar_style(i)),
                Span::styled(
                    format!(" {}", cme_core::formatting::format_count(item.value)),
                    self.theme.value,
                ),
            ]));
        }

        lines
    }
}

/// Shorten `label` to at most `max_width` display columns, appending `…`
/// when truncated.
fn fit_label(label: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(label) <= max_width {
        return label.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in label.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::Theme;

    fn items(values: &[(&str, f64)]) -> Vec<BarItem> {
        values
            .iter()
            .map(|(label, value)| BarItem {
                label: label.to_string(),
                value: *value,
            })
            .collect()
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_chart_title_is_first_line() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new(
            "Intervenciones por mes",
            items(&[("2025-01", 100.0)]),
            &theme,
        );
        let lines = chart.to_lines();
        assert_eq!(line_text(&lines[0]), "Intervenciones por mes");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_chart_bars_are_proportional() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new(
            "Intervenciones por distrito (YTD)",
            items(&[("Centro", 200.0), ("Marítimo", 100.0)]),
            &theme,
        );
        let lines = chart.to_lines();

        // The bar span is the second span of each row.
        let top_bar = lines[1].spans[1].content.chars().count();
        let half_bar = lines[2].spans[1].content.chars().count();
        assert_eq!(top_bar, 30, "largest value fills the configured width");
        assert_eq!(half_bar, 15, "half the value gets half the bar");
    }

    #[test]
    fn test_chart_zero_value_has_no_bar() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new(
            "Intervenciones por tipo (YTD)",
            items(&[("Tráfico", 50.0), ("Otros", 0.0)]),
            &theme,
        );
        let lines = chart.to_lines();
        assert!(lines[2].spans[1].content.is_empty());
    }

    #[test]
    fn test_chart_small_positive_value_gets_one_cell() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new(
            "Intervenciones por mes",
            items(&[("2025-01", 10_000.0), ("2025-02", 1.0)]),
            &theme,
        );
        let lines = chart.to_lines();
        assert_eq!(lines[2].spans[1].content.chars().count(), 1);
    }

    #[test]
    fn test_chart_value_formatted_with_separators() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new(
            "Intervenciones por mes",
            items(&[("2025-01", 12_480.0)]),
            &theme,
        );
        let lines = chart.to_lines();
        let row = line_text(&lines[1]);
        assert!(row.contains("12,480"), "row was: {row}");
    }

    #[test]
    fn test_chart_labels_share_column_width() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new(
            "Intervenciones por distrito (YTD)",
            items(&[("Centro", 10.0), ("Poblats Marítims", 20.0)]),
            &theme,
        );
        let lines = chart.to_lines();

        // Both label spans (first span) must occupy the same display width.
        let w1 = UnicodeWidthStr::width(lines[1].spans[0].content.as_ref());
        let w2 = UnicodeWidthStr::width(lines[2].spans[0].content.as_ref());
        assert_eq!(w1, w2);
    }

    #[test]
    fn test_chart_empty_items() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new("Intervenciones por mes", Vec::new(), &theme);
        let lines = chart.to_lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(line_text(&lines[1]), "sin datos");
    }

    #[test]
    fn test_chart_bars_alternate_styles() {
        let theme = Theme::dark();
        let chart = HorizontalBarChart::new(
            "Intervenciones por tipo (YTD)",
            items(&[("Tráfico", 30.0), ("Seguridad", 20.0), ("Convivencia", 10.0)]),
            &theme,
        );
        let lines = chart.to_lines();
        assert_eq!(lines[1].spans[1].style, theme.bar_fill);
        assert_eq!(lines[2].spans[1].style, theme.bar_alt);
        assert_eq!(lines[3].spans[1].style, theme.bar_fill);
    }

    // ── fit_label ─────────────────────────────────────────────────────────────

    #[test]
    fn test_fit_label_short_unchanged() {
        assert_eq!(fit_label("Centro", 18), "Centro");
    }

    #[test]
    fn test_fit_label_truncates_with_ellipsis() {
        let fitted = fit_label("Distrito con un nombre muy largo", 10);
        assert!(fitted.ends_with('…'), "fitted: {fitted}");
        assert!(UnicodeWidthStr::width(fitted.as_str()) <= 10);
    }
}
