use crate::themes::Theme;
use ratatui::text::{Line, Span};

/// Badge placed before the application title.
pub const BADGE: &str = "🚔";

/// Application title, shown in caps in the first header line.
pub const TITLE: &str = "CUADRO DE MANDO ESTRATÉGICO – PLV";

/// One-line summary of the four dashboard perspectives.
pub const CAPTION: &str =
    "Analítico mensual · Operativo tiempo real · Organizativo · Estratégico";

/// Dashboard header rendering five lines:
///
/// 1. Badge and application title (ALL CAPS).
/// 2. The perspectives caption.
/// 3. A 60-column `=` separator.
/// 4. Year, data origin and timezone in `[ año | fuente | zona ]` format.
/// 5. An empty line.
pub struct Header<'a> {
    /// Campaign year being analyzed.
    pub year: i32,
    /// Short description of where the data came from (e.g. "sql", a file name).
    pub origin: &'a str,
    /// Human-readable timezone string (e.g. "Europe/Madrid").
    pub timezone: &'a str,
    /// Theme providing colour styles for each part of the header.
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Construct a new header.
    pub fn new(year: i32, origin: &'a str, timezone: &'a str, theme: &'a Theme) -> Self {
        Self {
            year,
            origin,
            timezone,
            theme,
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly five lines.
    ///
    /// The returned lines are:
    ///
    /// 1. `"🚔 CUADRO DE MANDO ESTRATÉGICO – PLV"`
    /// 2. `"Analítico mensual · Operativo tiempo real · Organizativo · Estratégico"`
    /// 3. `"============================================================"` (60 `=` chars)
    /// 4. `"[ 2025 | sql | europe/madrid ]"`
    /// 5. `""`
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);

        vec![
            // Title line.
            Line::from(vec![
                Span::styled(BADGE, self.theme.header_badge),
                Span::styled(format!(" {TITLE}"), self.theme.header),
            ]),
            // Caption line.
            Line::from(Span::styled(CAPTION, self.theme.caption)),
            // Separator line.
            Line::from(Span::styled(separator, self.theme.separator)),
            // Year / origin / timezone info line.
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                Span::styled(self.year.to_string(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.origin.to_lowercase(), self.theme.value),
                Span::styled(" | ", self.theme.label),
                Span::styled(self.timezone.to_lowercase(), self.theme.value),
                Span::styled(" ]", self.theme.label),
            ]),
            // Empty line.
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
