//! Main application state and TUI event loop for the PLV dashboard.
//!
//! [`App`] owns the theme, the active tab, and the last received
//! [`DashboardSnapshot`].  It drives the tabbed event loop.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Paragraph, Tabs},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use cme_core::time_utils::{format_clock, resolve_timezone};
use cme_data::analysis::DashboardSnapshot;

use crate::analitica_view;
use crate::components::header::Header;
use crate::placeholder_views;
use crate::themes::Theme;

// ── DashboardTab ──────────────────────────────────────────────────────────────

/// Which dashboard tab the TUI is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardTab {
    /// Monthly intervention analytics.
    Analitica,
    /// Real-time operations (placeholder until live feeds exist).
    Operativa,
    /// People, processes and innovation (placeholder).
    Organizativa,
    /// Balanced scorecard (placeholder).
    Estrategica,
}

impl DashboardTab {
    /// Tabs in display order.
    pub const ALL: [DashboardTab; 4] = [
        DashboardTab::Analitica,
        DashboardTab::Operativa,
        DashboardTab::Organizativa,
        DashboardTab::Estrategica,
    ];

    /// Title shown in the tab bar.
    pub fn title(&self) -> &'static str {
        match self {
            DashboardTab::Analitica => "📊 Analítica (mensual)",
            DashboardTab::Operativa => "🛰️ Operativa (tiempo real)",
            DashboardTab::Organizativa => "🏛️ Organizativa",
            DashboardTab::Estrategica => "🎯 Estratégica",
        }
    }

    /// Position of this tab within [`DashboardTab::ALL`].
    pub fn index(&self) -> usize {
        match self {
            DashboardTab::Analitica => 0,
            DashboardTab::Operativa => 1,
            DashboardTab::Organizativa => 2,
            DashboardTab::Estrategica => 3,
        }
    }

    /// The tab to the right, wrapping around at the end.
    pub fn next(&self) -> DashboardTab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The tab to the left, wrapping around at the start.
    pub fn previous(&self) -> DashboardTab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state for the PLV dashboard TUI.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Currently selected tab.
    pub tab: DashboardTab,
    /// Campaign year being analysed.
    pub year: i32,
    /// Human-readable timezone string.
    pub timezone: String,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    /// Most recent snapshot, `None` until the first refresh completes.
    pub last_snapshot: Option<DashboardSnapshot>,
}

impl App {
    /// Construct a new application with the given configuration.
    pub fn new(theme_name: &str, year: i32, timezone: String) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            tab: DashboardTab::Analitica,
            year,
            timezone,
            should_quit: false,
            last_snapshot: None,
        }
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the dashboard TUI, receiving refreshed snapshots from `rx`.
    ///
    /// Uses `crossterm::event::poll` (synchronous, with a 250 ms timeout) so
    /// that the terminal event loop stays on the current thread while data
    /// updates arrive on the async channel via `try_recv`.
    ///
    /// The loop exits on `q`, `Q`, or `Ctrl+C`.  `Tab`/`→` and `BackTab`/`←`
    /// cycle through the tabs; `1`-`4` jump to a tab directly.
    pub async fn run(mut self, mut rx: mpsc::Receiver<DashboardSnapshot>) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard events with a short timeout so we don't block.
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            break Ok(());
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') => break Ok(()),
                        KeyCode::Tab | KeyCode::Right => self.tab = self.tab.next(),
                        KeyCode::BackTab | KeyCode::Left => self.tab = self.tab.previous(),
                        KeyCode::Char('1') => self.tab = DashboardTab::Analitica,
                        KeyCode::Char('2') => self.tab = DashboardTab::Operativa,
                        KeyCode::Char('3') => self.tab = DashboardTab::Organizativa,
                        KeyCode::Char('4') => self.tab = DashboardTab::Estrategica,
                        _ => {}
                    }
                }
            }

            // Drain any pending snapshots (non-blocking).
            loop {
                match rx.try_recv() {
                    Ok(snapshot) => self.last_snapshot = Some(snapshot),
                    Err(mpsc::error::TryRecvError::Empty) => break,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    // ── Private helpers ───────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(5), // header
            Constraint::Length(1), // tab bar
            Constraint::Min(0),    // active tab body
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

        let origin = self
            .last_snapshot
            .as_ref()
            .map(|snapshot| snapshot.origin.describe())
            .unwrap_or_else(|| "cargando".to_string());
        let header = Header::new(self.year, &origin, &self.timezone, &self.theme);
        frame.render_widget(Paragraph::new(Text::from(header.to_lines())), chunks[0]);

        self.render_tab_bar(frame, chunks[1]);
        self.render_body(frame, chunks[2]);
        frame.render_widget(Paragraph::new(self.footer_line()), chunks[3]);
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = DashboardTab::ALL
            .iter()
            .map(|tab| Line::from(tab.title()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .style(self.theme.tab_inactive)
            .highlight_style(self.theme.tab_active)
            .divider(Span::styled("|", self.theme.dim));
        frame.render_widget(tabs, area);
    }

    fn render_body(&self, frame: &mut Frame, area: Rect) {
        match self.tab {
            DashboardTab::Analitica => match &self.last_snapshot {
                Some(snapshot) => {
                    analitica_view::render_analitica(frame, area, snapshot, &self.theme);
                }
                None => analitica_view::render_waiting(frame, area, &self.theme),
            },
            DashboardTab::Operativa => placeholder_views::render_operativa(frame, area, &self.theme),
            DashboardTab::Organizativa => {
                placeholder_views::render_organizativa(frame, area, &self.theme);
            }
            DashboardTab::Estrategica => {
                placeholder_views::render_estrategica(frame, area, &self.theme);
            }
        }
    }

    /// Key hints plus the timestamp and row count of the last refresh.
    fn footer_line(&self) -> Line<'_> {
        let hints = Span::styled("q salir · ←/→ pestaña · 1-4 ir directo", self.theme.dim);
        match &self.last_snapshot {
            Some(snapshot) => {
                let tz = resolve_timezone(&self.timezone);
                let clock = format_clock(&snapshot.generated_at, tz);
                Line::from(vec![
                    hints,
                    Span::raw("  "),
                    Span::styled(
                        format!("actualizado {clock} · {} filas", snapshot.rows_loaded),
                        self.theme.info,
                    ),
                ])
            }
            None => Line::from(vec![
                hints,
                Span::raw("  "),
                Span::styled("esperando datos", self.theme.dim),
            ]),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
