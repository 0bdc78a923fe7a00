use crate::advisor::OllamaClient;
use crate::config::Config;
use crate::data::{resample, Bar, HistoryLoader, Interval};
use crate::ui::input::View;
use crate::ui::views::{AdvisorView, ChartView, HistoryView, ViewRenderer, ViewState};
use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// Outcome of a background commentary request.
pub enum AdvisorEvent {
    Ready { symbol: String, text: String },
    Failed { symbol: String, error: String },
}

/// What the advisor view should show.
pub enum AdvisorState {
    Disabled,
    Idle,
    Loading,
    Ready(String),
    Failed(String),
}

pub struct App {
    config: Config,
    loader: HistoryLoader,
    symbols: Vec<String>,
    selected: usize,
    interval: Interval,
    view: View,
    bars: Vec<Bar>,
    point_count: usize,
    load_error: Option<String>,
    advisor: AdvisorState,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let registry = config.registry();
        let symbols = registry.symbols();
        if symbols.is_empty() {
            bail!("no assets configured");
        }

        let advisor = if config.advisor.enabled {
            AdvisorState::Idle
        } else {
            AdvisorState::Disabled
        };

        let mut app = Self {
            loader: HistoryLoader::new(registry),
            symbols,
            selected: 0,
            interval: Interval::default(),
            view: View::default(),
            bars: Vec::new(),
            point_count: 0,
            load_error: None,
            advisor,
            should_quit: false,
            config,
        };
        app.reload();
        Ok(app)
    }

    fn symbol(&self) -> &str {
        &self.symbols[self.selected]
    }

    /// Run the full load + resample pipeline for the current selection.
    ///
    /// Each invocation rebuilds the series from disk; nothing is cached
    /// between user actions.
    fn reload(&mut self) {
        match self.loader.load(self.symbol()) {
            Ok(points) => {
                self.point_count = points.len();
                self.bars = resample(&points, self.interval);
                self.load_error = None;
            }
            Err(e) => {
                tracing::error!("load failed for {}: {}", self.symbol(), e);
                self.point_count = 0;
                self.bars.clear();
                self.load_error = Some(e.to_string());
            }
        }
    }

    fn select_next_symbol(&mut self) {
        self.selected = (self.selected + 1) % self.symbols.len();
        self.reset_advisor();
        self.reload();
    }

    fn select_prev_symbol(&mut self) {
        self.selected = (self.selected + self.symbols.len() - 1) % self.symbols.len();
        self.reset_advisor();
        self.reload();
    }

    fn set_interval(&mut self, interval: Interval) {
        if self.interval != interval {
            self.interval = interval;
            self.reload();
        }
    }

    /// Commentary belongs to one asset; navigating away discards it.
    fn reset_advisor(&mut self) {
        if self.config.advisor.enabled {
            self.advisor = AdvisorState::Idle;
        }
    }

    fn request_commentary(&mut self, tx: &mpsc::Sender<AdvisorEvent>) {
        if !self.config.advisor.enabled || matches!(self.advisor, AdvisorState::Loading) {
            return;
        }

        let client = OllamaClient::new(&self.config.advisor);
        let symbol = self.symbol().to_string();
        let tx = tx.clone();
        self.advisor = AdvisorState::Loading;

        tokio::spawn(async move {
            let event = match client.commentary(&symbol).await {
                Ok(text) => AdvisorEvent::Ready { symbol, text },
                Err(e) => AdvisorEvent::Failed {
                    symbol,
                    error: e.to_string(),
                },
            };
            let _ = tx.send(event).await;
        });
    }

    fn handle_advisor_event(&mut self, event: AdvisorEvent) {
        match event {
            AdvisorEvent::Ready { symbol, text } if symbol == self.symbol() => {
                self.advisor = AdvisorState::Ready(text);
            }
            AdvisorEvent::Failed { symbol, error } if symbol == self.symbol() => {
                tracing::warn!("commentary for {} failed: {}", symbol, error);
                self.advisor = AdvisorState::Failed(error);
            }
            // Reply for an asset the user has navigated away from
            _ => {}
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (event_tx, mut event_rx) = mpsc::channel::<AdvisorEvent>(8);
        let tick_rate = Duration::from_millis(self.config.ui.refresh_rate_ms);

        loop {
            // Handle finished advisor requests
            while let Ok(event) = event_rx.try_recv() {
                self.handle_advisor_event(event);
            }

            // Draw UI
            terminal.draw(|f| self.draw(f))?;

            // Handle input
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, &event_tx);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode, tx: &mpsc::Sender<AdvisorEvent>) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.select_next_symbol(),
            KeyCode::BackTab | KeyCode::Left => self.select_prev_symbol(),
            KeyCode::Char('i') => self.set_interval(self.interval.next()),
            KeyCode::Char('d') => self.set_interval(Interval::Daily),
            KeyCode::Char('w') => self.set_interval(Interval::Weekly),
            KeyCode::Char('m') => self.set_interval(Interval::Monthly),
            KeyCode::Char('1') => self.view = View::Chart,
            KeyCode::Char('2') => self.view = View::History,
            KeyCode::Char('3') => self.view = View::Advisor,
            KeyCode::Char('r') => {
                if self.view == View::Advisor {
                    self.request_commentary(tx);
                }
            }
            _ => {}
        }
    }

    fn draw(&self, f: &mut ratatui::Frame) {
        // Main layout: header + content
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(10)])
            .split(f.area());

        self.draw_header(f, chunks[0]);

        let state = ViewState {
            symbol: self.symbol(),
            interval: self.interval,
            bars: &self.bars,
            point_count: self.point_count,
            load_error: self.load_error.as_deref(),
            advisor: &self.advisor,
        };

        match self.view {
            View::Chart => ChartView::new().render(f, chunks[1], &state),
            View::History => HistoryView::new().render(f, chunks[1], &state),
            View::Advisor => AdvisorView::new().render(f, chunks[1], &state),
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.symbol().to_uppercase()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("| "),
            Span::styled(
                self.interval.label(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::styled(self.view.title(), Style::default().fg(Color::White)),
            Span::raw(" | Tab: asset, d/w/m: interval | "),
            Span::styled("1", Style::default().fg(Color::Cyan)),
            Span::raw(" Chart, "),
            Span::styled("2", Style::default().fg(Color::Cyan)),
            Span::raw(" History, "),
            Span::styled("3", Style::default().fg(Color::Cyan)),
            Span::raw(" Analysis | "),
            Span::styled("q", Style::default().fg(Color::Cyan)),
            Span::raw(" quit"),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));

        let paragraph = Paragraph::new(title)
            .block(block)
            .alignment(Alignment::Center);

        f.render_widget(paragraph, area);
    }
}
