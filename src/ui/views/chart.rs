//! Chart view - candlestick rendering of the aggregated bars

use super::{ViewRenderer, ViewState};
use crate::data::Bar;
use crate::ui::charts::CandleChart;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Chart view
pub struct ChartView;

impl ChartView {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ChartView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer for ChartView {
    fn render(&self, f: &mut Frame, area: Rect, state: &ViewState) {
        if let Some(error) = state.load_error {
            render_message(f, area, error, Color::Red);
            return;
        }
        if state.bars.is_empty() {
            render_message(f, area, "No data", Color::DarkGray);
            return;
        }

        // Bars arrive newest first; the chart draws left to right in time.
        let chronological: Vec<&Bar> = state.bars.iter().rev().collect();
        let title = format!(
            " {} · {} ",
            state.symbol.to_uppercase(),
            state.interval.label()
        );

        f.render_widget(CandleChart::new(&chronological, title), area);
    }
}

fn render_message(f: &mut Frame, area: Rect, text: &str, color: Color) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let msg = Paragraph::new(text.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(msg, area);
}
