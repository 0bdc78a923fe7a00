//! History view - aggregated bars with period-over-period changes

use super::{ViewRenderer, ViewState};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

/// History view
pub struct HistoryView;

impl HistoryView {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HistoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer for HistoryView {
    fn render(&self, f: &mut Frame, area: Rect, state: &ViewState) {
        let block = Block::default()
            .title(format!(
                " {} · {} ({} bars from {} records) ",
                state.symbol.to_uppercase(),
                state.interval.label(),
                state.bars.len(),
                state.point_count,
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        f.render_widget(block, area);

        if let Some(error) = state.load_error {
            let msg = Paragraph::new(error.to_string())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center);
            f.render_widget(msg, inner);
            return;
        }

        if state.bars.is_empty() {
            let msg = Paragraph::new("No history")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            f.render_widget(msg, inner);
            return;
        }

        let header_style = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let header = Row::new(vec!["Time", "High", "High Δ%", "Low", "Low Δ%"])
            .style(header_style)
            .height(1);

        let rows: Vec<Row> = state
            .bars
            .iter()
            .map(|bar| {
                Row::new(vec![
                    Cell::from(bar.time.format("%Y-%m-%d %H:%M:%S").to_string())
                        .style(Style::default().fg(Color::White)),
                    Cell::from(bar.high.to_string()).style(Style::default().fg(Color::White)),
                    change_cell(bar.high_change),
                    Cell::from(bar.low.to_string()).style(Style::default().fg(Color::White)),
                    change_cell(bar.low_change),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(20),     // Time
            Constraint::Percentage(22), // High
            Constraint::Percentage(14), // High change
            Constraint::Percentage(22), // Low
            Constraint::Percentage(14), // Low change
        ];

        let table = Table::new(rows, widths).header(header).column_spacing(2);

        f.render_widget(table, inner);
    }
}

/// Undefined changes stay visually distinct from losses and gains.
fn change_cell(change: Option<Decimal>) -> Cell<'static> {
    match change {
        None => Cell::from("—").style(Style::default().fg(Color::DarkGray)),
        Some(value) if value < Decimal::ZERO => {
            Cell::from(format!("{:.2}%", value)).style(Style::default().fg(Color::Red))
        }
        Some(value) => {
            Cell::from(format!("+{:.2}%", value)).style(Style::default().fg(Color::Green))
        }
    }
}
