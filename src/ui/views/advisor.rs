//! Advisor view - free-text commentary from the local model

use super::{ViewRenderer, ViewState};
use crate::ui::app::AdvisorState;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Advisor view
pub struct AdvisorView;

impl AdvisorView {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AdvisorView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer for AdvisorView {
    fn render(&self, f: &mut Frame, area: Rect, state: &ViewState) {
        let block = Block::default()
            .title(format!(
                " Fundamental Analysis · {} ",
                state.symbol.to_uppercase()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let paragraph = match state.advisor {
            AdvisorState::Disabled => Paragraph::new(
                "Commentary is disabled. Enable [advisor] in config/default.toml \
                 and run a local Ollama server.",
            )
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
            AdvisorState::Idle => Paragraph::new("Press 'r' to ask the model about this asset.")
                .style(Style::default().fg(Color::White))
                .alignment(Alignment::Center),
            AdvisorState::Loading => Paragraph::new("Waiting for the model...")
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center),
            AdvisorState::Ready(text) => Paragraph::new(text.as_str())
                .style(Style::default().fg(Color::White))
                .wrap(Wrap { trim: false }),
            AdvisorState::Failed(error) => Paragraph::new(format!("Request failed: {error}"))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center),
        };

        f.render_widget(paragraph.block(block), area);
    }
}
