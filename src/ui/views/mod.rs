//! View modules for the TUI
//!
//! Each view represents a different screen/layout in the application.

pub mod advisor;
pub mod chart;
pub mod history;

pub use advisor::AdvisorView;
pub use chart::ChartView;
pub use history::HistoryView;

use crate::data::{Bar, Interval};
use crate::ui::app::AdvisorState;
use ratatui::{layout::Rect, Frame};

/// Shared state passed to views for rendering
pub struct ViewState<'a> {
    pub symbol: &'a str,
    pub interval: Interval,
    pub bars: &'a [Bar],
    pub point_count: usize,
    pub load_error: Option<&'a str>,
    pub advisor: &'a AdvisorState,
}

/// Trait for renderable views
pub trait ViewRenderer {
    fn render(&self, f: &mut Frame, area: Rect, state: &ViewState);
}
