use crate::data::Bar;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};
use rust_decimal::prelude::ToPrimitive;

/// Candlestick chart drawn straight into the cell buffer.
pub struct CandleChart<'a> {
    bars: &'a [&'a Bar],
    title: String,
}

impl<'a> CandleChart<'a> {
    /// `bars` must be in chronological order (oldest first).
    pub fn new(bars: &'a [&'a Bar], title: String) -> Self {
        Self { bars, title }
    }
}

impl Widget for CandleChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.bars.is_empty() || inner.width < 4 || inner.height < 4 {
            return;
        }

        let (min_price, max_price) = self.price_range();
        if min_price == max_price {
            return;
        }

        let price_range = max_price - min_price;
        let height = inner.height as f64;

        // Each candle takes 3 columns; show the most recent that fit.
        let candle_width = 3;
        let max_candles = (inner.width as usize / candle_width).min(self.bars.len());
        let bars_to_show = &self.bars[self.bars.len().saturating_sub(max_candles)..];

        for (i, bar) in bars_to_show.iter().enumerate() {
            let x = inner.x + (i * candle_width) as u16 + 1;
            if x >= inner.x + inner.width - 1 {
                break;
            }

            let open = bar.open.to_f64().unwrap_or(0.0);
            let close = bar.close.to_f64().unwrap_or(0.0);
            let high = bar.high.to_f64().unwrap_or(0.0);
            let low = bar.low.to_f64().unwrap_or(0.0);

            let is_bullish = close >= open;
            let color = if is_bullish { Color::Green } else { Color::Red };

            // Higher price = lower Y
            let y_open = height - ((open - min_price) / price_range * height);
            let y_close = height - ((close - min_price) / price_range * height);
            let y_high = height - ((high - min_price) / price_range * height);
            let y_low = height - ((low - min_price) / price_range * height);

            let body_top = y_open.min(y_close).max(0.0) as u16;
            let body_bottom = y_open.max(y_close).min(height) as u16;
            let wick_top = y_high.max(0.0) as u16;
            let wick_bottom = y_low.min(height) as u16;

            // Upper wick
            for y in wick_top..body_top {
                let py = inner.y + y;
                if py < inner.y + inner.height {
                    buf[(x, py)].set_char('│').set_fg(color);
                }
            }

            // Body
            for y in body_top..=body_bottom {
                let py = inner.y + y;
                if py < inner.y + inner.height {
                    let ch = if is_bullish { '█' } else { '▓' };
                    buf[(x, py)].set_char(ch).set_fg(color);
                }
            }

            // Lower wick
            for y in (body_bottom + 1)..=wick_bottom {
                let py = inner.y + y;
                if py < inner.y + inner.height {
                    buf[(x, py)].set_char('│').set_fg(color);
                }
            }
        }

        self.draw_price_labels(inner, buf, min_price, max_price);
    }
}

impl CandleChart<'_> {
    fn price_range(&self) -> (f64, f64) {
        let mut min = f64::MAX;
        let mut max = f64::MIN;

        for bar in self.bars {
            min = min.min(bar.low.to_f64().unwrap_or(0.0));
            max = max.max(bar.high.to_f64().unwrap_or(0.0));
        }

        // Add some padding
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }

    fn draw_price_labels(&self, area: Rect, buf: &mut Buffer, min: f64, max: f64) {
        if area.width < 12 {
            return;
        }

        let label_x = area.x + area.width - 10;
        let range = max - min;

        // Three labels: top, middle, bottom
        let labels = [
            (0, max),
            (area.height / 2, min + range / 2.0),
            (area.height - 1, min),
        ];

        for (y_offset, price) in labels {
            let y = area.y + y_offset;
            if y < area.y + area.height {
                let label = format_price(price);
                for (i, ch) in label.chars().enumerate() {
                    let x = label_x + i as u16;
                    if x < area.x + area.width {
                        buf[(x, y)].set_char(ch).set_fg(Color::DarkGray);
                    }
                }
            }
        }
    }
}

/// Keep labels readable across BTC-sized and SHIB-sized prices.
fn format_price(price: f64) -> String {
    if price >= 1000.0 {
        format!("{:.0}", price)
    } else if price >= 1.0 {
        format!("{:.2}", price)
    } else {
        format!("{:.6}", price)
    }
}
