//! Order execution analytics.

use super::fields::{FieldExt, require_object};
use super::{PanelId, PanelView, Scroll, column_header, draw_frame, label, scroll_hint, section_header};
use crate::api::error::DataError;
use crate::api::{DataSource, endpoints, param};
use crate::consts::tui_consts::scroll::LIST_PAGE_ROWS;
use crate::context::SessionContext;
use crate::ui::format::{Tier, truncate};
use crate::ui::glyphs::inline_trend;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

const ORDER_LIMIT: usize = 50;
const TREND_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub time: String,
    pub symbol: String,
    pub side: String,
    pub quantity: f64,
    pub price: f64,
    pub status: String,
}

impl Order {
    fn notional(&self) -> f64 {
        self.quantity * self.price
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionData {
    /// Newest first.
    pub orders: Vec<Order>,
    /// Traded notional over time, in millions.
    pub volume_trend: Vec<f64>,
}

/// `HH:MM:SS` from either a bare time or an ISO / space separated timestamp.
fn clock_time(timestamp: &str) -> String {
    let time = timestamp
        .rsplit(['T', ' '])
        .next()
        .unwrap_or(timestamp);
    time.chars().take(8).collect()
}

impl ExecutionData {
    pub fn placeholder() -> Self {
        let order = |time: &str, symbol: &str, side: &str, quantity, price, status: &str| Order {
            time: time.to_string(),
            symbol: symbol.to_string(),
            side: side.to_string(),
            quantity,
            price,
            status: status.to_string(),
        };
        Self {
            orders: vec![
                order("15:42:13", "AAPL", "BUY", 100.0, 185.50, "FILLED"),
                order("15:42:05", "MSFT", "SELL", 50.0, 376.20, "FILLED"),
                order("15:41:52", "GOOGL", "BUY", 25.0, 142.15, "FILLED"),
                order("15:41:40", "TSLA", "BUY", 75.0, 252.30, "PARTIAL"),
                order("15:41:28", "NVDA", "SELL", 40.0, 142.00, "FILLED"),
                order("15:41:15", "AAPL", "SELL", 50.0, 185.75, "FILLED"),
                order("15:41:02", "MSFT", "BUY", 100.0, 375.80, "FILLED"),
                order("15:40:48", "GOOGL", "SELL", 30.0, 142.50, "FILLED"),
                order("15:40:35", "TSLA", "SELL", 60.0, 252.75, "FILLED"),
                order("15:40:22", "NVDA", "BUY", 80.0, 141.50, "FILLED"),
                order("15:40:10", "AMD", "BUY", 120.0, 165.80, "FILLED"),
                order("15:39:58", "META", "SELL", 35.0, 482.90, "FILLED"),
                order("15:39:45", "NFLX", "BUY", 15.0, 612.40, "FILLED"),
                order("15:39:30", "AMZN", "SELL", 45.0, 178.25, "FILLED"),
                order("15:39:18", "JPM", "BUY", 90.0, 195.60, "FILLED"),
            ],
            volume_trend: vec![0.8, 1.2, 1.5, 2.1, 1.8, 2.3, 2.6, 2.8, 3.1, 3.3],
        }
    }

    fn from_document(doc: &Value) -> Self {
        let orders: Vec<Order> = doc
            .items("orders")
            .iter()
            .map(|o| {
                let symbol = match o.str_or("symbol", "") {
                    s if s.is_empty() => o.str_or("instrument_id", "?"),
                    s => s,
                };
                let price = match o.f64_or("price", f64::NAN) {
                    p if p.is_nan() => o.f64_or("avg_fill_price", 0.0),
                    p => p,
                };
                Order {
                    time: clock_time(&o.str_or("timestamp", "")),
                    symbol,
                    side: o.str_or("side", "?").to_ascii_uppercase(),
                    quantity: o.f64_or("quantity", 0.0),
                    price,
                    status: o.str_or("status", "UNKNOWN").to_ascii_uppercase(),
                }
            })
            .collect();

        let mut volume_trend = doc.series("volume_history");
        if volume_trend.is_empty() {
            // Cumulative notional, oldest order first.
            let mut total = 0.0;
            volume_trend = orders
                .iter()
                .rev()
                .map(|o| {
                    total += o.notional() / 1_000_000.0;
                    total
                })
                .collect();
        }
        Self {
            orders,
            volume_trend,
        }
    }

    fn filled(&self) -> usize {
        self.orders.iter().filter(|o| o.status == "FILLED").count()
    }

    pub fn fill_rate(&self) -> f64 {
        if self.orders.is_empty() {
            0.0
        } else {
            self.filled() as f64 * 100.0 / self.orders.len() as f64
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.orders.iter().map(Order::notional).sum()
    }

    fn buys(&self) -> usize {
        self.orders.iter().filter(|o| o.side == "BUY").count()
    }
}

#[derive(Debug, Default)]
pub struct ExecutionPanel {
    data: Option<ExecutionData>,
}

#[async_trait::async_trait]
impl PanelView for ExecutionPanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        ctx: &SessionContext,
    ) -> Result<(), DataError> {
        let mut params = ctx.portfolio_params();
        params.push(param("limit_orders", ORDER_LIMIT));
        params.push(param("limit_fills", ORDER_LIMIT));
        let doc = source.fetch(endpoints::STATUS_EXECUTION, &params).await?;
        self.data = Some(ExecutionData::from_document(require_object(
            &doc,
            endpoints::STATUS_EXECUTION,
        )?));
        Ok(())
    }

    fn load_placeholder(&mut self) {
        self.data = Some(ExecutionData::placeholder());
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, PanelId::Execution.display_name());
        let Some(data) = &self.data else {
            frame.render_widget(Paragraph::new("Loading data..."), inner);
            return;
        };

        let fill_rate = data.fill_rate();
        let fill_tier = if fill_rate > 95.0 {
            Tier::Good
        } else {
            Tier::Warning
        };
        let buys = data.buys();
        let mut lines = vec![
            section_header("Execution Summary"),
            Line::from(vec![
                label("Orders: "),
                Span::styled(
                    data.orders.len().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                label("   Fill Rate: "),
                Span::styled(
                    format!("{:.1}%", fill_rate),
                    fill_tier.style().add_modifier(Modifier::BOLD),
                ),
                label("   Volume: "),
                Span::raw(format!("${:.2}M", data.total_volume() / 1_000_000.0)),
            ]),
            Line::from(vec![
                label("Buys: "),
                Span::styled(buys.to_string(), Style::default().fg(Color::Green)),
                label("   Sells: "),
                Span::styled(
                    (data.orders.len() - buys).to_string(),
                    Style::default().fg(Color::Red),
                ),
                label("   Volume Trend: "),
                Span::styled(
                    inline_trend(&data.volume_trend, TREND_WIDTH),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::default(),
            section_header("Recent Orders"),
            column_header(format!(
                "{:<10} {:<8} {:<5} {:>8} {:>10} {:<10}",
                "Time", "Symbol", "Side", "Qty", "Price", "Status"
            )),
        ];

        let rows = (inner.height as usize).saturating_sub(lines.len() + 1);
        let window = scroll.window(data.orders.len(), rows);
        for order in &data.orders[window.clone()] {
            let side_color = if order.side == "BUY" {
                Color::Green
            } else {
                Color::Red
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{:<10} ", order.time)),
                Span::styled(
                    format!("{:<8} ", truncate(&order.symbol, 8)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{:<5} ", order.side), Style::default().fg(side_color)),
                Span::raw(format!("{:>8.0} ", order.quantity)),
                Span::raw(format!("{:>10.2} ", order.price)),
                Span::styled(
                    format!("{:<10}", order.status),
                    Tier::from_status(&order.status).style(),
                ),
            ]));
        }
        lines.push(scroll_hint(&window, data.orders.len()));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.orders.len())
    }

    fn max_scroll(&self) -> usize {
        self.row_count().saturating_sub(LIST_PAGE_ROWS)
    }
}
