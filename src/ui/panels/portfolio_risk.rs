//! Portfolio value, risk limits and positions.

use super::fields::{FieldExt, require_object};
use super::{PanelId, PanelView, Scroll, column_header, draw_frame, label, scroll_hint, section_header};
use crate::api::error::DataError;
use crate::api::{DataSource, endpoints};
use crate::consts::tui_consts::scroll::LIST_PAGE_ROWS;
use crate::context::SessionContext;
use crate::ui::format::{Tier, signed, signed_money, truncate};
use crate::ui::glyphs::trend_indicator;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

const TREND_WIDTH: usize = 18;
const TREND_HEIGHT: usize = 2;

/// Flat risk fields reported when the backend has no `metrics` table.
const REPORTED_METRICS: [(&str, &str); 4] = [
    ("var_95", "VaR (95%)"),
    ("expected_shortfall", "Expected Shortfall"),
    ("volatility", "Volatility"),
    ("max_drawdown", "Max Drawdown"),
];

#[derive(Debug, Clone, PartialEq)]
pub struct RiskMetric {
    pub name: String,
    pub value: f64,
    pub limit: f64,
    pub status: String,
}

impl RiskMetric {
    /// Percentage of the limit in use; zero when there is no limit.
    pub fn utilization(&self) -> f64 {
        if self.limit > 0.0 {
            self.value / self.limit * 100.0
        } else {
            0.0
        }
    }

    fn utilization_tier(&self) -> Tier {
        Tier::below(self.utilization(), 50.0, 80.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub quantity: f64,
    pub value: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PortfolioRiskData {
    pub total_value: f64,
    pub total_pnl: f64,
    pub pnl_history: Vec<f64>,
    pub metrics: Vec<RiskMetric>,
    pub positions: Vec<Position>,
}

impl PortfolioRiskData {
    pub fn placeholder() -> Self {
        let metric = |name: &str, value, limit| RiskMetric {
            name: name.to_string(),
            value,
            limit,
            status: "OK".to_string(),
        };
        let position = |symbol: &str, quantity, value, pnl, pnl_pct| Position {
            symbol: symbol.to_string(),
            quantity,
            value,
            pnl,
            pnl_pct,
        };
        Self {
            total_value: 328_625.0,
            total_pnl: 6_925.0,
            pnl_history: vec![
                -200.0, 150.0, 400.0, 850.0, 1200.0, 1800.0, 2400.0, 3100.0, 4200.0, 5500.0,
                6925.0,
            ],
            metrics: vec![
                metric("VaR (95%)", 125_000.0, 250_000.0),
                metric("CVaR (95%)", 185_000.0, 350_000.0),
                metric("Max Drawdown", 0.08, 0.15),
                metric("Sharpe Ratio", 1.85, 1.0),
                metric("Beta", 0.92, 1.5),
                metric("Leverage", 1.2, 2.0),
            ],
            positions: vec![
                position("AAPL", 500.0, 92_750.0, 1250.0, 1.35),
                position("MSFT", 300.0, 112_800.0, -450.0, -0.40),
                position("GOOGL", 200.0, 28_400.0, 800.0, 2.90),
                position("TSLA", 150.0, 37_875.0, 2125.0, 5.95),
                position("NVDA", 400.0, 56_800.0, 3200.0, 5.97),
            ],
        }
    }

    fn from_document(doc: &Value) -> Self {
        let mut metrics: Vec<RiskMetric> = doc
            .items("metrics")
            .iter()
            .map(|m| RiskMetric {
                name: m.str_or("name", "?"),
                value: m.f64_or("value", 0.0),
                limit: m.f64_or("limit", 0.0),
                status: m.str_or("status", "OK"),
            })
            .collect();
        if metrics.is_empty() {
            metrics = REPORTED_METRICS
                .iter()
                .filter(|(key, _)| doc.get(*key).is_some())
                .map(|(key, name)| RiskMetric {
                    name: name.to_string(),
                    value: doc.f64_or(key, 0.0),
                    limit: 0.0,
                    status: "OK".to_string(),
                })
                .collect();
        }

        let positions: Vec<Position> = doc
            .items("positions")
            .iter()
            .map(|p| {
                let symbol = match p.str_or("symbol", "") {
                    s if s.is_empty() => p.str_or("instrument_id", "?"),
                    s => s,
                };
                let value = match p.f64_or("value", f64::NAN) {
                    v if v.is_nan() => p.f64_or("market_value", 0.0),
                    v => v,
                };
                Position {
                    symbol,
                    quantity: p.f64_or("quantity", 0.0),
                    value,
                    pnl: p.f64_or("pnl", 0.0),
                    pnl_pct: p.f64_or("pnl_pct", 0.0),
                }
            })
            .collect();

        let total_value = match doc.f64_or("total_value", f64::NAN) {
            v if v.is_nan() => positions.iter().map(|p| p.value).sum(),
            v => v,
        };
        let total_pnl = match doc.f64_or("total_pnl", f64::NAN) {
            v if v.is_nan() => positions.iter().map(|p| p.pnl).sum(),
            v => v,
        };

        Self {
            total_value,
            total_pnl,
            pnl_history: doc.series("pnl_history"),
            metrics,
            positions,
        }
    }

    pub fn total_pnl_pct(&self) -> f64 {
        if self.total_value != 0.0 {
            self.total_pnl / self.total_value * 100.0
        } else {
            0.0
        }
    }

    /// Share of the portfolio held in `position`, in percent.
    pub fn weight(&self, position: &Position) -> f64 {
        if self.total_value != 0.0 {
            position.value / self.total_value * 100.0
        } else {
            0.0
        }
    }
}

fn pnl_color(value: f64) -> Color {
    if value >= 0.0 { Color::Green } else { Color::Red }
}

#[derive(Debug, Default)]
pub struct PortfolioRiskPanel {
    data: Option<PortfolioRiskData>,
}

#[async_trait::async_trait]
impl PanelView for PortfolioRiskPanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        ctx: &SessionContext,
    ) -> Result<(), DataError> {
        let doc = source
            .fetch(endpoints::STATUS_PORTFOLIO_RISK, &ctx.portfolio_params())
            .await?;
        self.data = Some(PortfolioRiskData::from_document(require_object(
            &doc,
            endpoints::STATUS_PORTFOLIO_RISK,
        )?));
        Ok(())
    }

    fn load_placeholder(&mut self) {
        self.data = Some(PortfolioRiskData::placeholder());
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, PanelId::PortfolioRisk.display_name());
        let Some(data) = &self.data else {
            frame.render_widget(Paragraph::new("Loading data..."), inner);
            return;
        };

        let pnl_style = Style::default()
            .fg(pnl_color(data.total_pnl))
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(vec![
                label("Portfolio Value: "),
                Span::styled(
                    format!("${:.2}", data.total_value),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                label("   Total P&L: "),
                Span::styled(
                    format!("{} ({:+.2}%)", signed_money(data.total_pnl), data.total_pnl_pct()),
                    pnl_style,
                ),
                label("   Positions: "),
                Span::raw(format!("{} active", data.positions.len())),
            ]),
        ];
        let trend = trend_indicator(&data.pnl_history, TREND_WIDTH, TREND_HEIGHT);
        for (idx, row) in trend.lines().enumerate() {
            let caption = if idx == 0 { "P&L Trend: " } else { "           " };
            lines.push(Line::from(vec![
                label(caption),
                Span::styled(row.to_string(), Style::default().fg(pnl_color(data.total_pnl))),
            ]));
        }

        lines.push(Line::default());
        lines.push(section_header("Risk Metrics"));
        lines.push(column_header(format!(
            "{:<20} {:>14} {:>14} {:>8} {:>6}",
            "Metric", "Current", "Limit", "Util", "Status"
        )));
        for metric in &data.metrics {
            lines.push(Line::from(vec![
                Span::raw(format!("{:<20} ", truncate(&metric.name, 20))),
                Span::styled(
                    format!("{:>14.2} ", metric.value),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>14.2} ", metric.limit)),
                Span::styled(
                    format!("{:>7.1}% ", metric.utilization()),
                    metric.utilization_tier().style(),
                ),
                Span::styled(
                    format!("{:>6}", metric.status),
                    Tier::from_status(&metric.status)
                        .style()
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }

        lines.push(Line::default());
        lines.push(section_header("Top Positions"));
        lines.push(column_header(format!(
            "{:<10} {:>10} {:>14} {:>12} {:>9} {:>8}",
            "Symbol", "Quantity", "Market Value", "P&L ($)", "P&L (%)", "Weight"
        )));
        let rows = (inner.height as usize).saturating_sub(lines.len() + 1);
        let window = scroll.window(data.positions.len(), rows);
        for position in &data.positions[window.clone()] {
            let style = Style::default()
                .fg(pnl_color(position.pnl))
                .add_modifier(Modifier::BOLD);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<10} ", truncate(&position.symbol, 10)),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>10.0} ", position.quantity)),
                Span::raw(format!("{:>14} ", format!("${:.2}", position.value))),
                Span::styled(format!("{:>12} ", signed(position.pnl)), style),
                Span::styled(format!("{:>8}% ", signed(position.pnl_pct)), style),
                Span::raw(format!("{:>7.2}%", data.weight(position))),
            ]));
        }
        lines.push(scroll_hint(&window, data.positions.len()));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.positions.len())
    }

    fn max_scroll(&self) -> usize {
        self.row_count().saturating_sub(LIST_PAGE_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockDataSource, param};
    use crate::ui::panels::test_support::render_view;
    use serde_json::json;

    #[test]
    fn utilization_tiers() {
        let data = PortfolioRiskData::placeholder();
        let tiers: Vec<Tier> = data.metrics.iter().map(RiskMetric::utilization_tier).collect();
        // 50%, 52.9%, 53.3%, 185%, 61.3%, 60%
        assert_eq!(
            tiers,
            vec![
                Tier::Warning,
                Tier::Warning,
                Tier::Warning,
                Tier::Critical,
                Tier::Warning,
                Tier::Warning
            ]
        );
        let unlimited = RiskMetric {
            name: "Volatility".to_string(),
            value: 0.2,
            limit: 0.0,
            status: "OK".to_string(),
        };
        assert_eq!(unlimited.utilization(), 0.0);
        assert_eq!(unlimited.utilization_tier(), Tier::Good);
    }

    #[test]
    fn weights_are_shares_of_total_value() {
        let data = PortfolioRiskData::placeholder();
        let aapl = &data.positions[0];
        assert!((data.weight(aapl) - 92_750.0 / 328_625.0 * 100.0).abs() < 1e-9);
        assert!((data.total_pnl_pct() - 6925.0 / 328_625.0 * 100.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn flat_risk_report_becomes_metric_rows() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|endpoint, params| {
                endpoint == endpoints::STATUS_PORTFOLIO_RISK
                    && params
                        == [
                            param("portfolio_id", "MAIN"),
                            param("mode", "PAPER"),
                        ]
            })
            .returning(|_, _| {
                Ok(json!({
                    "portfolio_id": "MAIN",
                    "volatility": 0.18,
                    "var_95": 0.031,
                    "expected_shortfall": 0.045,
                    "positions": [
                        {"instrument_id": "SAP.DE", "market_value": 0.25, "weight": 0.25},
                        {"symbol": "ASML", "value": 0.75, "pnl": -0.01}
                    ]
                }))
            });

        let mut panel = PortfolioRiskPanel::default();
        panel
            .load(&source, &SessionContext::default())
            .await
            .unwrap();

        let data = panel.data.as_ref().unwrap();
        let names: Vec<&str> = data.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["VaR (95%)", "Expected Shortfall", "Volatility"]);
        assert_eq!(data.positions[0].symbol, "SAP.DE");
        assert_eq!(data.positions[0].value, 0.25);
        assert_eq!(data.total_value, 1.0);
        assert_eq!(data.total_pnl, -0.01);
        assert!(data.pnl_history.is_empty());
    }

    #[test]
    fn renders_summary_metrics_and_positions() {
        let mut panel = PortfolioRiskPanel::default();
        panel.load_placeholder();
        let text = render_view(&panel, 90, 30, &Scroll::default());
        assert!(text.contains("Portfolio Value: $328625.00"));
        assert!(text.contains("+$6925.00 (+2.11%)"));
        assert!(text.contains("5 active"));
        assert!(text.contains("Sharpe Ratio"));
        assert!(text.contains("185.0%"));
        assert!(text.contains("-450.00"));
        assert!(text.contains("[↑↓ to scroll, 1-5/5]"));
    }

    #[test]
    fn trend_takes_two_rows() {
        let mut panel = PortfolioRiskPanel::default();
        panel.load_placeholder();
        let text = render_view(&panel, 90, 30, &Scroll::default());
        let trend_rows: Vec<&str> = text
            .lines()
            .filter(|l| l.chars().any(|c| ('\u{2801}'..='\u{28ff}').contains(&c)))
            .collect();
        assert_eq!(trend_rows.len(), 2);
    }
}
