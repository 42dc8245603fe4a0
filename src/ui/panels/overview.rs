//! System overview: P&L, exposure, stability, regimes and alerts.

use super::fields::{FieldExt, require_object};
use super::{PanelView, Scroll, draw_frame, label, section_header};
use crate::api::error::DataError;
use crate::api::{DataSource, endpoints};
use crate::consts::tui_consts::MAX_OVERVIEW_ALERTS;
use crate::context::SessionContext;
use crate::ui::format::{Tier, regime_color, signed_money, signed_pct, truncate};
use crate::ui::glyphs::inline_trend;
use log::debug;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

const TREND_WIDTH: usize = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionRegime {
    pub region: String,
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub severity: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegimeDetail {
    pub current: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverviewData {
    pub pnl_today: f64,
    pub pnl_mtd: f64,
    pub pnl_ytd: f64,
    pub max_drawdown: f64,
    pub net_exposure: f64,
    pub gross_exposure: f64,
    pub leverage: f64,
    pub stability: f64,
    pub pnl_trend: Vec<f64>,
    pub regimes: Vec<RegionRegime>,
    pub alerts: Vec<Alert>,
}

impl OverviewData {
    pub fn placeholder() -> Self {
        let regime = |region: &str, label: &str, confidence| RegionRegime {
            region: region.to_string(),
            label: label.to_string(),
            confidence,
        };
        let alert = |severity: &str, message: &str| Alert {
            severity: severity.to_string(),
            message: message.to_string(),
        };
        Self {
            pnl_today: 1234.56,
            pnl_mtd: 5432.10,
            pnl_ytd: 12345.67,
            max_drawdown: -0.042,
            net_exposure: 0.125,
            gross_exposure: 1.234,
            leverage: 1.45,
            stability: 0.872,
            pnl_trend: vec![-100.0, -50.0, 200.0, 500.0, 800.0, 1100.0, 1234.56],
            regimes: vec![
                regime("US", "GROWTH", 0.85),
                regime("EU", "DEFENSIVE", 0.72),
                regime("ASIA", "TRANSITION", 0.45),
            ],
            alerts: vec![
                alert("WARN", "High volatility detected in US_EQ"),
                alert("INFO", "Backtest completed successfully"),
            ],
        }
    }

    fn from_document(doc: &Value) -> Self {
        Self {
            pnl_today: doc.f64_or("pnl_today", 0.0),
            pnl_mtd: doc.f64_or("pnl_mtd", 0.0),
            pnl_ytd: doc.f64_or("pnl_ytd", 0.0),
            max_drawdown: doc.f64_or("max_drawdown", 0.0),
            net_exposure: doc.f64_or("net_exposure", 0.0),
            gross_exposure: doc.f64_or("gross_exposure", 0.0),
            leverage: doc.f64_or("leverage", 0.0),
            stability: doc.f64_or("global_stability_index", 0.0),
            pnl_trend: doc.series("pnl_history"),
            regimes: doc
                .items("regimes")
                .iter()
                .map(|r| RegionRegime {
                    region: r.str_or("region", "?"),
                    label: r.str_or("regime_label", "?"),
                    confidence: r.f64_or("confidence", 0.0),
                })
                .collect(),
            alerts: doc
                .items("alerts")
                .iter()
                .map(|a| Alert {
                    severity: a.str_or("severity", "INFO"),
                    message: a.str_or("message", ""),
                })
                .collect(),
        }
    }

    fn drawdown_tier(&self) -> Tier {
        Tier::above(self.max_drawdown, -0.05, -0.10)
    }

    fn stability_tier(&self) -> Tier {
        Tier::above(self.stability, 0.7, 0.5)
    }

    fn leverage_tier(&self) -> Tier {
        if self.leverage > 2.0 {
            Tier::Warning
        } else {
            Tier::Good
        }
    }
}

#[derive(Debug, Default)]
pub struct OverviewPanel {
    data: Option<OverviewData>,
    detail: Option<RegimeDetail>,
}

impl OverviewPanel {
    fn render_kpis(&self, frame: &mut Frame, area: Rect, data: &OverviewData) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let money = |v: f64| {
            let color = if v >= 0.0 { Color::Green } else { Color::Red };
            Span::styled(signed_money(v), Style::default().fg(color))
        };

        let pnl = vec![
            section_header("P&L"),
            Line::from(vec![label("Today: "), money(data.pnl_today)]),
            Line::from(Span::styled(
                inline_trend(&data.pnl_trend, TREND_WIDTH),
                Style::default().fg(Color::Cyan),
            )),
            Line::from(vec![label("MTD:   "), money(data.pnl_mtd)]),
            Line::from(vec![label("YTD:   "), money(data.pnl_ytd)]),
        ];
        frame.render_widget(Paragraph::new(pnl), columns[0]);

        let risk = vec![
            section_header("Risk"),
            Line::from(vec![
                label("Max DD: "),
                Span::styled(signed_pct(data.max_drawdown), data.drawdown_tier().style()),
            ]),
            Line::from(vec![
                label("Net:    "),
                Span::raw(format!("{:.1}%", data.net_exposure * 100.0)),
            ]),
            Line::from(vec![
                label("Gross:  "),
                Span::raw(format!("{:.1}%", data.gross_exposure * 100.0)),
            ]),
        ];
        frame.render_widget(Paragraph::new(risk), columns[1]);

        let health = vec![
            section_header("Health"),
            Line::from(vec![
                label("Stability: "),
                Span::styled(
                    format!("{:.3}", data.stability),
                    data.stability_tier().style().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                label("Leverage:  "),
                Span::styled(format!("{:.2}x", data.leverage), data.leverage_tier().style()),
            ]),
        ];
        frame.render_widget(Paragraph::new(health), columns[2]);
    }

    fn body_lines(&self, data: &OverviewData, width: usize, scroll: &Scroll) -> Vec<Line<'static>> {
        let mut lines = vec![section_header("Regimes")];
        if data.regimes.is_empty() {
            lines.push(Line::from(Span::styled(
                "No regime data",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for regime in &data.regimes {
            lines.push(Line::from(vec![
                Span::raw(format!("{:<6}", regime.region)),
                Span::styled(
                    format!("{:<12}", regime.label),
                    Style::default().fg(regime_color(&regime.label)),
                ),
                Span::styled(
                    format!("{:>6.1}%", regime.confidence * 100.0),
                    Tier::above(regime.confidence, 0.7, 0.5).style(),
                ),
            ]));
        }
        if let Some(detail) = &self.detail {
            lines.push(Line::from(vec![
                label("Current: "),
                Span::styled(
                    detail.current.clone(),
                    Style::default()
                        .fg(regime_color(&detail.current))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" ({:.0}%)", detail.confidence * 100.0)),
            ]));
        }

        lines.push(Line::default());
        lines.push(section_header("Alerts"));
        if data.alerts.is_empty() {
            lines.push(Line::from(Span::styled(
                "✓ No active alerts",
                Tier::Good.style(),
            )));
        }
        for alert in &data.alerts[scroll.window(data.alerts.len(), MAX_OVERVIEW_ALERTS)] {
            let tier = match alert.severity.to_ascii_uppercase().as_str() {
                "ERROR" | "CRITICAL" => Tier::Critical,
                "WARN" | "WARNING" => Tier::Warning,
                _ => Tier::Good,
            };
            let prefix = format!("[{}] ", alert.severity);
            let room = width.saturating_sub(prefix.chars().count());
            lines.push(Line::from(vec![
                Span::styled(prefix, tier.style().add_modifier(Modifier::BOLD)),
                Span::raw(truncate(&alert.message, room)),
            ]));
        }
        lines
    }
}

#[async_trait::async_trait]
impl PanelView for OverviewPanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        ctx: &SessionContext,
    ) -> Result<(), DataError> {
        let doc = source.fetch(endpoints::STATUS_OVERVIEW, &[]).await?;
        let data = OverviewData::from_document(require_object(&doc, endpoints::STATUS_OVERVIEW)?);

        // The regime detail is optional; its absence only hides one line.
        let detail = match source
            .fetch(endpoints::STATUS_REGIME, &ctx.regime_params())
            .await
        {
            Ok(doc) if doc.is_object() => Some(RegimeDetail {
                current: doc.str_or("current_regime", "UNKNOWN"),
                confidence: doc.f64_or("confidence", 0.0),
            }),
            Ok(_) => None,
            Err(e) => {
                debug!("Regime detail unavailable: {}", e);
                None
            }
        };

        self.data = Some(data);
        self.detail = detail;
        Ok(())
    }

    fn load_placeholder(&mut self) {
        self.data = Some(OverviewData::placeholder());
        self.detail = Some(RegimeDetail {
            current: "GROWTH".to_string(),
            confidence: 0.85,
        });
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, super::PanelId::Overview.display_name());
        let Some(data) = &self.data else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Loading data...",
                    Style::default().fg(Color::DarkGray),
                )),
                inner,
            );
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(inner);
        self.render_kpis(frame, rows[0], data);

        let lines = self.body_lines(data, rows[1].width as usize, scroll);
        frame.render_widget(Paragraph::new(lines), rows[1]);
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.alerts.len())
    }

    fn max_scroll(&self) -> usize {
        self.row_count().saturating_sub(MAX_OVERVIEW_ALERTS)
    }
}
