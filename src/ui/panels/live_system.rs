//! Live system health: resource metrics and the backend's recent log stream.

use super::fields::{FieldExt, require_object};
use super::{PanelId, PanelView, Scroll, column_header, draw_frame, scroll_hint, section_header};
use crate::api::error::DataError;
use crate::api::{DataSource, endpoints};
use crate::consts::tui_consts::scroll::LIST_PAGE_ROWS;
use crate::context::SessionContext;
use crate::ui::format::{Tier, truncate};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

const METRIC_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SystemMetric {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub status: String,
}

impl SystemMetric {
    fn formatted(&self) -> String {
        if self.unit.is_empty() {
            format!("{:.0}", self.value)
        } else {
            format!("{:.1} {}", self.value, self.unit)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SystemLog {
    pub timestamp: String,
    pub level: String,
    pub component: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiveSystemData {
    pub status: String,
    pub metrics: Vec<SystemMetric>,
    pub logs: Vec<SystemLog>,
}

impl LiveSystemData {
    pub fn placeholder() -> Self {
        let metric = |name: &str, value, unit: &str| SystemMetric {
            name: name.to_string(),
            value,
            unit: unit.to_string(),
            status: "OK".to_string(),
        };
        let log = |timestamp: &str, level: &str, component: &str, message: &str| SystemLog {
            timestamp: timestamp.to_string(),
            level: level.to_string(),
            component: component.to_string(),
            message: message.to_string(),
        };
        Self {
            status: "HEALTHY".to_string(),
            metrics: vec![
                metric("CPU Usage", 42.5, "%"),
                metric("Memory", 68.2, "%"),
                metric("Disk I/O", 15.3, "MB/s"),
                metric("Network", 128.7, "Mbps"),
                metric("Active Orders", 47.0, ""),
                metric("Connections", 8.0, ""),
                metric("Latency", 12.4, "ms"),
                metric("Throughput", 1250.0, "msgs/s"),
            ],
            logs: vec![
                log("2024-12-08 15:42:13", "INFO", "OrderManager", "Order filled: AAPL 100 @ 185.50"),
                log("2024-12-08 15:42:10", "INFO", "RiskEngine", "Position check passed"),
                log("2024-12-08 15:41:58", "WARN", "DataFeed", "Minor latency spike: 45ms"),
                log("2024-12-08 15:41:45", "INFO", "Strategy", "Signal generated: BUY MSFT"),
                log("2024-12-08 15:41:32", "INFO", "Portfolio", "Rebalance triggered"),
                log("2024-12-08 15:41:20", "INFO", "Market", "Market open detected"),
                log("2024-12-08 15:41:15", "INFO", "System", "Health check passed"),
                log("2024-12-08 15:41:00", "INFO", "OrderManager", "Order submitted: TSLA 50"),
            ],
        }
    }

    fn from_document(doc: &Value) -> Self {
        Self {
            status: doc.str_or("status", "UNKNOWN"),
            metrics: doc
                .items("metrics")
                .iter()
                .map(|m| SystemMetric {
                    name: m.str_or("name", ""),
                    value: m.f64_or("value", 0.0),
                    unit: m.str_or("unit", ""),
                    status: m.str_or("status", "OK"),
                })
                .collect(),
            logs: doc
                .items("logs")
                .iter()
                .map(|l| SystemLog {
                    timestamp: l.str_or("timestamp", ""),
                    level: l.str_or("level", "INFO"),
                    component: l.str_or("component", ""),
                    message: l.str_or("message", ""),
                })
                .collect(),
        }
    }

    fn status_tier(&self) -> Tier {
        match self.status.as_str() {
            "HEALTHY" => Tier::Good,
            "DEGRADED" => Tier::Warning,
            _ => Tier::Critical,
        }
    }
}

fn level_color(level: &str) -> Color {
    match level {
        "ERROR" | "CRITICAL" => Color::Red,
        "WARN" | "WARNING" => Color::Yellow,
        "INFO" => Color::Green,
        _ => Color::White,
    }
}

fn metric_tier(status: &str) -> Tier {
    match status {
        "WARNING" | "WARN" => Tier::Warning,
        "ERROR" => Tier::Critical,
        _ => Tier::Good,
    }
}

#[derive(Debug, Default)]
pub struct LiveSystemPanel {
    data: Option<LiveSystemData>,
}

impl LiveSystemPanel {
    fn render_metrics(&self, frame: &mut Frame, area: Rect, data: &LiveSystemData) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let per_column = data.metrics.len().div_ceil(METRIC_COLUMNS).max(1);
        for (column, chunk) in data.metrics.chunks(per_column).enumerate() {
            let mut lines = Vec::with_capacity(chunk.len() * 2);
            for metric in chunk {
                lines.push(Line::from(Span::styled(
                    metric.name.clone(),
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::from(Span::styled(
                    format!("  {}", metric.formatted()),
                    metric_tier(&metric.status)
                        .style()
                        .add_modifier(Modifier::BOLD),
                )));
            }
            if let Some(area) = columns.get(column) {
                frame.render_widget(Paragraph::new(lines), *area);
            }
        }
    }
}

#[async_trait::async_trait]
impl PanelView for LiveSystemPanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        _ctx: &SessionContext,
    ) -> Result<(), DataError> {
        let doc = source.fetch(endpoints::STATUS_OVERVIEW, &[]).await?;
        self.data = Some(LiveSystemData::from_document(require_object(
            &doc,
            endpoints::STATUS_OVERVIEW,
        )?));
        Ok(())
    }

    fn load_placeholder(&mut self) {
        self.data = Some(LiveSystemData::placeholder());
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, PanelId::LiveSystem.display_name());
        let Some(data) = &self.data else {
            frame.render_widget(Paragraph::new("Loading data..."), inner);
            return;
        };

        let metric_rows = data.metrics.len().div_ceil(METRIC_COLUMNS) as u16 * 2;
        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(metric_rows),
                Constraint::Min(0),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled("Overall Status: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    data.status.clone(),
                    data.status_tier().style().add_modifier(Modifier::BOLD),
                ),
            ])),
            sections[0],
        );
        self.render_metrics(frame, sections[1], data);

        let logs_area = sections[2];
        let width = logs_area.width as usize;
        let mut lines = vec![
            Line::default(),
            section_header("Recent System Logs"),
            column_header(format!(
                "{:<19} {:<5} {:<15} {}",
                "Timestamp", "Level", "Component", "Message"
            )),
        ];
        // Header block above plus the scroll hint below.
        let rows = (logs_area.height as usize).saturating_sub(4);
        let window = scroll.window(data.logs.len(), rows);
        let message_width = width.saturating_sub(19 + 1 + 5 + 1 + 15 + 1);
        for log in &data.logs[window.clone()] {
            lines.push(Line::from(vec![
                Span::styled(format!("{:<19} ", log.timestamp), Style::default().fg(Color::DarkGray)),
                Span::styled(
                    format!("{:<5} ", log.level),
                    Style::default()
                        .fg(level_color(&log.level))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:<15} ", truncate(&log.component, 15))),
                Span::raw(truncate(&log.message, message_width)),
            ]));
        }
        lines.push(scroll_hint(&window, data.logs.len()));
        frame.render_widget(Paragraph::new(lines), logs_area);
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.logs.len())
    }

    fn max_scroll(&self) -> usize {
        self.row_count().saturating_sub(LIST_PAGE_ROWS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDataSource;
    use crate::ui::input::PanelKey;
    use crate::ui::panels::test_support::render_view;
    use crate::ui::panels::{Panel, PanelId};
    use serde_json::json;

    #[test]
    fn metric_formatting_depends_on_unit() {
        let data = LiveSystemData::placeholder();
        assert_eq!(data.metrics[0].formatted(), "42.5 %");
        assert_eq!(data.metrics[4].formatted(), "47");
    }

    #[test]
    fn status_tiers() {
        let mut data = LiveSystemData::placeholder();
        assert_eq!(data.status_tier(), Tier::Good);
        data.status = "DEGRADED".to_string();
        assert_eq!(data.status_tier(), Tier::Warning);
        data.status = "DOWN".to_string();
        assert_eq!(data.status_tier(), Tier::Critical);
    }

    #[tokio::test]
    async fn list_scroll_keeps_a_page_visible() {
        let logs: Vec<Value> = (0..25)
            .map(|i| json!({"timestamp": format!("t{}", i), "message": "m"}))
            .collect();
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .returning(move |_, _| Ok(json!({"status": "HEALTHY", "logs": logs.clone()})));

        let mut panel = Panel::with_view(PanelId::LiveSystem, Box::<LiveSystemPanel>::default());
        panel.activate();
        panel.refresh(&source, &SessionContext::default()).await;
        assert_eq!(panel.scroll().max(), 15);

        panel.handle_input(PanelKey::End);
        assert_eq!(panel.scroll().offset(), 15);
        assert!(!panel.handle_input(PanelKey::LineDown));
        assert_eq!(panel.scroll().offset(), 15);
    }

    #[test]
    fn renders_status_metrics_and_logs() {
        let mut panel = LiveSystemPanel::default();
        panel.load_placeholder();
        let text = render_view(&panel, 100, 30, &Scroll::default());
        assert!(text.contains("Overall Status: HEALTHY"));
        assert!(text.contains("Throughput"));
        assert!(text.contains("1250.0 msgs/s"));
        assert!(text.contains("Minor latency spike: 45ms"));
        assert!(text.contains("[↑↓ to scroll, 1-8/8]"));
    }
}
