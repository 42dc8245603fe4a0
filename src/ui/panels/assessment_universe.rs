//! Strategy universe membership and assessment scores.

use super::fields::{FieldExt, require_object};
use super::{PanelId, PanelView, Scroll, column_header, draw_frame, label, scroll_hint};
use crate::api::error::DataError;
use crate::api::{DataSource, endpoints, param};
use crate::consts::tui_consts::scroll::LIST_PAGE_ROWS;
use crate::context::SessionContext;
use crate::ui::format::{Tier, truncate};
use crate::ui::glyphs::histogram;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

const NAME_WIDTH: usize = 20;
const HISTOGRAM_BINS: usize = 10;
const HISTOGRAM_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct UniverseMember {
    pub symbol: String,
    pub name: String,
    pub score: f64,
    /// `IN`, `OUT` or `PENDING`.
    pub status: String,
    pub quality: f64,
    pub liquidity: f64,
    pub days: i64,
}

impl UniverseMember {
    fn is_in(&self) -> bool {
        self.status == "IN"
    }

    fn score_tier(&self) -> Tier {
        Tier::above(self.score, 0.8, 0.7)
    }

    fn status_color(&self) -> Color {
        match self.status.as_str() {
            "IN" => Color::Green,
            "PENDING" => Color::Yellow,
            _ => Color::Red,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UniverseData {
    pub strategy_id: String,
    pub members: Vec<UniverseMember>,
}

impl UniverseData {
    pub fn placeholder(strategy_id: &str) -> Self {
        let member = |symbol: &str, name: &str, score, status: &str, quality, liquidity, days| {
            UniverseMember {
                symbol: symbol.to_string(),
                name: name.to_string(),
                score,
                status: status.to_string(),
                quality,
                liquidity,
                days,
            }
        };
        Self {
            strategy_id: strategy_id.to_string(),
            members: vec![
                member("AAPL", "Apple Inc.", 0.87, "IN", 0.92, 0.98, 245),
                member("MSFT", "Microsoft Corp.", 0.85, "IN", 0.89, 0.95, 198),
                member("GOOGL", "Alphabet Inc.", 0.82, "IN", 0.88, 0.91, 167),
                member("AMZN", "Amazon.com Inc.", 0.79, "IN", 0.84, 0.89, 143),
                member("NVDA", "NVIDIA Corp.", 0.91, "IN", 0.93, 0.88, 98),
                member("META", "Meta Platforms", 0.76, "IN", 0.81, 0.85, 76),
                member("TSLA", "Tesla Inc.", 0.72, "PENDING", 0.75, 0.68, 0),
                member("JPM", "JPMorgan Chase", 0.83, "IN", 0.87, 0.94, 234),
                member("V", "Visa Inc.", 0.88, "IN", 0.91, 0.96, 287),
                member("WMT", "Walmart Inc.", 0.74, "IN", 0.79, 0.92, 156),
                member("DIS", "Walt Disney Co.", 0.68, "OUT", 0.71, 0.76, 0),
                member("BA", "Boeing Co.", 0.63, "OUT", 0.67, 0.72, 0),
                member("XOM", "Exxon Mobil", 0.80, "IN", 0.84, 0.91, 201),
                member("PG", "Procter & Gamble", 0.77, "IN", 0.82, 0.93, 178),
                member("HD", "Home Depot", 0.81, "IN", 0.85, 0.89, 145),
            ],
        }
    }

    fn from_document(doc: &Value, strategy_id: &str) -> Self {
        let members = doc
            .items("candidates")
            .iter()
            .map(|c| {
                let quality = c.f64_or("quality_score", 0.0);
                let liquidity = c.f64_or("liquidity_score", 0.0);
                // Backends without a composite score get the mean of its parts.
                let score = c.f64_or(
                    "assessment_score",
                    c.f64_or("score", (quality + liquidity) / 2.0),
                );
                let status = match c.str_or("status", "") {
                    s if s.is_empty() => {
                        let included = c.bool_or("in_universe", false);
                        (if included { "IN" } else { "OUT" }).to_string()
                    }
                    s => s.to_ascii_uppercase(),
                };
                UniverseMember {
                    symbol: c.str_or("instrument_id", "?"),
                    name: c.str_or("name", ""),
                    score,
                    status,
                    quality,
                    liquidity,
                    days: c.i64_or("days_in_universe", 0),
                }
            })
            .collect();
        Self {
            strategy_id: doc.str_or("strategy_id", strategy_id),
            members,
        }
    }

    pub fn active_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_in()).count()
    }

    fn scores(&self) -> Vec<f64> {
        self.members.iter().map(|m| m.score).collect()
    }
}

#[derive(Debug, Default)]
pub struct AssessmentUniversePanel {
    data: Option<UniverseData>,
    strategy_id: String,
}

#[async_trait::async_trait]
impl PanelView for AssessmentUniversePanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        ctx: &SessionContext,
    ) -> Result<(), DataError> {
        self.strategy_id = ctx.strategy_id.clone();
        let mut params = vec![param("strategy_id", &ctx.strategy_id)];
        if let Some(date) = &ctx.as_of_date {
            params.push(param("as_of_date", date));
        }
        let doc = source.fetch(endpoints::STATUS_UNIVERSE, &params).await?;
        self.data = Some(UniverseData::from_document(
            require_object(&doc, endpoints::STATUS_UNIVERSE)?,
            &ctx.strategy_id,
        ));
        Ok(())
    }

    fn load_placeholder(&mut self) {
        self.data = Some(UniverseData::placeholder(&self.strategy_id));
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, PanelId::AssessmentUniverse.display_name());
        let Some(data) = &self.data else {
            frame.render_widget(Paragraph::new("Loading data..."), inner);
            return;
        };

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(vec![
                label("Strategy: "),
                Span::styled(data.strategy_id.clone(), bold),
                label("   Total Assessed: "),
                Span::styled(data.members.len().to_string(), bold),
                label("   Active in Universe: "),
                Span::styled(
                    data.active_count().to_string(),
                    bold.fg(Color::Green),
                ),
            ]),
            Line::from(vec![
                label("Score Distribution: "),
                Span::styled(
                    histogram(&data.scores(), HISTOGRAM_BINS, HISTOGRAM_WIDTH, 1),
                    Style::default().fg(Color::Cyan),
                ),
            ]),
            Line::default(),
            column_header(format!(
                "{:<8} {:<20} {:>10} {:>8} {:>8} {:>9} {:>5}",
                "Symbol", "Name", "Assessment", "Status", "Quality", "Liquidity", "Days"
            )),
        ];

        let rows = (inner.height as usize).saturating_sub(lines.len() + 1);
        let window = scroll.window(data.members.len(), rows);
        for member in &data.members[window.clone()] {
            let days = if member.is_in() {
                member.days.to_string()
            } else {
                "-".to_string()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<8} ", truncate(&member.symbol, 8)), bold),
                Span::raw(format!("{:<20} ", truncate(&member.name, NAME_WIDTH))),
                Span::styled(
                    format!("{:>10.2} ", member.score),
                    member.score_tier().style().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:>8} ", member.status),
                    bold.fg(member.status_color()),
                ),
                Span::raw(format!("{:>8.2} ", member.quality)),
                Span::raw(format!("{:>9.2} ", member.liquidity)),
                Span::raw(format!("{:>5}", days)),
            ]));
        }
        lines.push(scroll_hint(&window, data.members.len()));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.members.len())
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
    use crate::ui::panels::{DataOrigin, Panel};
    use serde_json::json;

    #[test]
    fn placeholder_counts() {
        let data = UniverseData::placeholder("MAIN");
        assert_eq!(data.members.len(), 15);
        assert_eq!(data.active_count(), 12);
    }

    #[test]
    fn score_tiers() {
        let data = UniverseData::placeholder("MAIN");
        let tier = |symbol: &str| {
            data.members
                .iter()
                .find(|m| m.symbol == symbol)
                .map(UniverseMember::score_tier)
        };
        assert_eq!(tier("NVDA"), Some(Tier::Good));
        assert_eq!(tier("XOM"), Some(Tier::Warning));
        assert_eq!(tier("TSLA"), Some(Tier::Warning));
        assert_eq!(tier("BA"), Some(Tier::Critical));
    }

    #[tokio::test]
    async fn candidates_map_to_members() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|endpoint, params| {
                endpoint == endpoints::STATUS_UNIVERSE
                    && params == [param("strategy_id", "US_CORE")]
            })
            .returning(|_, _| {
                Ok(json!({
                    "strategy_id": "US_CORE",
                    "candidates": [
                        {"instrument_id": "AAPL.US", "in_universe": true,
                         "quality_score": 0.9, "liquidity_score": 0.7},
                        {"instrument_id": "BA.US", "in_universe": false, "score": 0.4},
                        {"instrument_id": "IBM.US", "status": "pending", "assessment_score": 0.75}
                    ]
                }))
            });

        let ctx = SessionContext {
            strategy_id: "US_CORE".to_string(),
            ..SessionContext::default()
        };
        let mut panel = AssessmentUniversePanel::default();
        panel.load(&source, &ctx).await.unwrap();

        let data = panel.data.as_ref().unwrap();
        assert_eq!(data.strategy_id, "US_CORE");
        let statuses: Vec<&str> = data.members.iter().map(|m| m.status.as_str()).collect();
        assert_eq!(statuses, vec!["IN", "OUT", "PENDING"]);
        assert!((data.members[0].score - 0.8).abs() < 1e-9);
        assert_eq!(data.members[1].score, 0.4);
        assert_eq!(data.members[2].score, 0.75);
        assert_eq!(data.active_count(), 1);
    }

    #[tokio::test]
    async fn offline_universe_pages_through_placeholder() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .returning(|endpoint, _| Err(DataError::malformed(endpoint, "offline")));
        let ctx = SessionContext {
            strategy_id: "EU_CORE".to_string(),
            ..SessionContext::default()
        };
        let mut panel = Panel::with_view(
            PanelId::AssessmentUniverse,
            Box::<AssessmentUniversePanel>::default(),
        );
        panel.activate();
        assert_eq!(panel.refresh(&source, &ctx).await, DataOrigin::Placeholder);
        assert_eq!(panel.scroll().max(), 5);
        panel.handle_input(PanelKey::PageDown);
        assert_eq!(panel.scroll().offset(), 5);
    }

    #[test]
    fn renders_members_with_truncated_names() {
        let mut panel = AssessmentUniversePanel::default();
        panel.strategy_id = "MAIN".to_string();
        panel.data = Some(UniverseData {
            strategy_id: "MAIN".to_string(),
            members: vec![UniverseMember {
                symbol: "XYZ".to_string(),
                name: "Extremely Long Company Name Holdings".to_string(),
                score: 0.5,
                status: "OUT".to_string(),
                quality: 0.1,
                liquidity: 0.2,
                days: 9,
            }],
        });
        let text = render_view(&panel, 90, 12, &Scroll::default());
        assert!(text.contains("Extremely Long Co..."));
        assert!(!text.contains("Holdings"));
        assert!(text.contains("[↑↓ to scroll, 1-1/1]"));
    }

    #[test]
    fn renders_summary_and_histogram() {
        let mut panel = AssessmentUniversePanel::default();
        panel.load_placeholder();
        let text = render_view(&panel, 90, 14, &Scroll::default());
        assert!(text.contains("Total Assessed: 15"));
        assert!(text.contains("Active in Universe: 12"));
        assert!(text.contains("Score Distribution: "));
        assert!(text.contains("PENDING"));
        // 14 rows leave room for 7 members.
        assert!(text.contains("[↑↓ to scroll, 1-7/15]"));
    }
}
