//! Available ANT_HILL scene graphs.

use super::fields::{FieldExt, require_list};
use super::{PanelId, PanelView, Scroll, column_header, draw_frame, label};
use crate::api::error::DataError;
use crate::api::{DataSource, endpoints};
use crate::context::SessionContext;
use crate::ui::format::truncate;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub nodes: i64,
    pub edges: i64,
    pub status: String,
}

fn parse_scenes(items: &[Value]) -> Vec<Scene> {
    items
        .iter()
        .map(|s| Scene {
            id: match s.str_or("view_id", "") {
                id if id.is_empty() => s.str_or("scene_id", "?"),
                id => id,
            },
            name: match s.str_or("display_name", "") {
                name if name.is_empty() => s.str_or("name", ""),
                name => name,
            },
            nodes: s.i64_or("nodes", 0),
            edges: s.i64_or("edges", 0),
            status: s.str_or("status", "ACTIVE").to_ascii_uppercase(),
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct SceneVisualizationPanel {
    scenes: Vec<Scene>,
}

#[async_trait::async_trait]
impl PanelView for SceneVisualizationPanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        _ctx: &SessionContext,
    ) -> Result<(), DataError> {
        let doc = source.fetch(endpoints::SCENES, &[]).await?;
        self.scenes = parse_scenes(require_list(&doc, "scenes", endpoints::SCENES)?);
        Ok(())
    }

    fn load_placeholder(&mut self) {
        let scene = |id: &str, name: &str, nodes, edges, status: &str| Scene {
            id: id.to_string(),
            name: name.to_string(),
            nodes,
            edges,
            status: status.to_string(),
        };
        self.scenes = vec![
            scene("SCENE_001", "Strategy Network", 247, 589, "ACTIVE"),
            scene("SCENE_002", "Risk Connectivity", 189, 423, "ACTIVE"),
            scene("SCENE_003", "Asset Correlations", 512, 1247, "RENDERING"),
            scene("SCENE_004", "Market Topology", 334, 756, "ACTIVE"),
        ];
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, PanelId::SceneVisualization.display_name());
        let nodes: i64 = self.scenes.iter().map(|s| s.nodes).sum();
        let edges: i64 = self.scenes.iter().map(|s| s.edges).sum();
        let mut lines = vec![
            Line::from(vec![
                label("Scenes: "),
                Span::raw(self.scenes.len().to_string()),
                label("   Nodes: "),
                Span::raw(nodes.to_string()),
                label("   Edges: "),
                Span::raw(edges.to_string()),
            ]),
            Line::default(),
            column_header(format!(
                "{:<15} {:<32} {:>8} {:>8} {:>10}",
                "Scene ID", "Name", "Nodes", "Edges", "Status"
            )),
        ];

        let rows = (inner.height as usize).saturating_sub(lines.len());
        for scene in &self.scenes[scroll.window(self.scenes.len(), rows)] {
            let color = if scene.status == "ACTIVE" {
                Color::Green
            } else {
                Color::Yellow
            };
            lines.push(Line::from(vec![
                Span::raw(format!("{:<15} ", truncate(&scene.id, 15))),
                Span::raw(format!("{:<32} ", truncate(&scene.name, 32))),
                Span::raw(format!("{:>8} ", scene.nodes)),
                Span::raw(format!("{:>8} ", scene.edges)),
                Span::styled(
                    format!("{:>10}", scene.status),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn row_count(&self) -> usize {
        self.scenes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDataSource;
    use crate::ui::panels::test_support::render_view;
    use serde_json::json;

    #[tokio::test]
    async fn scene_metadata_maps_to_rows() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|endpoint, _| endpoint == endpoints::SCENES)
            .returning(|_, _| {
                Ok(json!([
                    {"view_id": "root", "display_name": "Prometheus v2 System Architecture",
                     "layout_type": "standard"},
                    {"view_id": "regime", "display_name": "Regime Engine Internals", "nodes": 12}
                ]))
            });

        let mut panel = SceneVisualizationPanel::default();
        panel
            .load(&source, &SessionContext::default())
            .await
            .unwrap();

        assert_eq!(panel.row_count(), 2);
        assert_eq!(panel.scenes[0].id, "root");
        assert_eq!(panel.scenes[0].edges, 0);
        assert_eq!(panel.scenes[0].status, "ACTIVE");
        assert_eq!(panel.scenes[1].nodes, 12);
    }

    #[test]
    fn renders_scene_table() {
        let mut panel = SceneVisualizationPanel::default();
        panel.load_placeholder();
        let text = render_view(&panel, 90, 12, &Scroll::default());
        assert!(text.contains("Scenes: 4   Nodes: 1282   Edges: 3015"));
        assert!(text.contains("Asset Correlations"));
        assert!(text.contains("RENDERING"));
    }

    #[test]
    fn scrolled_table_skips_leading_rows() {
        let mut panel = SceneVisualizationPanel::default();
        panel.load_placeholder();
        let mut scroll = Scroll::default();
        scroll.set_max(panel.max_scroll());
        panel.handle_input(crate::ui::input::PanelKey::End, &mut scroll);
        assert_eq!(scroll.offset(), 3);
        let text = render_view(&panel, 90, 12, &scroll);
        assert!(!text.contains("SCENE_001"));
        assert!(text.contains("SCENE_004"));
    }
}
