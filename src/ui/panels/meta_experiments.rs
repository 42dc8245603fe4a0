//! Meta-learning experiment runs.

use super::fields::{FieldExt, require_list};
use super::{PanelId, PanelView, Scroll, column_header, draw_frame};
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
pub struct Experiment {
    pub id: String,
    pub name: String,
    pub status: String,
    pub score: f64,
    pub iterations: i64,
    pub hyperparams: String,
}

impl Experiment {
    fn status_color(&self) -> Color {
        match self.status.as_str() {
            "COMPLETED" => Color::Green,
            "RUNNING" => Color::Yellow,
            _ => Color::Red,
        }
    }
}

/// `key=value` pairs joined by commas; strings pass through unchanged.
fn hyperparam_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| match v {
                Value::String(s) => format!("{}={}", k, s),
                other => format!("{}={}", k, other),
            })
            .collect::<Vec<_>>()
            .join(","),
        _ => String::new(),
    }
}

fn parse_experiments(items: &[Value]) -> Vec<Experiment> {
    items
        .iter()
        .map(|e| Experiment {
            id: match e.str_or("exp_id", "") {
                s if s.is_empty() => e.str_or("id", "?"),
                s => s,
            },
            name: e.str_or("name", ""),
            status: e.str_or("status", "UNKNOWN").to_ascii_uppercase(),
            score: e.f64_or("performance_score", e.f64_or("score", 0.0)),
            iterations: e.i64_or("iterations", 0),
            hyperparams: hyperparam_text(e.get("hyperparams")),
        })
        .collect()
}

fn placeholder_experiments() -> Vec<Experiment> {
    let exp = |id: &str, name: &str, status: &str, score, iterations, hyperparams: &str| {
        Experiment {
            id: id.to_string(),
            name: name.to_string(),
            status: status.to_string(),
            score,
            iterations,
            hyperparams: hyperparams.to_string(),
        }
    };
    vec![
        exp("EXP_001", "LSTM-Attention-v2", "COMPLETED", 0.87, 1000, "lr=0.001,layers=3"),
        exp("EXP_002", "Transformer-Base", "RUNNING", 0.82, 743, "lr=0.0005,heads=8"),
        exp("EXP_003", "GRU-Ensemble", "COMPLETED", 0.79, 1200, "lr=0.002,units=256"),
        exp("EXP_004", "CNN-LSTM-Hybrid", "FAILED", 0.45, 234, "lr=0.01,conv=32"),
        exp("EXP_005", "Meta-Learner-v3", "RUNNING", 0.91, 567, "meta_lr=0.0001"),
    ]
}

#[derive(Debug, Default)]
pub struct MetaExperimentsPanel {
    experiments: Vec<Experiment>,
}

#[async_trait::async_trait]
impl PanelView for MetaExperimentsPanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        _ctx: &SessionContext,
    ) -> Result<(), DataError> {
        let doc = source.fetch(endpoints::META_EXPERIMENTS, &[]).await?;
        self.experiments = parse_experiments(require_list(
            &doc,
            "experiments",
            endpoints::META_EXPERIMENTS,
        )?);
        Ok(())
    }

    fn load_placeholder(&mut self) {
        self.experiments = placeholder_experiments();
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, PanelId::MetaExperiments.display_name());
        let mut lines = vec![column_header(format!(
            "{:<10} {:<20} {:>10} {:>7} {:>10}  {}",
            "Exp ID", "Name", "Status", "Score", "Iterations", "Hyperparameters"
        ))];
        if self.experiments.is_empty() {
            lines.push(Line::from(Span::styled(
                "No experiments",
                Style::default().fg(Color::DarkGray),
            )));
        }

        let rows = (inner.height as usize).saturating_sub(1);
        let window = scroll.window(self.experiments.len(), rows);
        let hyper_width = (inner.width as usize).saturating_sub(10 + 20 + 10 + 7 + 10 + 6);
        for exp in &self.experiments[window] {
            lines.push(Line::from(vec![
                Span::raw(format!("{:<10} ", truncate(&exp.id, 10))),
                Span::raw(format!("{:<20} ", truncate(&exp.name, 20))),
                Span::styled(
                    format!("{:>10} ", exp.status),
                    Style::default()
                        .fg(exp.status_color())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:>7.3} ", exp.score)),
                Span::raw(format!("{:>10}  ", exp.iterations)),
                Span::styled(
                    truncate(&exp.hyperparams, hyper_width),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn row_count(&self) -> usize {
        self.experiments.len()
    }
}
