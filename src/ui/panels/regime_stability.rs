//! Regime stability, fragility and transition probabilities.

use super::fields::{FieldExt, require_object};
use super::{PanelId, PanelView, Scroll, column_header, draw_frame, label, section_header};
use crate::api::error::DataError;
use crate::api::{DataSource, endpoints};
use crate::context::SessionContext;
use crate::ui::format::{Tier, regime_color};
use crate::ui::glyphs::bars;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct RegimeRow {
    pub name: String,
    pub stability: f64,
    pub fragility: f64,
    pub status: String,
    pub days: i64,
}

impl RegimeRow {
    /// Expected persistence: stable and not fragile.
    pub fn persistence(&self) -> f64 {
        self.stability * (1.0 - self.fragility)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub probability: f64,
}

impl Transition {
    fn tier(&self) -> Tier {
        if self.probability > 0.30 {
            Tier::Critical
        } else if self.probability > 0.15 {
            Tier::Warning
        } else {
            Tier::Good
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegimeStabilityData {
    pub current_regime: String,
    pub overall_fragility: f64,
    pub regimes: Vec<RegimeRow>,
    pub transitions: Vec<Transition>,
}

fn fragility_tier(fragility: f64) -> Tier {
    Tier::below(fragility, 0.5, 0.75)
}

fn fragility_label(fragility: f64) -> &'static str {
    match fragility_tier(fragility) {
        Tier::Good => "LOW",
        Tier::Warning => "MODERATE",
        Tier::Critical => "HIGH",
    }
}

impl RegimeStabilityData {
    pub fn placeholder() -> Self {
        let row = |name: &str, stability, fragility, status: &str, days| RegimeRow {
            name: name.to_string(),
            stability,
            fragility,
            status: status.to_string(),
            days,
        };
        let transition = |from: &str, to: &str, probability| Transition {
            from: from.to_string(),
            to: to.to_string(),
            probability,
        };
        Self {
            current_regime: "RISK_ON".to_string(),
            overall_fragility: 0.42,
            regimes: vec![
                row("RISK_ON", 0.82, 0.35, "STABLE", 47),
                row("NEUTRAL", 0.65, 0.58, "TRANSITIONAL", 12),
                row("RISK_OFF", 0.71, 0.48, "STABLE", 23),
                row("CRISIS", 0.45, 0.89, "VOLATILE", 3),
            ],
            transitions: vec![
                transition("RISK_ON", "NEUTRAL", 0.15),
                transition("RISK_ON", "RISK_OFF", 0.08),
                transition("NEUTRAL", "RISK_ON", 0.25),
                transition("NEUTRAL", "RISK_OFF", 0.18),
                transition("RISK_OFF", "NEUTRAL", 0.22),
                transition("CRISIS", "RISK_OFF", 0.42),
            ],
        }
    }

    fn from_document(doc: &Value) -> Self {
        Self {
            current_regime: doc.str_or("current_regime", "UNKNOWN"),
            overall_fragility: doc.f64_or("overall_fragility", 0.0),
            regimes: doc
                .items("regimes")
                .iter()
                .map(|r| RegimeRow {
                    name: r.str_or("name", "?"),
                    stability: r.f64_or("stability", 0.0),
                    fragility: r.f64_or("fragility", 0.0),
                    status: r.str_or("status", "UNKNOWN"),
                    days: r.i64_or("days", 0),
                })
                .collect(),
            transitions: doc
                .items("transitions")
                .iter()
                .map(|t| Transition {
                    from: t.str_or("from", "?"),
                    to: t.str_or("to", "?"),
                    probability: t.f64_or("probability", 0.0),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Default)]
pub struct RegimeStabilityPanel {
    data: Option<RegimeStabilityData>,
}

#[async_trait::async_trait]
impl PanelView for RegimeStabilityPanel {
    async fn load(
        &mut self,
        source: &dyn DataSource,
        ctx: &SessionContext,
    ) -> Result<(), DataError> {
        let doc = source
            .fetch(endpoints::STATUS_REGIME, &ctx.regime_params())
            .await?;
        self.data = Some(RegimeStabilityData::from_document(require_object(
            &doc,
            endpoints::STATUS_REGIME,
        )?));
        Ok(())
    }

    fn load_placeholder(&mut self) {
        self.data = Some(RegimeStabilityData::placeholder());
    }

    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll) {
        let inner = draw_frame(frame, area, PanelId::RegimeStability.display_name());
        let Some(data) = &self.data else {
            frame.render_widget(Paragraph::new("Loading data..."), inner);
            return;
        };

        let mut lines = vec![
            Line::from(vec![
                label("Current Regime: "),
                Span::styled(
                    data.current_regime.clone(),
                    Style::default()
                        .fg(regime_color(&data.current_regime))
                        .add_modifier(Modifier::BOLD),
                ),
                label("   Fragility: "),
                Span::styled(
                    format!(
                        "{:.2} ({})",
                        data.overall_fragility,
                        fragility_label(data.overall_fragility)
                    ),
                    fragility_tier(data.overall_fragility).style(),
                ),
            ]),
            Line::default(),
            section_header("Regimes"),
            column_header(format!(
                "{:<12} {:>6} {:>6} {:>3} {:>8} {:<13} {:>5}",
                "Regime", "Stab", "Frag", "", "Persist", "Status", "Days"
            )),
        ];

        // Transitions take a header plus one line each below the regimes.
        let reserved = 4 + 3 + data.transitions.len();
        let rows = (inner.height as usize).saturating_sub(reserved).max(1);
        let window = scroll.window(data.regimes.len(), rows);
        let fragility: Vec<f64> = data.regimes.iter().map(|r| r.fragility).collect();
        let fragility_bars = bars(&fragility, 1);

        for (idx, regime) in data.regimes[window.clone()].iter().enumerate() {
            let bar = fragility_bars
                .get(window.start + idx)
                .cloned()
                .unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<12} ", regime.name),
                    Style::default().fg(regime_color(&regime.name)),
                ),
                Span::styled(
                    format!("{:>6.2} ", regime.stability),
                    Tier::above(regime.stability, 0.7, 0.5).style(),
                ),
                Span::styled(
                    format!("{:>6.2} ", regime.fragility),
                    fragility_tier(regime.fragility).style(),
                ),
                Span::styled(
                    format!("{:>3} ", bar),
                    fragility_tier(regime.fragility).style(),
                ),
                Span::raw(format!("{:>8.2} ", regime.persistence())),
                Span::styled(
                    format!("{:<13} ", regime.status),
                    Tier::from_status(&regime.status).style(),
                ),
                Span::raw(format!("{:>5}", regime.days)),
            ]));
        }

        lines.push(Line::default());
        lines.push(section_header("Transition Probabilities"));
        for t in &data.transitions {
            lines.push(Line::from(vec![
                Span::raw(format!("{:>10} → {:<10} ", t.from, t.to)),
                Span::styled(
                    format!("{:>6.1}%", t.probability * 100.0),
                    t.tier().style(),
                ),
            ]));
        }
        if data.transitions.is_empty() {
            lines.push(Line::from(Span::styled(
                "No transition data",
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn row_count(&self) -> usize {
        self.data.as_ref().map_or(0, |d| d.regimes.len())
    }
}
