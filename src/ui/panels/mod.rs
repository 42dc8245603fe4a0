//! Panels shown in the main content region
//!
//! A [`Panel`] owns the lifecycle, dirty flag and scroll position; the
//! per-panel [`PanelView`] owns the data and knows how to fetch, fall back
//! to placeholder data, and draw it.

mod fields;

pub mod assessment_universe;
pub mod execution;
pub mod live_system;
pub mod meta_experiments;
pub mod overview;
pub mod portfolio_risk;
pub mod regime_stability;
pub mod scene_visualization;

use crate::api::DataSource;
use crate::api::error::DataError;
use crate::consts::tui_consts::scroll::PAGE_STEP;
use crate::context::SessionContext;
use crate::ui::input::PanelKey;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders};
use std::fmt;
use std::ops::Range;
use std::str::FromStr;
use thiserror::Error;

/// Stable panel identifiers, as used in workspace tables and config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    Overview,
    RegimeStability,
    LiveSystem,
    PortfolioRisk,
    Execution,
    AssessmentUniverse,
    MetaExperiments,
    SceneVisualization,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown panel id: {0}")]
pub struct UnknownPanel(pub String);

impl PanelId {
    pub const ALL: [PanelId; 8] = [
        PanelId::Overview,
        PanelId::RegimeStability,
        PanelId::LiveSystem,
        PanelId::PortfolioRisk,
        PanelId::Execution,
        PanelId::AssessmentUniverse,
        PanelId::MetaExperiments,
        PanelId::SceneVisualization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PanelId::Overview => "overview",
            PanelId::RegimeStability => "regime_stab",
            PanelId::LiveSystem => "live_system",
            PanelId::PortfolioRisk => "portfolio_risk",
            PanelId::Execution => "execution",
            PanelId::AssessmentUniverse => "assessment_universe",
            PanelId::MetaExperiments => "meta_experiments",
            PanelId::SceneVisualization => "ant_hill",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            PanelId::Overview => "System Overview & Health",
            PanelId::RegimeStability => "Regime Stability",
            PanelId::LiveSystem => "Live System",
            PanelId::PortfolioRisk => "Portfolio Risk",
            PanelId::Execution => "Execution",
            PanelId::AssessmentUniverse => "Assessment Universe",
            PanelId::MetaExperiments => "Meta Experiments",
            PanelId::SceneVisualization => "ANT_HILL Visualization",
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = UnknownPanel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownPanel(s.to_string()))
    }
}

/// Panel lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Inactive,
    Activated,
    Refreshing,
    Rendered,
    Deactivated,
}

/// Where the panel's current content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Live,
    Placeholder,
}

/// Scroll position clamped to `[0, max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scroll {
    offset: usize,
    max: usize,
}

impl Scroll {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Sets the bound, pulling the offset back inside it.
    pub fn set_max(&mut self, max: usize) {
        self.max = max;
        self.offset = self.offset.min(max);
    }

    /// Default scrolling: line, page and jump keys. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: PanelKey) -> bool {
        match key {
            PanelKey::LineUp => {
                if self.offset > 0 {
                    self.offset -= 1;
                    true
                } else {
                    false
                }
            }
            PanelKey::LineDown => {
                if self.offset < self.max {
                    self.offset += 1;
                    true
                } else {
                    false
                }
            }
            PanelKey::PageUp => {
                self.offset = self.offset.saturating_sub(PAGE_STEP);
                true
            }
            PanelKey::PageDown => {
                self.offset = (self.offset + PAGE_STEP).min(self.max);
                true
            }
            PanelKey::Home => {
                self.offset = 0;
                true
            }
            PanelKey::End => {
                self.offset = self.max;
                true
            }
            PanelKey::Char(_) | PanelKey::Other => false,
        }
    }

    /// Indices of the rows of a `len`-row list that fit in `rows` lines.
    pub fn window(&self, len: usize, rows: usize) -> Range<usize> {
        let start = self.offset.min(len);
        start..(start + rows).min(len)
    }
}

/// Per-panel data, fetching and drawing.
#[async_trait::async_trait]
pub trait PanelView: Send {
    /// Replaces the panel data from the data source.
    async fn load(
        &mut self,
        source: &dyn DataSource,
        ctx: &SessionContext,
    ) -> Result<(), DataError>;

    /// Replaces the panel data with the deterministic placeholder dataset.
    fn load_placeholder(&mut self);

    /// Draws the panel. Must not fetch or mutate.
    fn render(&self, frame: &mut Frame, area: Rect, scroll: &Scroll);

    /// Number of scrollable rows.
    fn row_count(&self) -> usize;

    fn max_scroll(&self) -> usize {
        self.row_count().saturating_sub(1)
    }

    fn handle_input(&mut self, key: PanelKey, scroll: &mut Scroll) -> bool {
        scroll.handle_key(key)
    }

    fn on_activated(&mut self) {}

    fn on_deactivated(&mut self) {}
}

fn create_view(id: PanelId) -> Box<dyn PanelView> {
    match id {
        PanelId::Overview => Box::new(overview::OverviewPanel::default()),
        PanelId::RegimeStability => Box::new(regime_stability::RegimeStabilityPanel::default()),
        PanelId::LiveSystem => Box::new(live_system::LiveSystemPanel::default()),
        PanelId::PortfolioRisk => Box::new(portfolio_risk::PortfolioRiskPanel::default()),
        PanelId::Execution => Box::new(execution::ExecutionPanel::default()),
        PanelId::AssessmentUniverse => {
            Box::new(assessment_universe::AssessmentUniversePanel::default())
        }
        PanelId::MetaExperiments => Box::new(meta_experiments::MetaExperimentsPanel::default()),
        PanelId::SceneVisualization => {
            Box::new(scene_visualization::SceneVisualizationPanel::default())
        }
    }
}

/// A panel and its lifecycle.
pub struct Panel {
    id: PanelId,
    lifecycle: Lifecycle,
    dirty: bool,
    scroll: Scroll,
    origin: Option<DataOrigin>,
    /// False after a refresh that never got an answer from the backend.
    backend_reachable: bool,
    view: Box<dyn PanelView>,
}

impl fmt::Debug for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panel")
            .field("id", &self.id)
            .field("lifecycle", &self.lifecycle)
            .field("dirty", &self.dirty)
            .field("scroll", &self.scroll)
            .field("origin", &self.origin)
            .field("backend_reachable", &self.backend_reachable)
            .finish()
    }
}

impl Panel {
    pub fn new(id: PanelId) -> Self {
        Self::with_view(id, create_view(id))
    }

    pub fn with_view(id: PanelId, view: Box<dyn PanelView>) -> Self {
        Self {
            id,
            lifecycle: Lifecycle::Inactive,
            dirty: true,
            scroll: Scroll::default(),
            origin: None,
            backend_reachable: true,
            view,
        }
    }

    pub fn id(&self) -> PanelId {
        self.id
    }

    pub fn display_name(&self) -> &'static str {
        self.id.display_name()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn origin(&self) -> Option<DataOrigin> {
        self.origin
    }

    /// Whether the last refresh reached the backend, judged from its own failure.
    pub fn backend_reachable(&self) -> bool {
        self.backend_reachable
    }

    pub fn scroll(&self) -> &Scroll {
        &self.scroll
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.lifecycle, Lifecycle::Inactive | Lifecycle::Deactivated)
    }

    pub fn activate(&mut self) {
        self.lifecycle = Lifecycle::Activated;
        self.dirty = true;
        self.view.on_activated();
    }

    /// Idempotent; only the first call after activation reaches the hook.
    pub fn deactivate(&mut self) {
        if !self.is_active() {
            return;
        }
        self.lifecycle = Lifecycle::Deactivated;
        self.view.on_deactivated();
    }

    /// Reloads data, falling back to the placeholder dataset on any failure.
    ///
    /// The dirty flag is cleared either way. The lifecycle returns to the state
    /// it had before the refresh.
    pub async fn refresh(&mut self, source: &dyn DataSource, ctx: &SessionContext) -> DataOrigin {
        let resume = self.lifecycle;
        self.lifecycle = Lifecycle::Refreshing;
        let origin = match self.view.load(source, ctx).await {
            Ok(()) => {
                self.backend_reachable = true;
                DataOrigin::Live
            }
            Err(e) => {
                let level: log::Level = e.log_level().into();
                log::log!(level, "{}: {}; showing placeholder data", self.id, e);
                self.backend_reachable = !e.is_unreachable();
                self.view.load_placeholder();
                DataOrigin::Placeholder
            }
        };
        self.scroll.set_max(self.view.max_scroll());
        self.dirty = false;
        self.origin = Some(origin);
        self.lifecycle = resume;
        origin
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.view.render(frame, area, &self.scroll);
        if self.is_active() {
            self.lifecycle = Lifecycle::Rendered;
        }
    }

    pub fn handle_input(&mut self, key: PanelKey) -> bool {
        let consumed = self.view.handle_input(key, &mut self.scroll);
        // Overrides may move the offset; keep it inside the bound regardless.
        let max = self.scroll.max();
        self.scroll.set_max(max);
        consumed
    }
}

/// Bordered block with the panel title.
pub(crate) fn panel_block(title: &str) -> Block<'_> {
    Block::default()
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Cyan))
}

/// Draws the panel frame and returns the inner area.
pub(crate) fn draw_frame(frame: &mut Frame, area: Rect, title: &str) -> Rect {
    let block = panel_block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

pub(crate) fn section_header(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
    ))
}

pub(crate) fn column_header(text: String) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    ))
}

pub(crate) fn label(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::Gray))
}

/// Footer for scrollable lists, e.g. `[↑↓ to scroll, 11-20/50]`.
pub(crate) fn scroll_hint(window: &Range<usize>, len: usize) -> Line<'static> {
    let text = if len == 0 {
        "[no rows]".to_string()
    } else {
        format!("[↑↓ to scroll, {}-{}/{}]", window.start + 1, window.end, len)
    };
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{PanelView, Scroll};
    use ratatui::buffer::Buffer;
    use ratatui::{Terminal, backend::TestBackend};

    /// Flattens a buffer into newline-separated rows.
    pub fn buffer_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders a view on a `width` x `height` test terminal and returns its text.
    pub fn render_view(view: &dyn PanelView, width: u16, height: u16, scroll: &Scroll) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                view.render(f, area, scroll);
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDataSource;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records what the panel wrapper asks of its view.
    #[derive(Default)]
    struct Recorder {
        rows: usize,
        placeholder_loads: usize,
        live_loads: usize,
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait::async_trait]
    impl PanelView for Recorder {
        async fn load(
            &mut self,
            source: &dyn DataSource,
            _ctx: &SessionContext,
        ) -> Result<(), DataError> {
            source.fetch("/recorded", &[]).await?;
            self.live_loads += 1;
            self.rows = 30;
            Ok(())
        }

        fn load_placeholder(&mut self) {
            self.placeholder_loads += 1;
            self.rows = 5;
        }

        fn render(&self, _frame: &mut Frame, _area: Rect, _scroll: &Scroll) {}

        fn row_count(&self) -> usize {
            self.rows
        }

        fn on_activated(&mut self) {
            self.events.lock().unwrap().push("activated");
        }

        fn on_deactivated(&mut self) {
            self.events.lock().unwrap().push("deactivated");
        }
    }

    fn failing_source() -> MockDataSource {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .returning(|endpoint, _| Err(DataError::malformed(endpoint, "offline")));
        source
    }

    #[test]
    fn panel_ids_round_trip_through_strings() {
        for id in PanelId::ALL {
            assert_eq!(id.as_str().parse::<PanelId>(), Ok(id));
        }
        assert_eq!(
            "geo".parse::<PanelId>(),
            Err(UnknownPanel("geo".to_string()))
        );
    }

    #[test]
    fn scroll_stays_in_bounds_for_any_key_sequence() {
        let keys = [
            PanelKey::LineUp,
            PanelKey::LineDown,
            PanelKey::PageUp,
            PanelKey::PageDown,
            PanelKey::Home,
            PanelKey::End,
            PanelKey::Char('x'),
        ];
        for max in [0usize, 1, 7, 25] {
            let mut scroll = Scroll::default();
            scroll.set_max(max);
            // Deterministic pseudo-random walk.
            let mut state: u32 = 0x2545_f491;
            for _ in 0..500 {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let key = keys[(state >> 16) as usize % keys.len()];
                scroll.handle_key(key);
                assert!(scroll.offset() <= max);
            }
        }
    }

    #[test]
    fn line_keys_report_consumption_at_bounds() {
        let mut scroll = Scroll::default();
        scroll.set_max(1);
        assert!(!scroll.handle_key(PanelKey::LineUp));
        assert!(scroll.handle_key(PanelKey::LineDown));
        assert!(!scroll.handle_key(PanelKey::LineDown));
        assert!(scroll.handle_key(PanelKey::Home));
        assert_eq!(scroll.offset(), 0);
        assert!(scroll.handle_key(PanelKey::End));
        assert_eq!(scroll.offset(), 1);
    }

    #[test]
    fn shrinking_bound_clamps_offset() {
        let mut scroll = Scroll::default();
        scroll.set_max(40);
        scroll.handle_key(PanelKey::End);
        scroll.set_max(3);
        assert_eq!(scroll.offset(), 3);
    }

    #[test]
    fn window_never_passes_the_end() {
        let mut scroll = Scroll::default();
        scroll.set_max(14);
        scroll.handle_key(PanelKey::End);
        assert_eq!(scroll.window(15, 10), 14..15);
        assert_eq!(scroll.window(3, 10), 3..3);
        assert_eq!(Scroll::default().window(15, 10), 0..10);
    }

    #[tokio::test]
    async fn failed_refresh_loads_placeholder_and_clears_dirty() {
        let source = failing_source();
        let mut panel = Panel::with_view(PanelId::Overview, Box::<Recorder>::default());
        panel.activate();
        assert!(panel.is_dirty());

        let origin = panel.refresh(&source, &SessionContext::default()).await;

        assert_eq!(origin, DataOrigin::Placeholder);
        assert_eq!(panel.origin(), Some(DataOrigin::Placeholder));
        assert!(!panel.is_dirty());
        assert_eq!(panel.lifecycle(), Lifecycle::Activated);
        assert!(panel.backend_reachable());
        assert_eq!(panel.scroll().max(), 4);
    }

    #[tokio::test]
    async fn refresh_returns_to_rendered_and_reports_transport_failures() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_, _| Err(DataError::transport()));
        let mut panel = Panel::with_view(PanelId::Overview, Box::<Recorder>::default());
        panel.activate();
        let backend = ratatui::backend::TestBackend::new(40, 10);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                panel.render(f, area);
            })
            .unwrap();
        assert_eq!(panel.lifecycle(), Lifecycle::Rendered);

        let origin = panel.refresh(&source, &SessionContext::default()).await;

        assert_eq!(origin, DataOrigin::Placeholder);
        assert_eq!(panel.lifecycle(), Lifecycle::Rendered);
        assert!(!panel.backend_reachable());
    }

    #[tokio::test]
    async fn live_refresh_sets_scroll_bound() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_, _| Ok(serde_json::json!({})));
        let mut panel = Panel::with_view(PanelId::Overview, Box::<Recorder>::default());
        panel.activate();

        let origin = panel.refresh(&source, &SessionContext::default()).await;

        assert_eq!(origin, DataOrigin::Live);
        assert_eq!(panel.scroll().max(), 29);
    }

    #[test]
    fn deactivation_is_idempotent() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            events: events.clone(),
            ..Recorder::default()
        };
        let mut panel = Panel::with_view(PanelId::Execution, Box::new(recorder));

        // Never activated: nothing to notify.
        panel.deactivate();
        panel.activate();
        panel.deactivate();
        panel.deactivate();

        assert_eq!(*events.lock().unwrap(), vec!["activated", "deactivated"]);
        assert_eq!(panel.lifecycle(), Lifecycle::Deactivated);
    }

    #[test]
    fn activation_marks_dirty_and_counts() {
        let counter = Arc::new(AtomicUsize::new(0));
        struct Counting(Arc<AtomicUsize>);
        #[async_trait::async_trait]
        impl PanelView for Counting {
            async fn load(
                &mut self,
                _source: &dyn DataSource,
                _ctx: &SessionContext,
            ) -> Result<(), DataError> {
                Ok(())
            }
            fn load_placeholder(&mut self) {}
            fn render(&self, _frame: &mut Frame, _area: Rect, _scroll: &Scroll) {}
            fn row_count(&self) -> usize {
                0
            }
            fn on_activated(&mut self) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let mut panel =
            Panel::with_view(PanelId::MetaExperiments, Box::new(Counting(counter.clone())));
        panel.activate();
        assert!(panel.is_dirty());
        assert_eq!(panel.lifecycle(), Lifecycle::Activated);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn every_panel_has_a_view() {
        for id in PanelId::ALL {
            let panel = Panel::new(id);
            assert_eq!(panel.id(), id);
            assert_eq!(panel.lifecycle(), Lifecycle::Inactive);
        }
    }
}
