//! Main application state and UI loop
//!
//! Contains the App struct (navigation controller) and the cooperative event loop.

use crate::api::DataSource;
use crate::consts::tui_consts::event_loop::{frame_sleep, input_poll};
use crate::context::SessionContext;
use crate::logging::ConsoleLog;
use crate::ui::components::Chrome;
use crate::ui::input::Action;
use crate::ui::panels::{Panel, PanelId};
use crate::ui::screen::Screen;
use crate::workspace::{Workspace, WorkspaceTable};
use crossterm::event;
use log::{debug, info, warn};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::{Duration, Instant};

/// UI configuration data grouped by concern
#[derive(Debug, Clone, Copy)]
pub struct UIConfig {
    pub refresh_interval: Duration,
    /// Result of the startup health probe.
    pub backend_online: bool,
}

impl UIConfig {
    pub fn new(refresh_interval: Duration, backend_online: bool) -> Self {
        Self {
            refresh_interval,
            backend_online,
        }
    }
}

/// Whether the loop should keep going after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Application state
pub struct App {
    screen: Screen,
    workspaces: WorkspaceTable,
    ctx: SessionContext,
    source: Box<dyn DataSource>,
    /// Position of the active panel in the active workspace.
    panel_index: usize,
    last_refresh: Instant,
    refresh_interval: Duration,
    console: ConsoleLog,
    backend_online: bool,
}

impl App {
    /// Creates the application and activates the starting panel.
    ///
    /// The session's workspace and panel are honoured when they exist; otherwise
    /// the first workspace and its first panel are used.
    pub fn new(
        source: Box<dyn DataSource>,
        workspaces: WorkspaceTable,
        mut ctx: SessionContext,
        console: ConsoleLog,
        (width, height): (u16, u16),
        ui_config: UIConfig,
    ) -> Self {
        if workspaces.get(&ctx.active_workspace).is_none() {
            warn!(
                "Unknown workspace '{}', starting in '{}'",
                ctx.active_workspace,
                workspaces.first().id
            );
            ctx.active_workspace = workspaces.first().id.clone();
        }
        let mut app = Self {
            screen: Screen::new(width, height),
            workspaces,
            ctx,
            source,
            panel_index: 0,
            last_refresh: Instant::now(),
            refresh_interval: ui_config.refresh_interval,
            console,
            backend_online: ui_config.backend_online,
        };
        let requested = app.ctx.active_panel;
        let start = requested
            .and_then(|id| app.active_workspace().panels.iter().position(|p| *p == id))
            .unwrap_or(0);
        app.activate_index(start);
        app
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend_online(&self) -> bool {
        self.backend_online
    }

    pub fn active_workspace(&self) -> &Workspace {
        self.workspaces
            .get(&self.ctx.active_workspace)
            .unwrap_or_else(|| self.workspaces.first())
    }

    fn activate_index(&mut self, index: usize) {
        let panels = &self.active_workspace().panels;
        let index = index % panels.len();
        let id = panels[index];
        self.panel_index = index;
        self.ctx.active_panel = Some(id);
        debug!("Activating panel {}", id);
        // The previous panel comes back deactivated and is dropped here.
        let _ = self.screen.set_active_panel(Panel::new(id));
    }

    /// Cycles forward through the active workspace's panels.
    pub fn next_panel(&mut self) {
        self.activate_index(self.panel_index + 1);
    }

    pub fn prev_panel(&mut self) {
        let len = self.active_workspace().panels.len();
        self.activate_index(self.panel_index + len - 1);
    }

    /// Cycles to the next workspace and resets to its first panel.
    pub fn next_workspace(&mut self) {
        let next = self
            .workspaces
            .next_after(&self.ctx.active_workspace)
            .id
            .clone();
        self.switch_workspace(&next);
    }

    /// Switches workspace; unknown ids are logged and leave the state unchanged.
    pub fn switch_workspace(&mut self, id: &str) -> bool {
        let Some(ws) = self.workspaces.get(id) else {
            warn!("Ignoring unknown workspace '{}'", id);
            return false;
        };
        info!("Workspace: {}", ws.name);
        self.ctx.active_workspace = ws.id.clone();
        self.activate_index(0);
        true
    }

    /// Selects a panel of the active workspace by id.
    ///
    /// Unknown ids and panels outside the workspace are logged and ignored.
    pub fn select_panel(&mut self, id: &str) -> bool {
        let panel = match id.parse::<PanelId>() {
            Ok(panel) => panel,
            Err(e) => {
                warn!("Ignoring panel selection: {}", e);
                return false;
            }
        };
        match self
            .active_workspace()
            .panels
            .iter()
            .position(|p| *p == panel)
        {
            Some(index) => {
                self.activate_index(index);
                true
            }
            None => {
                warn!(
                    "Panel '{}' is not part of workspace '{}'",
                    id, self.ctx.active_workspace
                );
                false
            }
        }
    }

    /// Refreshes the active panel and restarts the auto-refresh timer.
    pub async fn refresh_active(&mut self) {
        if let Some(panel) = self.screen.active_panel_mut() {
            panel.refresh(self.source.as_ref(), &self.ctx).await;
            let online = panel.backend_reachable();
            if online != self.backend_online {
                if online {
                    info!("Backend reachable again");
                } else {
                    warn!("Backend unreachable, panels show placeholder data");
                }
                self.backend_online = online;
            }
        }
        self.last_refresh = Instant::now();
    }

    /// Refreshes the active panel if it has never been loaded since activation.
    pub async fn refresh_if_dirty(&mut self) {
        if self.screen.active_panel().is_some_and(Panel::is_dirty) {
            self.refresh_active().await;
        }
    }

    /// Background tick: refreshes once the interval has passed since the last refresh.
    pub async fn auto_refresh_tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_refresh) > self.refresh_interval {
            debug!("Auto-refresh");
            self.refresh_active().await;
            true
        } else {
            false
        }
    }

    /// Applies one input action.
    pub async fn dispatch(&mut self, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::Refresh => self.refresh_active().await,
            Action::NextPanel => self.next_panel(),
            Action::PrevPanel => self.prev_panel(),
            Action::NextWorkspace => self.next_workspace(),
            Action::Resize(width, height) => self.screen.resize(width, height),
            Action::Panel(key) => {
                if let Some(panel) = self.screen.active_panel_mut() {
                    panel.handle_input(key);
                }
            }
        }
        Flow::Continue
    }

    /// Composes one frame.
    pub fn draw(&mut self, f: &mut Frame) {
        let chrome = Chrome {
            mode: self.ctx.mode,
            workspaces: &self.workspaces,
            active_workspace: &self.ctx.active_workspace,
            active_panel: self.ctx.active_panel,
            console: &self.console,
            backend_online: self.backend_online,
        };
        self.screen.render(f, &chrome);
    }
}

/// Runs the UI loop until the user quits.
///
/// One iteration: refresh a dirty panel, draw, poll one input event, apply
/// the auto-refresh tick, then yield briefly.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    loop {
        app.refresh_if_dirty().await;
        terminal.draw(|f| app.draw(f))?;

        if event::poll(input_poll())? {
            if let Some(action) = Action::from_event(&event::read()?) {
                if app.dispatch(action).await == Flow::Quit {
                    info!("Quit requested");
                    return Ok(());
                }
            }
        }

        app.auto_refresh_tick(Instant::now()).await;
        tokio::time::sleep(frame_sleep()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDataSource;
    use crate::api::error::DataError;
    use crate::api::endpoints;
    use crate::ui::input::PanelKey;
    use crate::ui::panels::{DataOrigin, Lifecycle};
    use crate::ui::panels::test_support::buffer_text;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn app_with(source: MockDataSource, workspace: &str) -> App {
        let ctx = SessionContext {
            active_workspace: workspace.to_string(),
            ..SessionContext::default()
        };
        App::new(
            Box::new(source),
            WorkspaceTable::default(),
            ctx,
            ConsoleLog::with_capacity(100),
            (120, 40),
            UIConfig::new(Duration::from_secs(10), true),
        )
    }

    #[test]
    fn starts_on_first_panel_of_session_workspace() {
        let app = app_with(MockDataSource::new(), "trading");
        assert_eq!(app.context().active_panel, Some(PanelId::PortfolioRisk));
        assert_eq!(app.screen().active_panel_id(), Some(PanelId::PortfolioRisk));
    }

    #[test]
    fn unknown_start_workspace_falls_back_to_first() {
        let app = app_with(MockDataSource::new(), "does-not-exist");
        assert_eq!(app.context().active_workspace, "overview");
        assert_eq!(app.context().active_panel, Some(PanelId::Overview));
    }

    #[test]
    fn panel_cycling_wraps_both_ways() {
        let mut app = app_with(MockDataSource::new(), "overview");
        app.next_panel();
        assert_eq!(app.context().active_panel, Some(PanelId::RegimeStability));
        app.next_panel();
        app.next_panel();
        assert_eq!(app.context().active_panel, Some(PanelId::Overview));
        app.prev_panel();
        assert_eq!(app.context().active_panel, Some(PanelId::LiveSystem));
    }

    #[test]
    fn cycling_every_workspace_returns_home() {
        let mut app = app_with(MockDataSource::new(), "research");
        app.next_panel();
        let count = WorkspaceTable::default().len();
        for _ in 0..count {
            app.next_workspace();
            let first = app.active_workspace().first_panel();
            assert_eq!(app.context().active_panel, Some(first));
            assert_eq!(app.screen().active_panel_id(), Some(first));
        }
        assert_eq!(app.context().active_workspace, "research");
        assert_eq!(
            app.context().active_panel,
            Some(PanelId::AssessmentUniverse)
        );
    }

    #[test]
    fn unknown_ids_leave_state_unchanged() {
        let mut app = app_with(MockDataSource::new(), "trading");
        app.next_panel();
        assert!(!app.switch_workspace("geo"));
        assert!(!app.select_panel("fragility"));
        assert!(!app.select_panel("overview"));
        assert_eq!(app.context().active_workspace, "trading");
        assert_eq!(app.context().active_panel, Some(PanelId::Execution));
        assert!(app.select_panel("portfolio_risk"));
        assert_eq!(app.context().active_panel, Some(PanelId::PortfolioRisk));
    }

    #[tokio::test]
    async fn dirty_panel_refreshes_once_then_on_interval() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .withf(|endpoint, _| endpoint == endpoints::STATUS_PORTFOLIO_RISK)
            .times(2)
            .returning(|_, _| Ok(json!({"total_value": 10.0})));
        let mut app = app_with(source, "trading");

        app.refresh_if_dirty().await;
        app.refresh_if_dirty().await;
        assert!(!app.auto_refresh_tick(Instant::now() + Duration::from_secs(5)).await);
        assert!(app.auto_refresh_tick(Instant::now() + Duration::from_secs(11)).await);
        assert!(!app.auto_refresh_tick(Instant::now()).await);
    }

    #[tokio::test]
    async fn transport_failure_marks_backend_offline_in_one_call() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_, _| Err(DataError::transport()));
        source.expect_health().times(0);
        let mut app = app_with(source, "trading");

        assert_eq!(app.dispatch(Action::Refresh).await, Flow::Continue);
        assert!(!app.backend_online());
        let panel = app.screen().active_panel().unwrap();
        assert_eq!(panel.origin(), Some(DataOrigin::Placeholder));
        assert!(!panel.is_dirty());
    }

    #[tokio::test]
    async fn answered_failure_keeps_backend_online() {
        let mut source = MockDataSource::new();
        source.expect_fetch().times(1).returning(|_, _| {
            Err(DataError::Http {
                status: 404,
                message: "Not Found".to_string(),
            })
        });
        source.expect_health().times(0);
        let mut app = app_with(source, "research");
        app.select_panel("meta_experiments");

        app.refresh_active().await;
        assert!(app.backend_online());
        assert_eq!(
            app.screen().active_panel().unwrap().origin(),
            Some(DataOrigin::Placeholder)
        );
    }

    #[tokio::test]
    async fn backend_comes_back_online_after_a_live_refresh() {
        let mut source = MockDataSource::new();
        let mut calls = 0;
        source.expect_fetch().times(2).returning(move |_, _| {
            calls += 1;
            if calls == 1 {
                Err(DataError::transport())
            } else {
                Ok(json!({"total_value": 1.0}))
            }
        });
        let mut app = app_with(source, "trading");

        app.refresh_active().await;
        assert!(!app.backend_online());
        app.refresh_active().await;
        assert!(app.backend_online());
    }

    #[tokio::test]
    async fn actions_drive_navigation_and_panel_input() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(DataError::transport()));
        let mut app = app_with(source, "trading");

        app.dispatch(Action::NextPanel).await;
        assert_eq!(app.context().active_panel, Some(PanelId::Execution));
        app.refresh_if_dirty().await;
        app.dispatch(Action::Panel(PanelKey::End)).await;
        let scroll = app.screen().active_panel().unwrap().scroll();
        assert_eq!(scroll.offset(), scroll.max());
        assert_eq!(scroll.max(), 5);

        app.dispatch(Action::Resize(200, 50)).await;
        assert_eq!(app.screen().layout().right_width, 35);

        app.dispatch(Action::NextWorkspace).await;
        assert_eq!(app.context().active_workspace, "research");
        assert_eq!(app.dispatch(Action::Quit).await, Flow::Quit);
    }

    #[tokio::test]
    async fn draw_renders_the_active_panel_and_chrome() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(DataError::transport()));
        let mut app = app_with(source, "trading");
        app.refresh_if_dirty().await;

        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        let text = buffer_text(terminal.backend().buffer());

        assert!(text.contains("Portfolio Risk"));
        assert!(text.contains("→ portfolio_risk"));
        assert!(text.contains("• Trading"));
        assert!(text.contains("✗ Backend offline"));
        assert_eq!(
            app.screen().active_panel().unwrap().lifecycle(),
            Lifecycle::Rendered
        );
    }
}
