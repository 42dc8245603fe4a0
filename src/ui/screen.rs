//! Screen manager
//!
//! Owns the region geometry and the single active panel, and composes one
//! full frame per call to [`Screen::render`].

use crate::ui::components::{
    Chrome, left_nav::render_left_nav, sidebar::render_sidebar, status_bar::render_status_bar,
    top_bar::render_top_bar,
};
use crate::ui::layout::{LayoutDimensions, Surfaces, compute_layout};
use crate::ui::panels::{Panel, PanelId, panel_block};
use log::{debug, warn};
use ratatui::Frame;
use ratatui::prelude::{Color, Style};
use ratatui::widgets::Paragraph;

#[derive(Debug)]
pub struct Screen {
    layout: LayoutDimensions,
    surfaces: Surfaces,
    active: Option<Panel>,
}

impl Screen {
    pub fn new(width: u16, height: u16) -> Self {
        let layout = compute_layout(width, height);
        Self {
            layout,
            surfaces: Surfaces::from_layout(&layout),
            active: None,
        }
    }

    pub fn layout(&self) -> &LayoutDimensions {
        &self.layout
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    /// Recomputes the layout and rebuilds every surface from it.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.layout.term_width && height == self.layout.term_height {
            return;
        }
        debug!("Relayout for {}x{}", width, height);
        self.layout = compute_layout(width, height);
        if !self.layout.fits() {
            warn!("Terminal {}x{} is too small for the dashboard", width, height);
        }
        self.surfaces = Surfaces::from_layout(&self.layout);
    }

    /// Makes `panel` the active panel and hands back the previous one, already deactivated.
    pub fn set_active_panel(&mut self, mut panel: Panel) -> Option<Panel> {
        let mut previous = self.active.take();
        if let Some(old) = previous.as_mut() {
            old.deactivate();
        }
        panel.activate();
        self.active = Some(panel);
        previous
    }

    pub fn active_panel(&self) -> Option<&Panel> {
        self.active.as_ref()
    }

    pub fn active_panel_mut(&mut self) -> Option<&mut Panel> {
        self.active.as_mut()
    }

    pub fn active_panel_id(&self) -> Option<PanelId> {
        self.active.as_ref().map(Panel::id)
    }

    /// Draws every region into `frame`. The terminal presents the frame as a whole.
    pub fn render(&mut self, f: &mut Frame, chrome: &Chrome) {
        let area = f.area();
        self.resize(area.width, area.height);
        let surfaces = self.surfaces.clipped_to(area);

        render_top_bar(f, surfaces.top_bar, chrome);
        render_left_nav(f, surfaces.left_nav, chrome);
        match self.active.as_mut() {
            Some(panel) => panel.render(f, surfaces.main),
            None => {
                let block = panel_block("Main");
                let inner = block.inner(surfaces.main);
                f.render_widget(block, surfaces.main);
                f.render_widget(
                    Paragraph::new("No active panel").style(Style::default().fg(Color::Gray)),
                    inner,
                );
            }
        }
        render_sidebar(f, surfaces.right_sidebar, chrome);
        render_status_bar(f, surfaces.status_bar);
    }
}
