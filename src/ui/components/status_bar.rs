//! Status bar component
//!
//! Renders the static hotkey legend.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::widgets::Paragraph;

pub const HOTKEY_LEGEND: &str =
    "[Tab] Next Panel | [Shift+Tab] Prev | [W] Workspaces | [R] Refresh | [↑↓] Scroll | [Q] Quit";

pub fn render_status_bar(f: &mut Frame, area: Rect) {
    let legend = Paragraph::new(format!("  {}", HOTKEY_LEGEND)).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(legend, area);
}
