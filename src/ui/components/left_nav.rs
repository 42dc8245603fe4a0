//! Left navigation component
//!
//! Lists workspaces and the active workspace's panels, marking the active entries.

use super::Chrome;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

pub fn render_left_nav(f: &mut Frame, area: Rect, chrome: &Chrome) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let active_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);

    let mut lines = vec![heading("Workspaces")];
    for ws in chrome.workspaces.iter() {
        if ws.id == chrome.active_workspace {
            lines.push(Line::from(Span::styled(format!("• {}", ws.name), active_style)));
        } else {
            lines.push(Line::from(format!("  {}", ws.name)));
        }
    }

    lines.push(Line::default());
    lines.push(heading("Panels"));
    if let Some(ws) = chrome.workspaces.get(chrome.active_workspace) {
        for id in &ws.panels {
            if Some(*id) == chrome.active_panel {
                lines.push(Line::from(Span::styled(format!("→ {}", id), active_style)));
            } else {
                lines.push(Line::from(format!("  {}", id)));
            }
        }
    }

    // Stop above the bottom border.
    lines.truncate(inner.height as usize);
    f.render_widget(Paragraph::new(lines), inner);
}
