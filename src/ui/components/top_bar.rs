//! Top bar component
//!
//! Renders the title, trading mode, wall clock and KPI row above a rule.

use super::Chrome;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

pub fn render_top_bar(f: &mut Frame, area: Rect, chrome: &Chrome) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(2)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        "  PROMETHEUS C2",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(title, rows[0]);

    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let status = Paragraph::new(Line::from(vec![
        Span::styled("MODE: ", Style::default().fg(Color::Gray)),
        Span::styled(
            chrome.mode.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("   {}  ", now)),
    ]))
    .alignment(Alignment::Right);
    f.render_widget(status, rows[0]);

    let kpis = Paragraph::new(Line::from(vec![
        Span::raw("  P&L: ---"),
        Span::raw("          STAB: ---"),
        Span::raw("      LEV: ---"),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(kpis, rows[1]);
}
