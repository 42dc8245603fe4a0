//! Right sidebar component
//!
//! Renders the alerts summary and the tail of the live console.

use super::Chrome;
use crate::consts::tui_consts::CONSOLE_TAIL;
use crate::logging::LogLevel;
use crate::ui::format::truncate;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::prelude::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// Console lines inspected when counting recent problems.
const ALERT_WINDOW: usize = 100;

fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Error => Color::Red,
        LogLevel::Warn => Color::Yellow,
        LogLevel::Info => Color::Green,
        LogLevel::Debug | LogLevel::Trace => Color::Gray,
    }
}

fn alert_lines(chrome: &Chrome) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if !chrome.backend_online {
        lines.push(Line::from(Span::styled(
            "✗ Backend offline",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }
    let (errors, warnings) = chrome.console.severity_counts(ALERT_WINDOW);
    if errors > 0 {
        lines.push(Line::from(Span::styled(
            format!("! {} recent errors", errors),
            Style::default().fg(Color::Red),
        )));
    }
    if warnings > 0 {
        lines.push(Line::from(Span::styled(
            format!("! {} recent warnings", warnings),
            Style::default().fg(Color::Yellow),
        )));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "✓ All systems OK",
            Style::default().fg(Color::Green),
        )));
    }
    lines
}

pub fn render_sidebar(f: &mut Frame, area: Rect, chrome: &Chrome) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines = vec![Line::from(Span::styled(
        "Alerts",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.extend(alert_lines(chrome));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Live Console",
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )));

    let width = (area.width as usize).saturating_sub(4);
    for entry in chrome.console.recent(CONSOLE_TAIL) {
        lines.push(Line::from(Span::styled(
            truncate(&entry.message, width),
            Style::default().fg(level_color(entry.level)),
        )));
    }

    lines.truncate(inner.height as usize);
    f.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Mode;
    use crate::logging::{ConsoleLine, ConsoleLog};
    use crate::workspace::WorkspaceTable;

    fn alert_text(console: &ConsoleLog, online: bool) -> Vec<String> {
        let workspaces = WorkspaceTable::default();
        let chrome = Chrome {
            mode: Mode::Paper,
            workspaces: &workspaces,
            active_workspace: "overview",
            active_panel: None,
            console,
            backend_online: online,
        };
        alert_lines(&chrome)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn warnings_and_errors_are_counted_separately() {
        let console = ConsoleLog::with_capacity(50);
        console.push(ConsoleLine::new(LogLevel::Warn, "t", "slow"));
        console.push(ConsoleLine::new(LogLevel::Error, "t", "down"));
        console.push(ConsoleLine::new(LogLevel::Warn, "t", "slow again"));
        assert_eq!(
            alert_text(&console, true),
            vec!["! 1 recent errors", "! 2 recent warnings"]
        );
        assert_eq!(alert_text(&ConsoleLog::default(), true), vec!["✓ All systems OK"]);
    }

    #[test]
    fn alerts_survive_logging_from_another_thread() {
        let console = ConsoleLog::with_capacity(500);
        for i in 0..100 {
            console.push(ConsoleLine::new(LogLevel::Error, "seed", format!("e{}", i)));
        }
        let writer = {
            let console = console.clone();
            std::thread::spawn(move || {
                for i in 0..5000 {
                    console.try_push(ConsoleLine::new(LogLevel::Info, "w", format!("i{}", i)));
                }
            })
        };
        for _ in 0..2000 {
            let lines = alert_text(&console, false);
            assert_eq!(lines[0], "✗ Backend offline");
            assert!(lines.iter().all(|l| !l.contains("recent warnings")));
        }
        writer.join().unwrap();
    }
}
