//! Key and terminal event mapping

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Keys forwarded to the active panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Home,
    End,
    Char(char),
    Other,
}

/// What the navigation controller should do with one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Refresh,
    NextPanel,
    PrevPanel,
    NextWorkspace,
    Resize(u16, u16),
    Panel(PanelKey),
}

impl Action {
    /// Maps a terminal event. Key releases, mouse and focus events map to nothing.
    pub fn from_event(event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => Self::from_key(key),
            Event::Resize(width, height) => Some(Action::Resize(*width, *height)),
            _ => None,
        }
    }

    pub fn from_key(key: &KeyEvent) -> Option<Action> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }
        let action = match key.code {
            KeyCode::Tab => Action::NextPanel,
            KeyCode::BackTab => Action::PrevPanel,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'q' => Action::Quit,
                'r' => Action::Refresh,
                'w' => Action::NextWorkspace,
                _ => Action::Panel(PanelKey::Char(c)),
            },
            KeyCode::Up => Action::Panel(PanelKey::LineUp),
            KeyCode::Down => Action::Panel(PanelKey::LineDown),
            KeyCode::PageUp => Action::Panel(PanelKey::PageUp),
            KeyCode::PageDown => Action::Panel(PanelKey::PageDown),
            KeyCode::Home => Action::Panel(PanelKey::Home),
            KeyCode::End => Action::Panel(PanelKey::End),
            _ => Action::Panel(PanelKey::Other),
        };
        Some(action)
    }
}
