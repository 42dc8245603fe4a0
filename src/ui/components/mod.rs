//! Screen chrome components
//!
//! Everything drawn around the active panel.

pub mod left_nav;
pub mod sidebar;
pub mod status_bar;
pub mod top_bar;

use crate::context::Mode;
use crate::logging::ConsoleLog;
use crate::ui::panels::PanelId;
use crate::workspace::WorkspaceTable;

/// Read-only view of application state the chrome needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct Chrome<'a> {
    pub mode: Mode,
    pub workspaces: &'a WorkspaceTable,
    pub active_workspace: &'a str,
    pub active_panel: Option<PanelId>,
    pub console: &'a ConsoleLog,
    pub backend_online: bool,
}
