//! Workspaces: named, ordered groups of panels.

use crate::config::WorkspaceConfig;
use crate::ui::panels::PanelId;
use log::warn;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    /// Never empty.
    pub panels: Vec<PanelId>,
}

impl Workspace {
    fn new(id: &str, name: &str, panels: &[PanelId]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            panels: panels.to_vec(),
        }
    }

    pub fn first_panel(&self) -> PanelId {
        self.panels[0]
    }
}

/// Fixed, ordered list of workspaces. Always holds at least one workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceTable {
    workspaces: Vec<Workspace>,
}

impl Default for WorkspaceTable {
    fn default() -> Self {
        use PanelId::*;
        Self {
            workspaces: vec![
                Workspace::new("overview", "Overview", &[Overview, RegimeStability, LiveSystem]),
                Workspace::new("trading", "Trading", &[PortfolioRisk, Execution]),
                Workspace::new(
                    "research",
                    "Research",
                    &[AssessmentUniverse, MetaExperiments, SceneVisualization],
                ),
                Workspace::new(
                    "monitoring",
                    "Monitoring",
                    &[LiveSystem, RegimeStability, PortfolioRisk, Execution],
                ),
                Workspace::new("global", "Global View", &[RegimeStability]),
            ],
        }
    }
}

impl WorkspaceTable {
    /// Builds a table from configuration entries.
    ///
    /// Unknown panel ids are dropped and workspaces left without panels are
    /// skipped. If nothing usable remains the default table is returned.
    pub fn from_config(entries: &[WorkspaceConfig]) -> Self {
        let mut workspaces: Vec<Workspace> = Vec::with_capacity(entries.len());
        for entry in entries {
            if workspaces.iter().any(|w| w.id == entry.id) {
                warn!("Duplicate workspace '{}' ignored", entry.id);
                continue;
            }
            let panels: Vec<PanelId> = entry
                .panels
                .iter()
                .filter_map(|raw| match PanelId::from_str(raw) {
                    Ok(id) => Some(id),
                    Err(_) => {
                        warn!("Workspace '{}': unknown panel '{}' ignored", entry.id, raw);
                        None
                    }
                })
                .collect();
            if panels.is_empty() {
                warn!("Workspace '{}' has no known panels, skipping", entry.id);
                continue;
            }
            let name = entry.name.clone().unwrap_or_else(|| entry.id.clone());
            workspaces.push(Workspace {
                id: entry.id.clone(),
                name,
                panels,
            });
        }

        if workspaces.is_empty() {
            warn!("No usable workspaces configured, using defaults");
            return Self::default();
        }
        Self { workspaces }
    }

    pub fn get(&self, id: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|w| w.id == id)
    }

    pub fn first(&self) -> &Workspace {
        &self.workspaces[0]
    }

    /// The workspace following `id`, wrapping to the start. Unknown ids yield the first.
    pub fn next_after(&self, id: &str) -> &Workspace {
        match self.workspaces.iter().position(|w| w.id == id) {
            Some(idx) => &self.workspaces[(idx + 1) % self.workspaces.len()],
            None => self.first(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workspace> {
        self.workspaces.iter()
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }
}
