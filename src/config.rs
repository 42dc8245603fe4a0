//! Application configuration.

use crate::consts::tui_consts::event_loop::AUTO_REFRESH_SECS;
use crate::consts::tui_consts::network::DEFAULT_API_URL;
use crate::context::{Mode, SessionContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A workspace as written in the config file. Panel ids are validated when the table is built.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub panels: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub market_id: String,
    pub strategy_id: String,
    pub portfolio_id: String,
    pub region: String,
    pub mode: Mode,
    pub refresh_interval_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<WorkspaceConfig>>,
}

impl Default for Config {
    fn default() -> Self {
        let ctx = SessionContext::default();
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            market_id: ctx.market_id,
            strategy_id: ctx.strategy_id,
            portfolio_id: ctx.portfolio_id,
            region: ctx.region,
            mode: ctx.mode,
            refresh_interval_secs: AUTO_REFRESH_SECS,
            workspaces: None,
        }
    }
}

impl Config {
    /// Loads configuration from a JSON file at the given path.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if reading from file fails or JSON is invalid.
    pub fn load_from_file(path: &Path) -> Result<Self, std::io::Error> {
        let buf = fs::read(path)?;
        let config: Config = serde_json::from_slice(&buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        Ok(config)
    }

    /// Loads the file if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, std::io::Error> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration to a JSON file at the given path.
    ///
    /// Directories will be created if they don't exist. This method overwrites existing files.
    ///
    /// # Errors
    /// Returns an `std::io::Error` if writing to file fails or serialization fails.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Auto-refresh interval, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    /// Initial session context for this configuration.
    pub fn session_context(&self) -> SessionContext {
        SessionContext {
            market_id: self.market_id.clone(),
            strategy_id: self.strategy_id.clone(),
            portfolio_id: self.portfolio_id.clone(),
            region: self.region.clone(),
            mode: self.mode,
            ..SessionContext::default()
        }
    }
}

/// Default config location, `~/.prometheus/tui.json`.
pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
    let home_path = home::home_dir().ok_or(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "Failed to get home directory",
    ))?;
    Ok(home_path.join(".prometheus").join("tui.json"))
}
