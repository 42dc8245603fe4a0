//! Session setup and initialization

use crate::api::{ApiClient, DataSource};
use crate::config::Config;
use crate::consts::tui_consts::network::API_URL_ENV;
use crate::context::{Mode, SessionContext};
use crate::error::AppError;
use crate::logging::ConsoleLog;
use crate::workspace::WorkspaceTable;
use log::{info, warn};
use std::path::Path;

/// Values given on the command line. Each one wins over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub mode: Option<Mode>,
    pub market: Option<String>,
    pub strategy: Option<String>,
    pub portfolio: Option<String>,
}

impl Overrides {
    /// Applies the environment URL and then the command-line values to `config`.
    pub fn apply(&self, config: &mut Config, env_api_url: Option<String>) {
        if let Some(url) = env_api_url.filter(|u| !u.trim().is_empty()) {
            config.api_url = url;
        }
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(market) = &self.market {
            config.market_id = market.clone();
        }
        if let Some(strategy) = &self.strategy {
            config.strategy_id = strategy.clone();
        }
        if let Some(portfolio) = &self.portfolio {
            config.portfolio_id = portfolio.clone();
        }
    }
}

/// Loads the config file (defaults when missing) and layers the overrides on top.
pub fn resolve_config(path: &Path, overrides: &Overrides) -> Result<Config, AppError> {
    let mut config = Config::load_or_default(path)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    overrides.apply(&mut config, std::env::var(API_URL_ENV).ok());
    Ok(config)
}

/// Everything the TUI needs to start.
pub struct SessionData {
    pub config: Config,
    pub ctx: SessionContext,
    pub client: ApiClient,
    pub console: ConsoleLog,
    pub workspaces: WorkspaceTable,
    /// Result of the startup health probe.
    pub backend_online: bool,
}

/// Builds the API client, the workspace table and the session context, then
/// probes the backend once.
///
/// Call after the console logger is installed so setup warnings reach the
/// live console.
pub async fn setup_session(config: Config, console: ConsoleLog) -> Result<SessionData, AppError> {
    let client = ApiClient::new(config.api_url.clone())?;
    let workspaces = match &config.workspaces {
        Some(entries) => WorkspaceTable::from_config(entries),
        None => WorkspaceTable::default(),
    };
    let mut ctx = config.session_context();
    ctx.active_workspace = workspaces.first().id.clone();

    let backend_online = client.health().await;
    if backend_online {
        info!("Connected to {}", client.base_url());
    } else {
        warn!(
            "Backend at {} is not responding, panels will show placeholder data",
            client.base_url()
        );
    }

    Ok(SessionData {
        config,
        ctx,
        client,
        console,
        workspaces,
        backend_online,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn command_line_beats_environment_beats_file() {
        let mut config = Config {
            api_url: "http://from-file:8000".to_string(),
            ..Config::default()
        };
        Overrides::default().apply(&mut config, Some("http://from-env:8000".to_string()));
        assert_eq!(config.api_url, "http://from-env:8000");

        let overrides = Overrides {
            api_url: Some("http://from-flag:8000".to_string()),
            mode: Some(Mode::Live),
            strategy: Some("MOMENTUM".to_string()),
            ..Overrides::default()
        };
        overrides.apply(&mut config, Some("http://from-env:8000".to_string()));
        assert_eq!(config.api_url, "http://from-flag:8000");
        assert_eq!(config.mode, Mode::Live);
        assert_eq!(config.strategy_id, "MOMENTUM");
        assert_eq!(config.market_id, "US_EQ");
    }

    #[test]
    fn blank_environment_url_is_ignored() {
        let mut config = Config::default();
        Overrides::default().apply(&mut config, Some("  ".to_string()));
        assert_eq!(config.api_url, Config::default().api_url);
    }

    #[test]
    fn invalid_config_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tui.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = resolve_config(&path, &Overrides::default()).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn setup_against_unreachable_backend_still_succeeds() {
        let config = Config {
            api_url: "http://127.0.0.1:9".to_string(),
            portfolio_id: "ALT".to_string(),
            ..Config::default()
        };
        let session = setup_session(config, ConsoleLog::default()).await.unwrap();
        assert!(!session.backend_online);
        assert_eq!(session.ctx.portfolio_id, "ALT");
        assert_eq!(session.ctx.active_workspace, "overview");
        assert_eq!(session.workspaces, WorkspaceTable::default());
    }
}
