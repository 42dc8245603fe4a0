//! Session context shared read-only with panels.

use crate::api::param;
use crate::ui::panels::PanelId;
use serde::{Deserialize, Serialize};

/// Trading mode the dashboard is looking at.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Live,
    #[default]
    Paper,
    Backtest,
}

/// Identifies what the dashboard is looking at. Only the navigation controller mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub market_id: String,
    pub strategy_id: String,
    pub portfolio_id: String,
    pub region: String,
    pub mode: Mode,
    /// Point-in-time date for historical queries; live data when unset.
    pub as_of_date: Option<String>,
    pub active_workspace: String,
    pub active_panel: Option<PanelId>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            market_id: "US_EQ".to_string(),
            strategy_id: "MAIN".to_string(),
            portfolio_id: "MAIN".to_string(),
            region: "US".to_string(),
            mode: Mode::default(),
            as_of_date: None,
            active_workspace: "overview".to_string(),
            active_panel: None,
        }
    }
}

impl SessionContext {
    /// Query parameters for the regime endpoint.
    pub fn regime_params(&self) -> Vec<(String, String)> {
        let mut params = vec![param("region", &self.region)];
        if let Some(date) = &self.as_of_date {
            params.push(param("as_of_date", date));
        }
        params
    }

    /// Query parameters identifying the portfolio, with the mode when not live.
    pub fn portfolio_params(&self) -> Vec<(String, String)> {
        let mut params = vec![param("portfolio_id", &self.portfolio_id)];
        if self.mode != Mode::Live {
            params.push(param("mode", self.mode));
        }
        params
    }
}
