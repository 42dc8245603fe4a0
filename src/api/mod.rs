use crate::api::error::DataError;
use serde_json::Value;

pub(crate) mod client;
pub use client::ApiClient;
pub mod error;

#[cfg(test)]
use mockall::automock;

/// Monitoring API endpoints read by the dashboard.
pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const STATUS_OVERVIEW: &str = "/api/status/overview";
    pub const STATUS_REGIME: &str = "/api/status/regime";
    pub const STATUS_PORTFOLIO_RISK: &str = "/api/status/portfolio_risk";
    pub const STATUS_EXECUTION: &str = "/api/status/execution";
    pub const STATUS_UNIVERSE: &str = "/api/status/universe";
    pub const META_EXPERIMENTS: &str = "/api/meta/experiments";
    pub const SCENES: &str = "/api/scenes";
}

/// Builds one query parameter pair.
pub fn param(key: &str, value: impl ToString) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// GETs `endpoint` with the given query parameters and returns the parsed JSON document.
    async fn fetch(&self, endpoint: &str, params: &[(String, String)])
    -> Result<Value, DataError>;

    /// Whether the backend answers its health probe.
    async fn health(&self) -> bool;
}
