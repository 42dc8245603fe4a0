//! Monitoring API Client
//!
//! Read-only JSON client for the monitoring service's status endpoints.

use crate::api::DataSource;
use crate::api::endpoints;
use crate::api::error::DataError;
use crate::consts::tui_consts::network::{connect_timeout, request_timeout};
use reqwest::{Client, ClientBuilder, Response};
use serde_json::Value;

// Build timestamp in milliseconds since epoch
const BUILD_TIMESTAMP: &str = env!("BUILD_TIMESTAMP", "Build timestamp not available");

// User-Agent string with dashboard version
const USER_AGENT: &str = concat!("prometheus-tui/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DataError> {
        let client = ClientBuilder::new()
            .connect_timeout(connect_timeout())
            .timeout(request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: &str, params: &[(String, String)]) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    async fn handle_response_status(response: Response) -> Result<Response, DataError> {
        if !response.status().is_success() {
            return Err(DataError::from_response(response).await);
        }
        Ok(response)
    }

    async fn get_request(&self, url: &str) -> Result<Response, DataError> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("X-Build-Timestamp", BUILD_TIMESTAMP)
            .header("Accept", "application/json")
            .send()
            .await?;
        Self::handle_response_status(response).await
    }
}

#[async_trait::async_trait]
impl DataSource for ApiClient {
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(String, String)],
    ) -> Result<Value, DataError> {
        let url = self.build_url(endpoint, params);
        log::debug!("GET {}", url);
        let response = self.get_request(&url).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn health(&self) -> bool {
        let url = self.build_url(endpoints::HEALTH, &[]);
        self.get_request(&url).await.is_ok()
    }
}
