//! Error handling for the monitoring API client

use crate::logging::LogLevel;
use thiserror::Error;

/// Every way a fetch can leave a panel without live data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Reqwest error, typically related to network issues or request failures.
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error with status {status}: {message}")]
    Http { status: u16, message: String },

    /// The body was not valid JSON.
    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Valid JSON that does not have the expected document shape.
    #[error("Malformed document from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}

impl DataError {
    pub async fn from_response(response: reqwest::Response) -> DataError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read response text".to_string());

        DataError::Http { status, message }
    }

    pub fn malformed(endpoint: &str, reason: impl Into<String>) -> DataError {
        DataError::Malformed {
            endpoint: endpoint.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the backend never answered: connection, timeout or transfer failures.
    ///
    /// HTTP errors and bad documents still prove the backend is up.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, DataError::Reqwest(_))
    }

    /// A transport failure built without touching the network.
    #[cfg(test)]
    pub(crate) fn transport() -> DataError {
        match reqwest::Client::new().get("http://[::1").build() {
            Err(e) => DataError::Reqwest(e),
            Ok(_) => unreachable!("the URL does not parse"),
        }
    }

    /// Severity to log this failure at.
    pub fn log_level(&self) -> LogLevel {
        match self {
            // Non-critical: rate limiting
            DataError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            DataError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Critical: auth and document shape problems
            DataError::Http { status, .. } if *status == 401 || *status == 403 => LogLevel::Error,
            DataError::Malformed { .. } | DataError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_severity() {
        let http = |status| DataError::Http {
            status,
            message: String::new(),
        };
        assert_eq!(http(429).log_level(), LogLevel::Debug);
        assert_eq!(http(503).log_level(), LogLevel::Warn);
        assert_eq!(http(401).log_level(), LogLevel::Error);
        assert_eq!(http(404).log_level(), LogLevel::Warn);
        assert_eq!(
            DataError::malformed("/api/scenes", "expected array").log_level(),
            LogLevel::Error
        );
    }

    #[test]
    fn only_transport_failures_mean_unreachable() {
        assert!(DataError::transport().is_unreachable());
        assert!(!DataError::malformed("/api/scenes", "expected array").is_unreachable());
        let http = DataError::Http {
            status: 404,
            message: "Not Found".to_string(),
        };
        assert!(!http.is_unreachable());
    }

    #[test]
    fn malformed_message_names_endpoint() {
        let err = DataError::malformed("/api/status/regime", "not an object");
        assert_eq!(
            err.to_string(),
            "Malformed document from /api/status/regime: not an object"
        );
    }
}
