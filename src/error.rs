//! Fatal application errors

use crate::api::error::DataError;
use log::SetLoggerError;
use thiserror::Error;

/// Errors that end the process with a non-zero exit code.
#[derive(Debug, Error)]
pub enum AppError {
    /// Setting up, drawing to or restoring the terminal failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP client could not be constructed.
    #[error("Client error: {0}")]
    Client(#[from] DataError),

    #[error("Logger error: {0}")]
    Logger(#[from] SetLoggerError),
}

impl AppError {
    /// Short title for the CLI error line.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Terminal(_) => "Terminal failure",
            AppError::Config(_) => "Invalid configuration",
            AppError::Client(_) => "Could not create API client",
            AppError::Logger(_) => "Could not install logger",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_become_terminal_errors() {
        let err: AppError = std::io::Error::other("no tty").into();
        assert!(matches!(err, AppError::Terminal(_)));
        assert_eq!(err.title(), "Terminal failure");
        assert_eq!(err.to_string(), "Terminal error: no tty");
    }

    #[test]
    fn data_errors_become_client_errors() {
        let err: AppError = DataError::malformed("/health", "bad").into();
        assert!(matches!(err, AppError::Client(_)));
        assert!(err.to_string().contains("/health"));
    }
}
