use std::time::Duration;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::response;

/// Reasons a page could not be retrieved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} timed out after {}s", timeout.as_secs())]
    Timeout { url: String, timeout: Duration },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is larger than {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("network error: {0}")]
    Network(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error("Failed to fetch page: {0}")]
    FetchError(#[from] FetchError),

    #[error("Error parsing content: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export error: {0}")]
    ExportError(String),

    #[error("Request processing timed out")]
    Timeout,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::FetchError(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
            AppError::FetchError(_) => StatusCode::BAD_GATEWAY,
            AppError::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConfigError(_) | AppError::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        response::error::<()>(status, self.to_string()).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::FetchError(FetchError::Network(err.to_string()))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::InvalidUrl(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::ExportError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(
            AppError::InvalidUrl("nope".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(FetchError::Status {
                url: "https://example.com".into(),
                status: 404,
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(FetchError::Timeout {
                url: "https://example.com".into(),
                timeout: Duration::from_secs(10),
            })
            .status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            AppError::ParseError("empty".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn fetch_status_message_carries_code() {
        let err = AppError::from(FetchError::Status {
            url: "https://example.com/missing".into(),
            status: 404,
        });
        let msg = err.to_string();
        assert!(msg.contains("404"), "{msg}");
        assert!(msg.contains("https://example.com/missing"), "{msg}");
    }
}
