use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use prism_core::{ErrorKind, ScanError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid wallet address: {0}")]
    InvalidWallet(String),

    #[error("Scan failed: {0}")]
    Scan(ScanError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::InvalidAddress(address) => AppError::InvalidWallet(address),
            other => AppError::Scan(other),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: String,
}

fn scan_status(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::InvalidAddress => (StatusCode::BAD_REQUEST, "INVALID_WALLET"),
        ErrorKind::NoEndpointsConfigured => (StatusCode::SERVICE_UNAVAILABLE, "NO_ENDPOINTS"),
        ErrorKind::AllEndpointsFailed => (StatusCode::BAD_GATEWAY, "ALL_ENDPOINTS_FAILED"),
        ErrorKind::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
        ErrorKind::MalformedUpstreamResponse => (StatusCode::BAD_GATEWAY, "MALFORMED_UPSTREAM"),
        ErrorKind::Cancelled => (StatusCode::CONFLICT, "SCAN_CANCELLED"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidWallet(wallet) => {
                tracing::warn!(wallet = %wallet, error_code = "INVALID_WALLET", "Invalid wallet address");
                (StatusCode::BAD_REQUEST, "INVALID_WALLET")
            }
            AppError::Scan(err) => {
                let (status, code) = scan_status(err.kind());
                tracing::error!(error = %err, error_code = code, "Wallet scan failed");
                (status, code)
            }
            AppError::Storage(msg) => {
                tracing::error!(message = %msg, error_code = "STORAGE_ERROR", "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
            }
            AppError::NotFound(what) => {
                tracing::info!(what = %what, error_code = "NOT_FOUND", "Resource not found");
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            AppError::Upstream(msg) => {
                tracing::error!(message = %msg, error_code = "UPSTREAM_ERROR", "Upstream request failed");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            AppError::Config(msg) => {
                tracing::error!(message = %msg, error_code = "CONFIG_ERROR", "Configuration error");
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            AppError::InvalidParam(param) => {
                tracing::warn!(param = %param, error_code = "INVALID_PARAM", "Invalid parameter");
                (StatusCode::BAD_REQUEST, "INVALID_PARAM")
            }
            AppError::Internal(msg) => {
                tracing::error!(message = %msg, error_code = "INTERNAL_ERROR", "Internal error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Scan details stay in the logs
        let error = match &self {
            AppError::Scan(err) => err.kind().user_message().to_string(),
            other => other.to_string(),
        };

        tracing::debug!(
            status_code = %status.as_u16(),
            error_code = %code,
            error_message = %error,
            "Returning error response"
        );

        let body = Json(ErrorResponse {
            error,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
