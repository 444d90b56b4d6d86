//! Error types for Prism Core

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single request against one ledger endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("rate limited by upstream (HTTP 429)")]
    RateLimited,

    #[error("upstream returned an error payload: {0}")]
    Malformed(String),

    #[error("upstream HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),
}

/// Reasons a wallet scan can fail. Any of these aborts the whole snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("No ledger endpoints configured")]
    NoEndpointsConfigured,

    #[error("All {attempts} ledger endpoints failed, last error: {last}")]
    AllEndpointsFailed { attempts: usize, last: UpstreamError },

    #[error("Scan superseded by a newer request")]
    Cancelled,
}

/// Serializable error classification carried on a failed snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidAddress,
    NoEndpointsConfigured,
    AllEndpointsFailed,
    RateLimited,
    MalformedUpstreamResponse,
    Cancelled,
}

impl ScanError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScanError::InvalidAddress(_) => ErrorKind::InvalidAddress,
            ScanError::NoEndpointsConfigured => ErrorKind::NoEndpointsConfigured,
            ScanError::AllEndpointsFailed { last, .. } => match last {
                UpstreamError::RateLimited => ErrorKind::RateLimited,
                UpstreamError::Malformed(_) => ErrorKind::MalformedUpstreamResponse,
                UpstreamError::Status(_) | UpstreamError::Transport(_) => {
                    ErrorKind::AllEndpointsFailed
                }
            },
            ScanError::Cancelled => ErrorKind::Cancelled,
        }
    }
}

impl ErrorKind {
    /// Whether asking again later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::AllEndpointsFailed | ErrorKind::RateLimited | ErrorKind::MalformedUpstreamResponse
        )
    }

    /// Message safe to show to end users; details go to the logs
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::InvalidAddress => "Invalid wallet address",
            ErrorKind::NoEndpointsConfigured => "Ledger access is not configured",
            ErrorKind::Cancelled => "Scan was replaced by a newer request",
            ErrorKind::AllEndpointsFailed
            | ErrorKind::RateLimited
            | ErrorKind::MalformedUpstreamResponse => "Cosmic synchronization failed. Please try again.",
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Validate a Solana wallet address (base58, 32 byte public key)
pub fn validate_address(address: &str) -> ScanResult<()> {
    if address.len() < 32 || address.len() > 44 {
        return Err(ScanError::InvalidAddress(address.to_string()));
    }
    match bs58::decode(address).into_vec() {
        Ok(bytes) if bytes.len() == 32 => Ok(()),
        _ => Err(ScanError::InvalidAddress(address.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_address() {
        assert!(validate_address("So11111111111111111111111111111111111111112").is_ok());
        assert!(validate_address("11111111111111111111111111111111").is_ok());
        assert!(validate_address("short").is_err());
        // '0' and 'O' are not in the base58 alphabet
        assert!(validate_address("0OOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOOO").is_err());
    }

    #[test]
    fn test_kind_follows_last_upstream_error() {
        let rate_limited = ScanError::AllEndpointsFailed {
            attempts: 3,
            last: UpstreamError::RateLimited,
        };
        assert_eq!(rate_limited.kind(), ErrorKind::RateLimited);
        assert!(rate_limited.kind().is_retryable());

        let down = ScanError::AllEndpointsFailed {
            attempts: 2,
            last: UpstreamError::Status(503),
        };
        assert_eq!(down.kind(), ErrorKind::AllEndpointsFailed);

        assert!(!ScanError::InvalidAddress("x".into()).kind().is_retryable());
        assert_eq!(
            ScanError::NoEndpointsConfigured.kind(),
            ErrorKind::NoEndpointsConfigured
        );
    }
}
