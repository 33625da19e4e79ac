use serde_json::Value;
use thiserror::Error;

use crate::decoder::ParseError;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// REST backend operations
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// SLP OP_RETURN decoding
    #[error("SLP decode error: {0}")]
    Decode(#[from] ParseError),

    /// UTXO record that matches neither the canonical nor the ElectrumX shape
    #[error("Malformed UTXO at index {index}: {reason}")]
    MalformedUtxo { index: usize, reason: String },

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl AppError {
    /// Payload returned by the backend, when the failure came from one
    pub fn backend_payload(&self) -> Option<&Value> {
        match self {
            AppError::Api(e) => e.backend_payload(),
            _ => None,
        }
    }

    /// True when the failure means "not a valid SLP OP_RETURN"
    pub fn is_not_slp(&self) -> bool {
        matches!(self, AppError::Decode(_))
    }
}

/// REST transport error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Failed to reach the REST server at all
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// TXID string format is invalid (not valid hex or wrong length)
    #[error("Invalid txid: {txid}")]
    InvalidTxid { txid: String },

    /// HTTP request failed before a response was received
    #[error("Request failed: {endpoint} - {message}")]
    RequestFailed { endpoint: String, message: String },

    /// Failed to deserialise response data
    #[error("Deserialisation failed: {0}")]
    DeserialisationFailed(String),

    /// Retry limit exceeded for a request
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },

    /// Request timed out
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },

    /// Server answered with HTTP 429
    #[error("Rate limited: {payload}")]
    RateLimited { payload: Value },

    /// Server answered with a non-2xx status and an error body
    #[error("Backend error ({status_code}): {payload}")]
    Backend { status_code: u16, payload: Value },

    /// Response had an unexpected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transaction is unknown to the backend
    #[error("Transaction not found: {txid}")]
    TransactionNotFound { txid: String },
}

impl ApiError {
    /// Original backend error body, preserved for upstream logging
    pub fn backend_payload(&self) -> Option<&Value> {
        match self {
            ApiError::RateLimited { payload } | ApiError::Backend { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        match self {
            ApiError::RateLimited { .. } => true,
            ApiError::Backend { payload, .. } => payload
                .get("error")
                .and_then(Value::as_str)
                .is_some_and(|msg| msg.to_ascii_lowercase().contains("too many requests")),
            _ => false,
        }
    }

    /// Transient failures the transport may retry
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::ConnectionFailed(_)
            | ApiError::RequestFailed { .. }
            | ApiError::Timeout { .. } => true,
            ApiError::Backend { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for REST operations
pub type ApiResult<T> = Result<T, ApiError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
