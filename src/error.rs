// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Application error: {0}")]
    Application(String),

    #[error("A query is already in flight")]
    QueryInFlight,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single backend call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The request never produced an HTTP response.
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// A success status carrying a body that does not match the contract.
    #[error("Malformed backend response (status {status}): {message}")]
    Decode { status: u16, message: String },
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { .. } => None,
            Self::Status { status, .. } | Self::Decode { status, .. } => Some(*status),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Network { message }
            | Self::Status { message, .. }
            | Self::Decode { message, .. } => message,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

impl AppError {
    pub fn as_gateway(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway(err) => Some(err),
            _ => None,
        }
    }
}
