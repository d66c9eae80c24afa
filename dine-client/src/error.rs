//! Client error types

use shared::error::{AppError, ErrorCategory, ErrorCode};
use std::time::Duration;
use thiserror::Error;

/// Shown for anything the client cannot explain
pub const GENERIC_MESSAGE: &str = "Something went wrong";

/// Client error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Request rejected as malformed
    #[error("Validation error: {0}")]
    Validation(String),

    /// Status change not allowed from the current state for this role
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Another waiter got there first
    #[error("{message}")]
    AlreadyClaimed {
        message: String,
        waiter_id: Option<String>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Network failure talking to the gateway
    #[error("Transport error: {0}")]
    Transport(String),

    /// View is offline; nothing was sent
    #[error("Offline")]
    Offline,

    /// Call-staff debounce still running
    #[error("Please wait {}s before calling staff again", .0.as_secs().max(1))]
    Throttled(Duration),

    /// Any other gateway error
    #[error("Server error {code}: {message}")]
    Server { code: ErrorCode, message: String },

    /// Response did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Text to show the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(m) | Self::InvalidTransition(m) | Self::NotFound(m) => m.clone(),
            Self::AlreadyClaimed { message, .. } => message.clone(),
            Self::Transport(_) | Self::Offline => {
                "You are offline. Check the connection and try again".to_string()
            }
            Self::Throttled(_) => self.to_string(),
            Self::Server { code, message } => match code.category() {
                ErrorCategory::System => GENERIC_MESSAGE.to_string(),
                _ if message.is_empty() => GENERIC_MESSAGE.to_string(),
                _ => message.clone(),
            },
            Self::InvalidResponse(_) => GENERIC_MESSAGE.to_string(),
        }
    }

    /// Whether the view should switch to its offline indicator
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Offline)
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed
            | ErrorCode::InvalidRequest
            | ErrorCode::RequiredField
            | ErrorCode::TenantNotSelected
            | ErrorCode::OrderEmpty => Self::Validation(err.message),
            ErrorCode::InvalidTransition | ErrorCode::OrderTerminal => {
                Self::InvalidTransition(err.message)
            }
            ErrorCode::AlreadyClaimed => Self::AlreadyClaimed {
                waiter_id: err
                    .details
                    .as_ref()
                    .and_then(|d| d.get("waiterId"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                message: err.message,
            },
            ErrorCode::NotFound | ErrorCode::OrderNotFound | ErrorCode::OrderItemNotFound => {
                Self::NotFound(err.message)
            }
            ErrorCode::NetworkError | ErrorCode::TimeoutError => Self::Transport(err.message),
            code => Self::Server {
                code,
                message: err.message,
            },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
