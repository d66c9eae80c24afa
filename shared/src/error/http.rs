//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::OrderNotFound | Self::OrderItemNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (state moved on underneath the caller)
            Self::InvalidTransition | Self::AlreadyClaimed | Self::OrderTerminal => {
                StatusCode::CONFLICT
            }

            // 401 / 403
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::PermissionDenied => StatusCode::FORBIDDEN,

            // 503 Service Unavailable (transient)
            Self::NetworkError | Self::TimeoutError => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::RequiredField
            | Self::TenantNotSelected
            | Self::OrderEmpty => StatusCode::BAD_REQUEST,
        }
    }
}
