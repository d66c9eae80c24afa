//! Common utilities
//!
//! - [`logger`] - tracing setup
//! - [`validation`] - request body checks

pub mod logger;
pub mod validation;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};

/// Wrap `data` in a success envelope
pub fn ok<T: serde::Serialize>(data: T) -> axum::Json<ApiResponse<T>> {
    axum::Json(ApiResponse::success(data))
}
