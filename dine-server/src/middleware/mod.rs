//! HTTP middleware

pub mod logging;
pub mod webhook_auth;

pub use logging::logging_middleware;
pub use webhook_auth::require_webhook_secret;
