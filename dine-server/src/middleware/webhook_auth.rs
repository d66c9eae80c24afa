//! Shared-secret check for webhook ingress

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::core::ServerState;
use crate::utils::AppError;

pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Require `x-webhook-secret` to match the configured secret
///
/// Passes everything through when no secret is configured.
pub async fn require_webhook_secret(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config.webhook_secret.as_deref() {
        let provided = req
            .headers()
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            tracing::warn!(path = %req.uri().path(), "Webhook rejected: bad or missing secret");
            return Err(AppError::not_authenticated());
        }
    }
    Ok(next.run(req).await)
}
