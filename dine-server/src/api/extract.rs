//! Request context extractors
//!
//! The gateway has no sessions: the tenant and the acting role travel in
//! headers on every call.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use shared::order::Role;

use crate::utils::AppError;

pub const TENANT_HEADER: &str = "x-tenant-id";
pub const ROLE_HEADER: &str = "x-actor-role";
pub const ACTOR_HEADER: &str = "x-actor-id";

fn header_value<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Tenant scope from `x-tenant-id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for TenantId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_value(parts, TENANT_HEADER)
            .map(|t| TenantId(t.to_string()))
            .ok_or_else(AppError::tenant_required)
    }
}

/// Who is asking: `x-actor-role` (required) and `x-actor-id` (optional)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub role: Role,
    pub id: Option<String>,
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = header_value(parts, ROLE_HEADER).ok_or_else(|| AppError::required(ROLE_HEADER))?;
        // `system` is reserved for server-side automation
        let role = raw
            .parse::<Role>()
            .ok()
            .filter(|r| *r != Role::System)
            .ok_or_else(|| {
                AppError::invalid_request(format!("Unknown actor role: {raw}"))
                    .with_detail("role", raw)
            })?;
        Ok(Actor {
            role,
            id: header_value(parts, ACTOR_HEADER).map(str::to_string),
        })
    }
}

/// JSON body whose rejections use the `ApiResponse` envelope
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::invalid_request(rejection.body_text())),
        }
    }
}
