use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::api;
use crate::core::ServerState;
use crate::middleware;
use crate::relay::socket;

pub mod router_ext;
pub use router_ext::{OneshotResult, OneshotRouter};

/// Request id generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// All routes, no middleware, no state
pub fn build_router(state: &ServerState) -> Router<ServerState> {
    Router::new()
        // Order gateway - x-tenant-id required
        .merge(api::orders::router())
        // Webhook ingress - optional shared secret
        .merge(api::webhooks::router(state))
        // Customer side channel
        .merge(api::call_staff::router())
        // Health - public
        .merge(api::health::router())
}

/// Fully configured application: routes, Socket.IO and middleware
///
/// Used by both the HTTP server and oneshot calls
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router(state)
        // Socket.IO endpoint at /socket.io
        .layer(socket::layer(state.hub().clone()))
        // CORS - browsers on other origins
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Request logging
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        // Trace - request spans
        .layer(TraceLayer::new_for_http())
        // Request ID - generate one per request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
