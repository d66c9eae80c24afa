//! Webhook ingress
//!
//! External services report order and staff changes here; each call is
//! re-emitted to the tenant's sockets. Webhooks never touch the order store.
//!
//! | Path | Relayed as |
//! |------|------------|
//! | /webhooks/order-created | order:created |
//! | /webhooks/order-updated | order:updated |
//! | /webhooks/user-created | user:created |
//! | /webhooks/user-updated | user:updated |
//! | /webhooks/user-deleted | user:deleted |
//! | /webhooks/emit | any event named in the body |

mod body;
mod handler;

use axum::{Router, middleware, routing::post};

use crate::core::ServerState;
use crate::middleware::require_webhook_secret;

pub fn router(state: &ServerState) -> Router<ServerState> {
    Router::new().nest("/webhooks", routes(state))
}

fn routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route("/order-created", post(handler::order_created))
        .route("/order-updated", post(handler::order_updated))
        .route("/user-created", post(handler::user_created))
        .route("/user-updated", post(handler::user_updated))
        .route("/user-deleted", post(handler::user_deleted))
        .route("/emit", post(handler::emit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_webhook_secret,
        ))
}
