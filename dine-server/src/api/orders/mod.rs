//! Order gateway API
//!
//! | Path | Method | Action |
//! |------|--------|--------|
//! | /orders | GET | List tenant orders |
//! | /orders | POST | Create an order |
//! | /orders/{id} | GET | Fetch one order |
//! | /orders/{id} | PUT | Order status transition |
//! | /orders/{id}/items/{item_id} | PATCH | Item status transition |
//! | /orders/{id}/claim | PUT | Waiter claim |

mod handler;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).put(handler::update_status))
        .route("/{id}/items/{item_id}", patch(handler::update_item_status))
        .route("/{id}/claim", put(handler::claim))
}
