//! Webhook handlers

use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use shared::message::{OrderNotification, RelayEvent, RelayEventKind, RelayPayload, UserNotification};
use shared::order::OrderStatus;

use super::body::Body;
use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult};

type RelayResponse = AppResult<Json<ApiResponse<RelayEvent>>>;

pub async fn order_created(State(state): State<ServerState>, bytes: Bytes) -> RelayResponse {
    relay_order(&state, RelayEventKind::OrderCreated, &bytes)
}

pub async fn order_updated(State(state): State<ServerState>, bytes: Bytes) -> RelayResponse {
    relay_order(&state, RelayEventKind::OrderUpdated, &bytes)
}

pub async fn user_created(State(state): State<ServerState>, bytes: Bytes) -> RelayResponse {
    relay_user(&state, RelayEventKind::UserCreated, &bytes)
}

pub async fn user_updated(State(state): State<ServerState>, bytes: Bytes) -> RelayResponse {
    relay_user(&state, RelayEventKind::UserUpdated, &bytes)
}

pub async fn user_deleted(State(state): State<ServerState>, bytes: Bytes) -> RelayResponse {
    relay_user(&state, RelayEventKind::UserDeleted, &bytes)
}

/// `{tenantId, event, payload}` for any relay event
pub async fn emit(State(state): State<ServerState>, bytes: Bytes) -> RelayResponse {
    let body = Body::parse(&bytes)?;
    let tenant_id = body.required_id("tenantId")?;
    let event_name = body.optional_text("event")?.unwrap_or_default();
    let payload = body.into_value().get("payload").cloned().unwrap_or(Value::Null);

    let event = state.relay.emit(&tenant_id, &event_name, payload)?;
    Ok(relayed(event))
}

fn relay_order(state: &ServerState, kind: RelayEventKind, bytes: &[u8]) -> RelayResponse {
    let body = Body::parse(bytes)?;
    let order_id = body.required_id("orderId")?;
    let tenant_id = body.required_id("tenantId")?;

    // A newly created order is always unsubmitted, whatever the caller sent
    let status = match kind {
        RelayEventKind::OrderCreated => Some(OrderStatus::Unsubmit),
        _ => body
            .optional_text("status")?
            .map(|s| {
                s.parse::<OrderStatus>()
                    .map_err(|e| AppError::validation(e).with_detail("field", "status"))
            })
            .transpose()?,
    };

    let notification = OrderNotification {
        order_id,
        table_id: body.optional_id("tableId")?,
        table_number: body.optional_u32(&["tableNumber"])?,
        display_order: body.optional_u32(&["displayOrder"])?,
        total_amount: body.optional_amount(&["totalAmount", "newTotalAmount"])?,
        item_count: body.optional_u32(&["itemCount", "newItemCount"])?,
        status,
        waiter_id: body.optional_id("waiterId")?,
    };
    tracing::info!(
        tenant_id = %tenant_id,
        order_id = %notification.order_id,
        event = %kind,
        "Order webhook received"
    );

    let event = state
        .relay
        .publish(&tenant_id, kind, RelayPayload::Order(notification))?;
    Ok(relayed(event))
}

fn relay_user(state: &ServerState, kind: RelayEventKind, bytes: &[u8]) -> RelayResponse {
    let body = Body::parse(bytes)?;
    let user_id = body.required_id("userId")?;
    let tenant_id = body.required_id("tenantId")?;

    let notification = UserNotification {
        user_id,
        name: body.optional_text("name")?,
        email: body.optional_text("email")?,
        role: body.optional_text("role")?,
    };
    tracing::info!(
        tenant_id = %tenant_id,
        user_id = %notification.user_id,
        event = %kind,
        "User webhook received"
    );

    let event = state
        .relay
        .publish(&tenant_id, kind, RelayPayload::User(notification))?;
    Ok(relayed(event))
}

fn relayed(event: RelayEvent) -> Json<ApiResponse<RelayEvent>> {
    let message = format!("{} relayed", event.event);
    Json(ApiResponse::success_with_message(message, event))
}
