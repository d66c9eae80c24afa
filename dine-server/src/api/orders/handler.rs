//! Order API handlers
//!
//! Every successful mutation is relayed to the tenant as `order:created` or
//! `order:updated` after the store accepts it.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::message::RelayEventKind;
use shared::order::{
    ClaimOrderRequest, CreateOrderRequest, Order, OrderFilter, UpdateItemStatusRequest,
    UpdateOrderStatusRequest,
};

use crate::api::extract::{Actor, ApiJson, TenantId};
use crate::core::ServerState;
use crate::utils::validation::{MAX_ID_LEN, validate_create_order, validate_required_text};
use crate::utils::{ApiResponse, AppResult, ok};

/// List orders, oldest first
pub async fn list(
    State(state): State<ServerState>,
    tenant: TenantId,
    Query(filter): Query<OrderFilter>,
) -> AppResult<Json<ApiResponse<Vec<Order>>>> {
    Ok(ok(state.orders.list(tenant.as_str(), &filter)))
}

pub async fn get_by_id(
    State(state): State<ServerState>,
    tenant: TenantId,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.get(tenant.as_str(), &id)?;
    Ok(ok(order))
}

/// Create an order from a submitted cart
pub async fn create(
    State(state): State<ServerState>,
    tenant: TenantId,
    ApiJson(payload): ApiJson<CreateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    validate_create_order(&payload)?;

    let order = state.orders.create(tenant.as_str(), payload);
    tracing::info!(
        tenant_id = %tenant.as_str(),
        order_id = %order.id,
        table_number = order.table_number,
        items = order.items.len(),
        "Order created"
    );
    state
        .relay
        .order_changed(tenant.as_str(), RelayEventKind::OrderCreated, &order);
    Ok(ok(order))
}

/// Order-level status transition
pub async fn update_status(
    State(state): State<ServerState>,
    tenant: TenantId,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = state.orders.set_status(
        tenant.as_str(),
        &id,
        payload.status,
        actor.role,
        state.config.auto_confirm_items_on_approve,
    )?;
    tracing::info!(
        tenant_id = %tenant.as_str(),
        order_id = %id,
        status = %order.status,
        role = %actor.role,
        actor_id = ?actor.id,
        "Order status changed"
    );
    state
        .relay
        .order_changed(tenant.as_str(), RelayEventKind::OrderUpdated, &order);
    Ok(ok(order))
}

/// Item-level status transition
pub async fn update_item_status(
    State(state): State<ServerState>,
    tenant: TenantId,
    actor: Actor,
    Path((id, item_id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<UpdateItemStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order =
        state
            .orders
            .set_item_status(tenant.as_str(), &id, &item_id, payload.status, actor.role)?;
    tracing::info!(
        tenant_id = %tenant.as_str(),
        order_id = %id,
        item_id = %item_id,
        status = %payload.status,
        role = %actor.role,
        actor_id = ?actor.id,
        "Item status changed"
    );
    state
        .relay
        .order_changed(tenant.as_str(), RelayEventKind::OrderUpdated, &order);
    Ok(ok(order))
}

/// Assign a waiter; a claimed order stays with its first waiter
pub async fn claim(
    State(state): State<ServerState>,
    tenant: TenantId,
    actor: Actor,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ClaimOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    validate_required_text(&payload.waiter_id, "waiterId", MAX_ID_LEN)?;

    let order = state
        .orders
        .claim(tenant.as_str(), &id, payload.waiter_id.trim(), actor.role)
        .inspect_err(|e| {
            tracing::debug!(tenant_id = %tenant.as_str(), order_id = %id, error = %e, "Claim rejected");
        })?;
    tracing::info!(
        tenant_id = %tenant.as_str(),
        order_id = %id,
        waiter_id = ?order.waiter_id,
        "Order claimed"
    );
    state
        .relay
        .order_changed(tenant.as_str(), RelayEventKind::OrderUpdated, &order);
    Ok(ok(order))
}
