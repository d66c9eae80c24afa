//! In-memory, tenant-scoped order store
//!
//! Every mutation runs on a copy of the order under that order's map entry
//! lock and is written back only if it succeeds, so a rejected request never
//! leaves a half-applied change behind.

use dashmap::DashMap;
use shared::order::{
    CreateOrderRequest, ItemStatus, Order, OrderFilter, OrderItem, OrderStatus, Role,
    item_transition, order_transition,
};
use shared::util;
use std::sync::Arc;

use super::GatewayError;

/// tenant_id → (order_id → Order)
#[derive(Clone, Default)]
pub struct OrderStore {
    tenants: Arc<DashMap<String, DashMap<String, Order>>>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tenant orders matching `filter`, oldest first
    pub fn list(&self, tenant_id: &str, filter: &OrderFilter) -> Vec<Order> {
        let Some(orders) = self.tenants.get(tenant_id) else {
            return Vec::new();
        };
        let mut result: Vec<Order> = orders
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        result
    }

    pub fn get(&self, tenant_id: &str, order_id: &str) -> Result<Order, GatewayError> {
        self.tenants
            .get(tenant_id)
            .and_then(|orders| orders.get(order_id).map(|o| o.value().clone()))
            .ok_or_else(|| GatewayError::OrderNotFound(order_id.to_string()))
    }

    /// Create an unsubmitted order; items start unconfirmed
    pub fn create(&self, tenant_id: &str, request: CreateOrderRequest) -> Order {
        let items = request
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: util::new_id(),
                dish_id: item.dish_id,
                name: item.name.trim().to_string(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                note: item.note.filter(|n| !n.trim().is_empty()),
                modifiers: item.modifiers,
                station: item.station,
                status: ItemStatus::Unconfirmed,
            })
            .collect();

        let mut order = Order::new(
            util::new_id(),
            request.table_id,
            request.table_number,
            items,
            util::now_millis(),
        );
        order.display_order = request.display_order;

        self.tenants
            .entry(tenant_id.to_string())
            .or_default()
            .insert(order.id.clone(), order.clone());
        order
    }

    /// Apply `mutate` to a copy of the order and store it only on success
    pub fn update<F>(&self, tenant_id: &str, order_id: &str, mutate: F) -> Result<Order, GatewayError>
    where
        F: FnOnce(&mut Order) -> Result<(), GatewayError>,
    {
        let not_found = || GatewayError::OrderNotFound(order_id.to_string());
        let orders = self.tenants.get(tenant_id).ok_or_else(not_found)?;
        let mut entry = orders.get_mut(order_id).ok_or_else(not_found)?;

        let mut draft = entry.value().clone();
        mutate(&mut draft)?;
        draft.updated_at = util::now_millis();
        *entry.value_mut() = draft.clone();
        Ok(draft)
    }

    /// Order-level status change
    ///
    /// With `auto_confirm_items` set, approving an order also confirms its
    /// unconfirmed items.
    pub fn set_status(
        &self,
        tenant_id: &str,
        order_id: &str,
        to: OrderStatus,
        role: Role,
        auto_confirm_items: bool,
    ) -> Result<Order, GatewayError> {
        self.update(tenant_id, order_id, |order| {
            order_transition(order.status, to, role)?;
            order.status = to;
            if auto_confirm_items && to == OrderStatus::Approved {
                confirm_unconfirmed_items(order);
            }
            Ok(())
        })
    }

    /// Item-level status change; refreshes the cached totals
    pub fn set_item_status(
        &self,
        tenant_id: &str,
        order_id: &str,
        item_id: &str,
        to: ItemStatus,
        role: Role,
    ) -> Result<Order, GatewayError> {
        self.update(tenant_id, order_id, |order| {
            let order_status = order.status;
            let item = order
                .item_mut(item_id)
                .ok_or_else(|| GatewayError::ItemNotFound {
                    order_id: order_id.to_string(),
                    item_id: item_id.to_string(),
                })?;
            item_transition(order_status, item.status, to, role)?;
            item.status = to;
            order.recompute_totals();
            Ok(())
        })
    }

    /// One-way waiter assignment
    pub fn claim(
        &self,
        tenant_id: &str,
        order_id: &str,
        waiter_id: &str,
        role: Role,
    ) -> Result<Order, GatewayError> {
        if role != Role::Waiter {
            return Err(GatewayError::ClaimNotPermitted);
        }
        self.update(tenant_id, order_id, |order| {
            if let Some(current) = &order.waiter_id {
                return Err(GatewayError::AlreadyClaimed(current.clone()));
            }
            if order.is_terminal() {
                return Err(GatewayError::Terminal(order.id.clone()));
            }
            order.waiter_id = Some(waiter_id.to_string());
            Ok(())
        })
    }

    pub fn order_count(&self, tenant_id: &str) -> usize {
        self.tenants.get(tenant_id).map(|o| o.len()).unwrap_or(0)
    }
}

fn confirm_unconfirmed_items(order: &mut Order) {
    let order_status = order.status;
    for item in order.items.iter_mut() {
        if item_transition(order_status, item.status, ItemStatus::Pending, Role::System).is_ok() {
            item.status = ItemStatus::Pending;
        }
    }
}
