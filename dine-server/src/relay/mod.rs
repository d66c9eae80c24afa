//! Notification relay
//!
//! Turns gateway mutations and webhook calls into [`RelayEvent`]s and fans
//! them out to the tenant's Socket.IO sessions through [`TenantHub`].

pub mod hub;
pub mod socket;

pub use hub::TenantHub;

use serde_json::Value;
use shared::error::AppResult;
use shared::message::{OrderNotification, RelayEvent, RelayEventKind, RelayPayload};
use shared::order::Order;

#[derive(Clone, Default)]
pub struct Relay {
    hub: TenantHub,
}

impl Relay {
    pub fn new(hub: TenantHub) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &TenantHub {
        &self.hub
    }

    /// Validate and publish a loosely shaped event
    ///
    /// Fails with a validation error on an empty tenant, an empty or unknown
    /// event name, or a payload that does not fit the event. Nothing is
    /// published on failure.
    pub fn emit(&self, tenant_id: &str, event_name: &str, payload: Value) -> AppResult<RelayEvent> {
        let kind: RelayEventKind = event_name.parse()?;
        let payload = RelayPayload::from_value(kind, payload)?;
        self.publish(tenant_id, kind, payload)
    }

    /// Publish an already typed payload
    pub fn publish(
        &self,
        tenant_id: &str,
        kind: RelayEventKind,
        payload: RelayPayload,
    ) -> AppResult<RelayEvent> {
        let event = RelayEvent::new(tenant_id, kind, payload)?;
        let delivered = self.hub.publish(event.clone());
        tracing::debug!(
            tenant_id = %tenant_id,
            event = %kind,
            delivered,
            "Relay event published"
        );
        Ok(event)
    }

    /// `order:created` / `order:updated` summary of a stored order
    pub fn order_changed(&self, tenant_id: &str, kind: RelayEventKind, order: &Order) {
        let payload = RelayPayload::Order(order_notification(order));
        if let Err(e) = self.publish(tenant_id, kind, payload) {
            tracing::warn!(tenant_id = %tenant_id, order_id = %order.id, error = %e, "Failed to relay order change");
        }
    }
}

/// Notification record describing the current state of `order`
pub fn order_notification(order: &Order) -> OrderNotification {
    OrderNotification {
        order_id: order.id.clone(),
        table_id: Some(order.table_id.clone()),
        table_number: Some(order.table_number),
        display_order: order.display_order,
        total_amount: Some(order.total_amount),
        item_count: Some(order.item_count),
        status: Some(order.status),
        waiter_id: order.waiter_id.clone(),
    }
}
