//! Local order book
//!
//! A view's copy of the tenant's orders. Pulls replace it, gateway responses
//! upsert into it, and relay events patch it or ask for a re-fetch. The book
//! is never the source of truth.

use shared::message::{OrderNotification, RelayEvent, RelayPayload};
use shared::order::Order;
use shared::util;
use std::collections::HashMap;

/// What a relay event did to the book
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookUpdate {
    /// Local copy updated from the event alone
    Patched(String),
    /// Local copy may be stale; fetch this order from the gateway
    Refetch(String),
    /// Not for this book
    Ignored,
}

#[derive(Debug, Clone)]
pub struct OrderBook {
    tenant_id: String,
    orders: HashMap<String, Order>,
}

impl OrderBook {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            orders: HashMap::new(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders oldest first (ties by id)
    pub fn orders(&self) -> Vec<&Order> {
        let mut orders: Vec<&Order> = self.orders.values().collect();
        orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        orders
    }

    /// Insert or replace by id; the last write wins
    pub fn upsert(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    /// Replace everything with a fresh pull
    pub fn replace_all(&mut self, orders: Vec<Order>) {
        self.orders = orders.into_iter().map(|o| (o.id.clone(), o)).collect();
    }

    /// Fold a relay event into the book
    ///
    /// - other tenants and non-order events are ignored
    /// - an unknown order is added as a summary built from the event and must
    ///   be re-fetched for its items
    /// - `order:created` for a known order patches it in place
    /// - `order:updated` patches the header fields it carries, but items are
    ///   never part of a notification, so the order is always re-fetched
    pub fn apply(&mut self, event: &RelayEvent) -> BookUpdate {
        if event.tenant_id != self.tenant_id || !event.event.is_order_event() {
            return BookUpdate::Ignored;
        }
        let RelayPayload::Order(notification) = &event.payload else {
            return BookUpdate::Ignored;
        };
        let order_id = notification.order_id.clone();

        match self.orders.get_mut(&order_id) {
            Some(order) => {
                patch(order, notification);
                if event.event == shared::message::RelayEventKind::OrderCreated {
                    BookUpdate::Patched(order_id)
                } else {
                    BookUpdate::Refetch(order_id)
                }
            }
            None => {
                let created_at =
                    util::parse_iso_millis(&event.timestamp).unwrap_or_else(util::now_millis);
                self.orders
                    .insert(order_id.clone(), summary(notification, created_at));
                BookUpdate::Refetch(order_id)
            }
        }
    }
}

/// Header-only order standing in until the real one is fetched
fn summary(notification: &OrderNotification, created_at: i64) -> Order {
    let mut order = Order::new(
        notification.order_id.clone(),
        notification.table_id.clone().unwrap_or_default(),
        notification.table_number.unwrap_or_default(),
        Vec::new(),
        created_at,
    );
    patch(&mut order, notification);
    order
}

fn patch(order: &mut Order, notification: &OrderNotification) {
    if let Some(table_id) = &notification.table_id {
        order.table_id = table_id.clone();
    }
    if let Some(table_number) = notification.table_number {
        order.table_number = table_number;
    }
    if notification.display_order.is_some() {
        order.display_order = notification.display_order;
    }
    if let Some(status) = notification.status {
        order.status = status;
    }
    if let Some(total_amount) = notification.total_amount {
        order.total_amount = total_amount;
    }
    if let Some(item_count) = notification.item_count {
        order.item_count = item_count;
    }
    // A claim is never undone
    if order.waiter_id.is_none() {
        order.waiter_id = notification.waiter_id.clone();
    }
}
