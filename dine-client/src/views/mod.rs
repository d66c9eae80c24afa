//! Role views
//!
//! Each view keeps an [`OrderBook`], pulls from the gateway, folds in relay
//! events and sends its role's actions. Actions are checked against the
//! transition table before anything is sent, and the book only changes once
//! the gateway has accepted the request.

pub mod admin;
pub mod customer;
pub mod kitchen;
pub mod waiter;

pub use admin::{AdminView, BestSeller, DashboardReport};
pub use customer::{CallStaffThrottle, CustomerView};
pub use kitchen::{DisplayBucket, KitchenTicket, KitchenView, display_bucket, elapsed_minutes};
pub use waiter::WaiterView;

use shared::message::RelayEvent;
use shared::order::{ItemStatus, Order, OrderFilter, OrderStatus, Role, item_transition, order_transition};

use crate::book::{BookUpdate, OrderBook};
use crate::http::Gateway;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Online,
    Offline,
}

/// Book, gateway and connection state shared by the staff views
pub struct ViewCore<G> {
    gateway: G,
    book: OrderBook,
    role: Role,
    connection: ConnectionState,
}

impl<G: Gateway> ViewCore<G> {
    pub fn new(gateway: G, tenant_id: impl Into<String>, role: Role) -> Self {
        Self {
            gateway,
            book: OrderBook::new(tenant_id),
            role,
            connection: ConnectionState::Online,
        }
    }

    pub fn book(&self) -> &OrderBook {
        &self.book
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// Socket connect/disconnect
    pub fn set_connection(&mut self, state: ConnectionState) {
        if self.connection != state {
            tracing::info!(tenant_id = %self.book.tenant_id(), ?state, "View connection changed");
        }
        self.connection = state;
    }

    /// Pull the current truth from the gateway
    pub async fn refresh(&mut self, filter: &OrderFilter) -> ClientResult<()> {
        let result = self.gateway.list_orders(filter).await;
        let orders = self.track(result)?;
        self.book.replace_all(orders);
        self.connection = ConnectionState::Online;
        Ok(())
    }

    /// Fold a relay event in, fetching the order when the event is not enough
    ///
    /// A summary whose order the gateway does not know is kept as is.
    pub async fn handle_event(&mut self, event: &RelayEvent) -> ClientResult<BookUpdate> {
        let update = self.book.apply(event);
        if let BookUpdate::Refetch(order_id) = &update {
            let result = self.gateway.get_order(order_id).await;
            match self.track(result) {
                Ok(order) => self.book.upsert(order),
                Err(ClientError::NotFound(_)) => {
                    tracing::debug!(order_id = %order_id, "Relayed order unknown to gateway, keeping summary");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(update)
    }

    /// Order from the book or `NotFound`
    pub fn order(&self, order_id: &str) -> ClientResult<&Order> {
        self.book
            .get(order_id)
            .ok_or_else(|| ClientError::NotFound(format!("Order {order_id} not found")))
    }

    pub fn ensure_online(&self) -> ClientResult<()> {
        match self.connection {
            ConnectionState::Online => Ok(()),
            ConnectionState::Offline => Err(ClientError::Offline),
        }
    }

    /// Order status change for this view's role
    pub async fn set_order_status(&mut self, order_id: &str, to: OrderStatus) -> ClientResult<Order> {
        self.ensure_online()?;
        let from = self.order(order_id)?.status;
        order_transition(from, to, self.role)
            .map_err(|e| ClientError::InvalidTransition(e.to_string()))?;

        let result = self.gateway.update_order_status(order_id, to).await;
        let updated = self.track(result)?;
        Ok(self.commit(updated))
    }

    /// Item status change for this view's role
    pub async fn set_item_status(
        &mut self,
        order_id: &str,
        item_id: &str,
        to: ItemStatus,
    ) -> ClientResult<Order> {
        self.ensure_online()?;
        let order = self.order(order_id)?;
        let item = order.item(item_id).ok_or_else(|| {
            ClientError::NotFound(format!("Item {item_id} not found in order {order_id}"))
        })?;
        item_transition(order.status, item.status, to, self.role)
            .map_err(|e| ClientError::InvalidTransition(e.to_string()))?;

        let result = self.gateway.update_item_status(order_id, item_id, to).await;
        let updated = self.track(result)?;
        Ok(self.commit(updated))
    }

    /// Store a gateway-confirmed order
    pub(crate) fn commit(&mut self, order: Order) -> Order {
        self.book.upsert(order.clone());
        order
    }

    /// Drop to offline on connectivity failures
    pub(crate) fn track<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if let Err(ClientError::Transport(e)) = &result {
            tracing::warn!(error = %e, "Gateway unreachable, view offline");
            self.connection = ConnectionState::Offline;
        }
        result
    }
}

#[cfg(test)]
pub(crate) mod testing;
