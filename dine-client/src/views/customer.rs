//! Customer display
//!
//! Read-only view of the table's own order plus the "call staff" button.
//! The call-staff debounce is a courtesy limit kept on this device only; the
//! gateway accepts every call.

use shared::message::{CallStaffNotification, RelayEvent, RelayEventKind, RelayPayload};
use shared::order::{Order, OrderStatus, Role, order_transition};
use std::time::{Duration, Instant};

use super::ConnectionState;
use crate::http::Gateway;
use crate::{ClientError, ClientResult};

/// Minimum spacing between two call-staff requests
#[derive(Debug, Clone)]
pub struct CallStaffThrottle {
    min_interval: Duration,
    last_sent: Option<Instant>,
}

impl CallStaffThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_sent: None,
        }
    }

    /// Time left before another call is allowed at `now`
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        let last = self.last_sent?;
        let elapsed = now.saturating_duration_since(last);
        (elapsed < self.min_interval).then(|| self.min_interval - elapsed)
    }

    pub fn record(&mut self, now: Instant) {
        self.last_sent = Some(now);
    }
}

pub struct CustomerView<G> {
    gateway: G,
    tenant_id: String,
    table_id: String,
    table_number: u32,
    order_id: Option<String>,
    order: Option<Order>,
    throttle: CallStaffThrottle,
    connection: ConnectionState,
}

impl<G: Gateway> CustomerView<G> {
    pub fn new(
        gateway: G,
        tenant_id: impl Into<String>,
        table_id: impl Into<String>,
        table_number: u32,
        call_staff_debounce: Duration,
    ) -> Self {
        Self {
            gateway,
            tenant_id: tenant_id.into(),
            table_id: table_id.into(),
            table_number,
            order_id: None,
            order: None,
            throttle: CallStaffThrottle::new(call_staff_debounce),
            connection: ConnectionState::Online,
        }
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
    }

    /// Follow `order_id` from now on
    pub async fn track_order(&mut self, order_id: impl Into<String>) -> ClientResult<&Order> {
        self.order_id = Some(order_id.into());
        self.order = None;
        self.refresh().await?;
        self.order
            .as_ref()
            .ok_or_else(|| ClientError::InvalidResponse("Order missing after refresh".into()))
    }

    /// Re-read the followed order
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let Some(order_id) = self.order_id.clone() else {
            return Ok(());
        };
        let result = self.gateway.get_order(&order_id).await;
        let order = self.track(result)?;
        self.order = Some(order);
        self.connection = ConnectionState::Online;
        Ok(())
    }

    /// Re-read on events about the followed order; returns whether it did
    pub async fn handle_event(&mut self, event: &RelayEvent) -> ClientResult<bool> {
        let ours = event.tenant_id == self.tenant_id
            && event.event.is_order_event()
            && event.order_id().is_some()
            && event.order_id() == self.order_id.as_deref();
        if !ours {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    /// Send the cart to the kitchen (Unsubmit → Approved)
    pub async fn submit(&mut self) -> ClientResult<&Order> {
        self.ensure_online()?;
        let order = self
            .order
            .as_ref()
            .ok_or_else(|| ClientError::NotFound("No order to submit".into()))?;
        order_transition(order.status, OrderStatus::Approved, Role::Customer)
            .map_err(|e| ClientError::InvalidTransition(e.to_string()))?;

        let result = self
            .gateway
            .update_order_status(&order.id, OrderStatus::Approved)
            .await;
        let updated = self.track(result)?;
        let order: &Order = self.order.insert(updated);
        Ok(order)
    }

    /// Ask for a waiter
    ///
    /// Fails with `Throttled` inside the debounce window; only delivered calls
    /// start a new window.
    pub async fn call_staff(
        &mut self,
        request_type: impl Into<String>,
        message: Option<String>,
        now: Instant,
    ) -> ClientResult<RelayEvent> {
        self.ensure_online()?;
        if let Some(wait) = self.throttle.remaining(now) {
            return Err(ClientError::Throttled(wait));
        }

        let notification = CallStaffNotification {
            table_number: self.table_number,
            table_id: self.table_id.clone(),
            order_id: self.order_id.clone(),
            request_type: request_type.into(),
            message,
        };
        let result = self.gateway.call_staff(&notification).await;
        self.track(result)?;
        self.throttle.record(now);

        RelayEvent::new(
            self.tenant_id.clone(),
            RelayEventKind::CallStaff,
            RelayPayload::CallStaff(notification),
        )
        .map_err(ClientError::from)
    }

    fn ensure_online(&self) -> ClientResult<()> {
        match self.connection {
            ConnectionState::Online => Ok(()),
            ConnectionState::Offline => Err(ClientError::Offline),
        }
    }

    fn track<T>(&mut self, result: ClientResult<T>) -> ClientResult<T> {
        if result.as_ref().is_err_and(ClientError::is_connectivity) {
            self.connection = ConnectionState::Offline;
        }
        result
    }
}
