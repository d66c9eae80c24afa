//! TenantHub: per-tenant broadcast fan-out
//!
//! ```text
//! gateway mutation / webhook
//!       │ RelayEvent
//!       ▼
//! TenantHub
//!   └── tenant_id → broadcast::Sender<RelayEvent>
//!         │
//!         ▼
//!   Socket.IO sessions that joined the tenant (one receiver each)
//! ```
//!
//! Delivery is at-most-once: no buffering beyond the channel capacity, no
//! retry, and a session that is not subscribed at publish time misses the
//! event.

use dashmap::DashMap;
use shared::message::RelayEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct TenantHub {
    /// tenant_id → sender
    tenants: Arc<DashMap<String, broadcast::Sender<RelayEvent>>>,
    capacity: usize,
}

impl Default for TenantHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TenantHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            tenants: Arc::new(DashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Publish to every current subscriber of `event.tenant_id`
    ///
    /// Never blocks. Returns how many subscribers the event was handed to.
    pub fn publish(&self, event: RelayEvent) -> usize {
        let Some(tx) = self.tenants.get(&event.tenant_id).map(|t| t.value().clone()) else {
            tracing::debug!(
                tenant_id = %event.tenant_id,
                event = %event.event,
                "No subscribers for tenant, event dropped"
            );
            return 0;
        };

        let tenant_id = event.tenant_id.clone();
        match tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                // Every receiver is gone
                self.prune(&tenant_id);
                0
            }
        }
    }

    /// Subscribe to a tenant's events, creating the channel on demand
    pub fn subscribe(&self, tenant_id: &str) -> broadcast::Receiver<RelayEvent> {
        self.tenants
            .entry(tenant_id.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    pub fn subscriber_count(&self, tenant_id: &str) -> usize {
        self.tenants
            .get(tenant_id)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    /// Drop the tenant's channel if nobody listens any more
    pub fn prune(&self, tenant_id: &str) {
        self.tenants
            .remove_if(tenant_id, |_, tx| tx.receiver_count() == 0);
    }

    /// Number of tenants with a live channel
    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }
}
