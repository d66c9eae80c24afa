use std::sync::Arc;

use crate::core::Config;
use crate::gateway::OrderStore;
use crate::relay::{Relay, TenantHub};

/// State shared by every handler
///
/// Cheap to clone; all members are reference counted.
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub orders: OrderStore,
    pub relay: Relay,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        let hub = TenantHub::new(config.relay_channel_capacity);
        Self {
            config: Arc::new(config),
            orders: OrderStore::new(),
            relay: Relay::new(hub),
        }
    }

    pub fn hub(&self) -> &TenantHub {
        self.relay.hub()
    }
}
