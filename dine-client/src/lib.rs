//! Dine client - gateway access and role views
//!
//! [`GatewayClient`] talks to `dine-server` over HTTP. The role views keep a
//! local [`OrderBook`] in step with the gateway and the relay, and only send
//! actions the transition table allows for their role.

pub mod book;
pub mod config;
pub mod error;
pub mod http;
pub mod views;

pub use book::{BookUpdate, OrderBook};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{Gateway, GatewayClient};
pub use views::{
    AdminView, CallStaffThrottle, ConnectionState, CustomerView, DashboardReport, KitchenView,
    WaiterView,
};

// Re-export shared types for convenience
pub use shared::message::RelayEvent;
pub use shared::order::{ItemStatus, Order, OrderStatus, Role};
