//! Order gateway
//!
//! Tenant-scoped order storage with every status change checked against
//! [`shared::order::transition`].

mod error;
mod store;

pub use error::GatewayError;
pub use store::OrderStore;
