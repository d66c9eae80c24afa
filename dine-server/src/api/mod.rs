//! HTTP API
//!
//! - [`orders`] - order gateway
//! - [`webhooks`] - webhook ingress feeding the relay
//! - [`call_staff`] - customer side channel
//! - [`health`] - liveness

pub mod call_staff;
pub mod extract;
pub mod health;
pub mod orders;
pub mod webhooks;
