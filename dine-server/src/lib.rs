//! Dine server
//!
//! Multi-tenant order gateway with a Socket.IO notification relay.
//!
//! # Modules
//!
//! - [`core`] - configuration, state, server
//! - [`gateway`] - tenant-scoped order store and transition checks
//! - [`relay`] - tenant event hub and Socket.IO forwarding
//! - [`api`] - HTTP handlers
//! - [`routes`] - router assembly and middleware stack
//! - [`middleware`] - request logging, webhook secret
//! - [`utils`] - logging setup, validation
//!
//! # Example
//!
//! ```ignore
//! let config = Config::from_env();
//! Server::new(config).run().await?;
//! ```

pub mod api;
pub mod core;
pub mod gateway;
pub mod middleware;
pub mod relay;
pub mod routes;
pub mod utils;

pub use crate::core::{Config, Server, ServerError, ServerState};
pub use gateway::{GatewayError, OrderStore};
pub use relay::{Relay, TenantHub};
pub use routes::{OneshotRouter, build_app};
